/// Transition reported by an [`EdgeTrigger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Entered the active state.
    Rising,
    /// Left the active state.
    Falling,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Comparison {
    AtLeast,
    AtMost,
}

/// Turns a continuous measurement into press/release transitions.
///
/// Reports only state changes, so a metric held past the threshold for many
/// frames yields a single `Rising` edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeTrigger {
    threshold: f64,
    comparison: Comparison,
    active: bool,
}

impl EdgeTrigger {
    /// Active while `value >= threshold`.
    pub fn at_least(threshold: f64) -> Self {
        Self {
            threshold,
            comparison: Comparison::AtLeast,
            active: false,
        }
    }

    /// Active while `value <= threshold`.
    pub fn at_most(threshold: f64) -> Self {
        Self {
            threshold,
            comparison: Comparison::AtMost,
            active: false,
        }
    }

    pub fn update(&mut self, value: f64) -> Option<Edge> {
        let now_active = match self.comparison {
            Comparison::AtLeast => value >= self.threshold,
            Comparison::AtMost => value <= self.threshold,
        };
        let edge = match (self.active, now_active) {
            (false, true) => Some(Edge::Rising),
            (true, false) => Some(Edge::Falling),
            _ => None,
        };
        self.active = now_active;
        edge
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Forget the current state without reporting an edge.
    pub fn reset(&mut self) {
        self.active = false;
    }
}
