//! Named facial landmarks and the geometry derived from them.
//!
//! "Left" and "right" refer to sides of the image, not of the person, so an
//! unmirrored camera shows the person's right eye as `LeftEye*`.

/// Landmarks the expression metrics need.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Landmark {
    LeftEyeOuter,
    LeftEyeInner,
    LeftEyeUpper,
    LeftEyeLower,
    RightEyeInner,
    RightEyeOuter,
    RightEyeUpper,
    RightEyeLower,
    NoseTip,
    UpperLipInner,
    LowerLipInner,
    MouthLeft,
    MouthRight,
}

impl Landmark {
    pub const COUNT: usize = 13;

    pub const ALL: [Landmark; Self::COUNT] = [
        Landmark::LeftEyeOuter,
        Landmark::LeftEyeInner,
        Landmark::LeftEyeUpper,
        Landmark::LeftEyeLower,
        Landmark::RightEyeInner,
        Landmark::RightEyeOuter,
        Landmark::RightEyeUpper,
        Landmark::RightEyeLower,
        Landmark::NoseTip,
        Landmark::UpperLipInner,
        Landmark::LowerLipInner,
        Landmark::MouthLeft,
        Landmark::MouthRight,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Image-space landmark positions in pixels (y grows downward).
#[derive(Clone, Debug, PartialEq)]
pub struct FaceLandmarks {
    points: [(f64, f64); Landmark::COUNT],
}

impl FaceLandmarks {
    /// `points` are in [`Landmark::ALL`] order.
    pub fn new(points: [(f64, f64); Landmark::COUNT]) -> Self {
        Self { points }
    }

    pub fn from_fn(f: impl FnMut(Landmark) -> (f64, f64)) -> Self {
        Self {
            points: Landmark::ALL.map(f),
        }
    }

    pub fn point(&self, landmark: Landmark) -> (f64, f64) {
        self.points[landmark.slot()]
    }

    /// Lid gap over eye width. Roughly 0.3 when open, under 0.1 when shut.
    ///
    /// Returns `None` for a degenerate (zero-width) eye.
    pub fn eye_aspect_ratio(&self, side: Side) -> Option<f64> {
        let (outer, inner, upper, lower) = match side {
            Side::Left => (
                Landmark::LeftEyeOuter,
                Landmark::LeftEyeInner,
                Landmark::LeftEyeUpper,
                Landmark::LeftEyeLower,
            ),
            Side::Right => (
                Landmark::RightEyeOuter,
                Landmark::RightEyeInner,
                Landmark::RightEyeUpper,
                Landmark::RightEyeLower,
            ),
        };
        ratio(
            distance(self.point(upper), self.point(lower)),
            distance(self.point(outer), self.point(inner)),
        )
    }

    /// Inner-lip gap over mouth width.
    pub fn mouth_aspect_ratio(&self) -> Option<f64> {
        ratio(
            distance(
                self.point(Landmark::UpperLipInner),
                self.point(Landmark::LowerLipInner),
            ),
            distance(
                self.point(Landmark::MouthLeft),
                self.point(Landmark::MouthRight),
            ),
        )
    }

    /// Height of the mouth corners above the lip centre over mouth width.
    /// Zero for a relaxed mouth, positive when the corners pull up.
    pub fn mouth_corner_lift(&self) -> Option<f64> {
        let centre_y = (self.point(Landmark::UpperLipInner).1
            + self.point(Landmark::LowerLipInner).1)
            / 2.0;
        let corner_y =
            (self.point(Landmark::MouthLeft).1 + self.point(Landmark::MouthRight).1) / 2.0;
        ratio(
            centre_y - corner_y,
            distance(
                self.point(Landmark::MouthLeft),
                self.point(Landmark::MouthRight),
            ),
        )
    }

    /// Mouth width over the outer-eye-corner distance.
    pub fn mouth_width_ratio(&self) -> Option<f64> {
        ratio(
            distance(
                self.point(Landmark::MouthLeft),
                self.point(Landmark::MouthRight),
            ),
            distance(
                self.point(Landmark::LeftEyeOuter),
                self.point(Landmark::RightEyeOuter),
            ),
        )
    }

    /// Angle of the outer-eye-corner line in degrees, positive when the
    /// image-right eye sits lower than the image-left eye.
    pub fn roll_degrees(&self) -> f64 {
        let (lx, ly) = self.point(Landmark::LeftEyeOuter);
        let (rx, ry) = self.point(Landmark::RightEyeOuter);
        (ry - ly).atan2(rx - lx).to_degrees()
    }

    /// Vertical nose position between the eye line (0.0) and the mouth
    /// line (1.0). Smaller when looking up, larger when looking down.
    pub fn pitch_ratio(&self) -> Option<f64> {
        let eye_y = (self.point(Landmark::LeftEyeOuter).1 + self.point(Landmark::RightEyeOuter).1)
            / 2.0;
        let mouth_y =
            (self.point(Landmark::MouthLeft).1 + self.point(Landmark::MouthRight).1) / 2.0;
        ratio(self.point(Landmark::NoseTip).1 - eye_y, mouth_y - eye_y)
    }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator.abs() <= f64::EPSILON {
        None
    } else {
        Some(numerator / denominator)
    }
}
