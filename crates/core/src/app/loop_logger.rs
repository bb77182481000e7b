use std::collections::BTreeMap;
use std::time::Instant;

/// Telemetry sink for the frame loop.
pub trait LoopLogger {
    /// Called once per completed frame.
    fn frame(&mut self);

    /// Time one named stage took this frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// A point-in-time value such as events per frame.
    fn metric(&mut self, name: &str, value: f64);

    /// End-of-run report, if anything was recorded.
    fn summary(&self) -> Option<String> {
        None
    }
}

/// Discards everything.
pub struct NullLoopLogger;

impl LoopLogger for NullLoopLogger {
    fn frame(&mut self) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Running {
    count: u64,
    total: f64,
    max: f64,
}

impl Running {
    fn push(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
        self.max = self.max.max(value);
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Aggregates per-stage timings for the `--stats` report.
pub struct StatsLoopLogger {
    start: Instant,
    frames: u64,
    timings: BTreeMap<String, Running>,
    metrics: BTreeMap<String, Running>,
}

impl StatsLoopLogger {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            frames: 0,
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Mean duration of a stage in milliseconds.
    pub fn mean_timing(&self, stage: &str) -> Option<f64> {
        self.timings.get(stage).map(Running::mean)
    }

    pub fn mean_metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).map(Running::mean)
    }
}

impl Default for StatsLoopLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopLogger for StatsLoopLogger {
    fn frame(&mut self) {
        self.frames += 1;
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn summary(&self) -> Option<String> {
        if self.frames == 0 {
            return None;
        }
        let elapsed = self.start.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Loop summary ({} frames, {elapsed:.1}s, {:.1} fps):",
            self.frames,
            self.frames as f64 / elapsed.max(f64::EPSILON)
        )];
        for (stage, t) in &self.timings {
            lines.push(format!(
                "  {stage:8}: avg {:6.2}ms  max {:6.2}ms",
                t.mean(),
                t.max
            ));
        }
        for (name, m) in &self.metrics {
            lines.push(format!("  {name}: avg {:.2}  max {:.0}", m.mean(), m.max));
        }
        Some(lines.join("\n"))
    }
}
