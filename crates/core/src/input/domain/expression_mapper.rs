//! Maps face metrics onto input events.
//!
//! | expression          | event                      |
//! |---------------------|----------------------------|
//! | blink / squint      | `Primary` press / release  |
//! | open mouth          | `Secondary` press / release|
//! | smile               | `Tertiary` press / release |
//! | tilt head left/right| `MoveLeft` / `MoveRight`   |
//! | look up / down      | `MoveUp` / `MoveDown`      |
//!
//! Directions are one-shot: they fire on entering the pose and stay quiet
//! until the head returns past the threshold.

use serde::{Deserialize, Serialize};

use crate::detection::domain::face_metrics::FaceMetrics;
use crate::shared::constants::{
    DEFAULT_BLINK_THRESHOLD, DEFAULT_MOUTH_THRESHOLD, DEFAULT_PITCH_DOWN_THRESHOLD,
    DEFAULT_PITCH_UP_THRESHOLD, DEFAULT_SMILE_THRESHOLD, DEFAULT_TILT_THRESHOLD,
};

use super::edge_trigger::{Edge, EdgeTrigger};
use super::input_event::{Button, InputEvent, InputKind, ProviderKind};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub blink: f64,
    pub mouth: f64,
    pub smile: f64,
    pub tilt_degrees: f64,
    pub pitch_up: f64,
    pub pitch_down: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            blink: DEFAULT_BLINK_THRESHOLD,
            mouth: DEFAULT_MOUTH_THRESHOLD,
            smile: DEFAULT_SMILE_THRESHOLD,
            tilt_degrees: DEFAULT_TILT_THRESHOLD,
            pitch_up: DEFAULT_PITCH_UP_THRESHOLD,
            pitch_down: DEFAULT_PITCH_DOWN_THRESHOLD,
        }
    }
}

pub struct ExpressionMapper {
    blink: EdgeTrigger,
    mouth: EdgeTrigger,
    smile: EdgeTrigger,
    tilt_left: EdgeTrigger,
    tilt_right: EdgeTrigger,
    look_up: EdgeTrigger,
    look_down: EdgeTrigger,
    mirror: bool,
}

impl ExpressionMapper {
    /// With `mirror` unset the camera image is assumed unmirrored, so a head
    /// tilted toward the person's right shoulder shows up as negative roll.
    pub fn new(thresholds: &Thresholds, mirror: bool) -> Self {
        let tilt = thresholds.tilt_degrees.abs();
        Self {
            blink: EdgeTrigger::at_least(thresholds.blink),
            mouth: EdgeTrigger::at_least(thresholds.mouth),
            smile: EdgeTrigger::at_least(thresholds.smile),
            tilt_left: EdgeTrigger::at_least(tilt),
            tilt_right: EdgeTrigger::at_most(-tilt),
            look_up: EdgeTrigger::at_most(thresholds.pitch_up),
            look_down: EdgeTrigger::at_least(thresholds.pitch_down),
            mirror,
        }
    }

    /// Events for one frame's metrics. A missing metric leaves its trigger
    /// untouched.
    pub fn map(&mut self, metrics: &FaceMetrics) -> Vec<InputEvent> {
        let mut events = Vec::new();

        action(&mut self.blink, metrics.eye_closure, Button::Primary, &mut events);
        action(&mut self.mouth, metrics.mouth_openness, Button::Secondary, &mut events);
        action(&mut self.smile, metrics.smile, Button::Tertiary, &mut events);

        let roll = metrics
            .roll_degrees
            .map(|r| if self.mirror { -r } else { r });
        direction(&mut self.tilt_left, roll, InputKind::MoveLeft, &mut events);
        direction(&mut self.tilt_right, roll, InputKind::MoveRight, &mut events);
        direction(&mut self.look_up, metrics.pitch_ratio, InputKind::MoveUp, &mut events);
        direction(&mut self.look_down, metrics.pitch_ratio, InputKind::MoveDown, &mut events);

        events
    }

    pub fn reset(&mut self) {
        for trigger in [
            &mut self.blink,
            &mut self.mouth,
            &mut self.smile,
            &mut self.tilt_left,
            &mut self.tilt_right,
            &mut self.look_up,
            &mut self.look_down,
        ] {
            trigger.reset();
        }
    }
}

fn action(trigger: &mut EdgeTrigger, value: Option<f64>, button: Button, out: &mut Vec<InputEvent>) {
    let Some(value) = value else { return };
    let kind = match trigger.update(value) {
        Some(Edge::Rising) => InputKind::ActionPress(button),
        Some(Edge::Falling) => InputKind::ActionRelease(button),
        None => return,
    };
    out.push(InputEvent::new(kind, ProviderKind::MediapipeFace).with_value(value));
}

fn direction(trigger: &mut EdgeTrigger, value: Option<f64>, kind: InputKind, out: &mut Vec<InputEvent>) {
    let Some(value) = value else { return };
    if trigger.update(value) == Some(Edge::Rising) {
        out.push(InputEvent::new(kind, ProviderKind::MediapipeFace).with_value(value));
    }
}
