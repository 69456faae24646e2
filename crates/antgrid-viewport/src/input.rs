#![forbid(unsafe_code)]

//! Input dispatch: raw pointer, wheel, and touch events to transform changes.
//!
//! # State Machine
//!
//! ```text
//!            MouseDown                 TouchStart(1)             TouchStart(2)
//!   Idle ───────────────▶ MouseDrag     Idle ──────▶ TouchPan ───────────▶ Pinch
//!     ▲                       │           ▲     (pending until          │
//!     └──── MouseUp ──────────┘           │      threshold crossed)     │
//!                                         └──── TouchEnd(0) ◀───────────┘
//! ```
//!
//! # Invariants
//!
//! 1. Pans are computed from the transform captured when the gesture started
//!    plus the total pointer delta, never accumulated per event.
//! 2. A one-finger touch only pans once either axis moves past the tap
//!    threshold; a touch that never crossed it ends as a tap.
//! 3. A pinch scales from the scale captured at pinch start, anchored at the
//!    current finger midpoint.
//! 4. Every transform-changing event requests a full cell repaint and
//!    re-arms the settle timer.

use antgrid_core::ScreenPoint;
use smallvec::SmallVec;
use web_time::Instant;

use crate::transform::{Transform, zoom_about};
use crate::viewport::Viewport;

/// Active touch points, in the order the host reports them.
pub type Touches = SmallVec<[ScreenPoint; 2]>;

/// Raw input, already converted to canvas-relative pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseDown(ScreenPoint),
    MouseMove(ScreenPoint),
    MouseUp(ScreenPoint),
    /// The host's click event, delivered after `MouseUp`.
    Click(ScreenPoint),
    Wheel { at: ScreenPoint, delta_y: f64 },
    TouchStart(Touches),
    TouchMove(Touches),
    /// Touches still down after the end.
    TouchEnd(Touches),
}

/// What an input event did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputOutcome {
    /// The transform changed.
    pub transform_changed: bool,
    /// A click or tap landed at this pixel and should be routed to the
    /// current interaction mode.
    pub tap: Option<ScreenPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) enum Gesture {
    #[default]
    Idle,
    MouseDrag {
        start: ScreenPoint,
        origin: Transform,
        moved: bool,
    },
    TouchPan {
        start: ScreenPoint,
        origin: Transform,
        last: ScreenPoint,
        moved: bool,
    },
    Pinch {
        start_distance: f64,
        start_scale: f64,
    },
}

impl Viewport {
    /// Feed one input event at time `now`.
    pub fn handle(&mut self, event: &InputEvent, now: Instant) -> InputOutcome {
        match event {
            InputEvent::MouseDown(p) => {
                self.gesture = Gesture::MouseDrag {
                    start: *p,
                    origin: self.transform,
                    moved: false,
                };
                self.suppress_click = false;
                InputOutcome::default()
            }
            InputEvent::MouseMove(p) => self.on_mouse_move(*p),
            InputEvent::MouseUp(_) => {
                if let Gesture::MouseDrag { moved, .. } = self.gesture {
                    self.suppress_click = moved;
                    self.gesture = Gesture::Idle;
                    self.settle.arm(now, self.config.pointer_settle);
                }
                InputOutcome::default()
            }
            InputEvent::Click(p) => {
                let tap = (!std::mem::take(&mut self.suppress_click)).then_some(*p);
                InputOutcome {
                    transform_changed: false,
                    tap,
                }
            }
            InputEvent::Wheel { at, delta_y } => self.on_wheel(*at, *delta_y, now),
            InputEvent::TouchStart(touches) => {
                self.on_touch_start(touches);
                InputOutcome::default()
            }
            InputEvent::TouchMove(touches) => self.on_touch_move(touches),
            InputEvent::TouchEnd(remaining) => self.on_touch_end(remaining, now),
        }
    }

    fn on_mouse_move(&mut self, p: ScreenPoint) -> InputOutcome {
        let Gesture::MouseDrag {
            start,
            origin,
            moved,
        } = self.gesture
        else {
            return InputOutcome::default();
        };
        let moved = moved || exceeds(start, p, self.config.tap_threshold);
        self.gesture = Gesture::MouseDrag {
            start,
            origin,
            moved,
        };
        self.begin_heavy_repaint();
        self.settle.cancel();
        let changed = self.pan_from(origin, start, p);
        InputOutcome {
            transform_changed: changed,
            tap: None,
        }
    }

    fn on_wheel(&mut self, at: ScreenPoint, delta_y: f64, now: Instant) -> InputOutcome {
        let step = self.config.zoom_step;
        let delta = if delta_y > 0.0 {
            -step
        } else if delta_y < 0.0 {
            step
        } else {
            return InputOutcome::default();
        };
        self.begin_heavy_repaint();
        self.settle.arm(now, self.config.wheel_settle);
        let changed = self.zoom_at(at, delta);
        tracing::trace!(target: "antgrid.viewport", delta, scale = self.transform.scale, "wheel zoom");
        InputOutcome {
            transform_changed: changed,
            tap: None,
        }
    }

    fn on_touch_start(&mut self, touches: &Touches) {
        self.settle.cancel();
        match touches.as_slice() {
            [] => {}
            [single] => {
                self.gesture = Gesture::TouchPan {
                    start: *single,
                    origin: self.transform,
                    last: *single,
                    moved: false,
                };
            }
            [a, b, ..] => {
                self.gesture = Gesture::Pinch {
                    start_distance: a.distance(*b),
                    start_scale: self.transform.scale,
                };
            }
        }
    }

    fn on_touch_move(&mut self, touches: &Touches) -> InputOutcome {
        let mut outcome = InputOutcome::default();
        match (self.gesture, touches.as_slice()) {
            (
                Gesture::Pinch {
                    start_distance,
                    start_scale,
                },
                [a, b, ..],
            ) => {
                if start_distance <= 0.0 {
                    return outcome;
                }
                let distance = a.distance(*b);
                let ratio = (distance - start_distance) / start_distance;
                let scale = self
                    .limits()
                    .clamp(start_scale * (1.0 + ratio * self.config.pinch_sensitivity));
                let next = zoom_about(self.projection(), &self.transform, a.midpoint(*b), scale);
                self.begin_heavy_repaint();
                outcome.transform_changed = self.apply(next);
            }
            (
                Gesture::TouchPan {
                    start,
                    origin,
                    moved,
                    ..
                },
                [p, ..],
            ) => {
                let moved = moved || exceeds(start, *p, self.config.tap_threshold);
                self.gesture = Gesture::TouchPan {
                    start,
                    origin,
                    last: *p,
                    moved,
                };
                if moved {
                    self.begin_heavy_repaint();
                    outcome.transform_changed = self.pan_from(origin, start, *p);
                }
            }
            _ => {}
        }
        outcome
    }

    fn on_touch_end(&mut self, remaining: &Touches, now: Instant) -> InputOutcome {
        let mut outcome = InputOutcome::default();
        match (self.gesture, remaining.as_slice()) {
            (Gesture::TouchPan { last, moved, .. }, []) => {
                if !moved {
                    outcome.tap = Some(last);
                }
                self.gesture = Gesture::Idle;
            }
            (Gesture::Pinch { .. }, [single]) => {
                // Continue as a pan from here, never as a tap.
                self.gesture = Gesture::TouchPan {
                    start: *single,
                    origin: self.transform,
                    last: *single,
                    moved: true,
                };
            }
            (_, []) => self.gesture = Gesture::Idle,
            _ => {}
        }
        self.settle.arm(now, self.config.touch_settle);
        outcome
    }

    fn pan_from(&mut self, origin: Transform, start: ScreenPoint, p: ScreenPoint) -> bool {
        let scale = self.transform.scale;
        self.apply(Transform::new(
            scale,
            origin.translate_x + (p.x - start.x) / scale,
            origin.translate_y + (p.y - start.y) / scale,
        ))
    }
}

fn exceeds(start: ScreenPoint, p: ScreenPoint, threshold: f64) -> bool {
    (p.x - start.x).abs() > threshold || (p.y - start.y).abs() > threshold
}
