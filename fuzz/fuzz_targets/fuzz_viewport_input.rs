#![no_main]

use std::time::Duration;

use antgrid_core::{CanvasSize, GridSize, ScreenPoint};
use antgrid_viewport::{InputEvent, Touches, Viewport, ViewportConfig};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use web_time::Instant;

#[derive(Debug, Arbitrary)]
enum Op {
    Down(i16, i16),
    Move(i16, i16),
    Up(i16, i16),
    Click(i16, i16),
    Wheel(i16, i16, i8),
    TouchStart(Vec<(i16, i16)>),
    TouchMove(Vec<(i16, i16)>),
    TouchEnd(Vec<(i16, i16)>),
    Resize(u16, u16),
    ZoomIn,
    ZoomOut,
    Settle(u8),
}

fn pt(x: i16, y: i16) -> ScreenPoint {
    ScreenPoint::new(f64::from(x), f64::from(y))
}

fn touches(list: &[(i16, i16)]) -> Touches {
    list.iter().take(3).map(|&(x, y)| pt(x, y)).collect()
}

fuzz_target!(|input: (u8, Vec<Op>)| {
    let side = u32::from(input.0).max(1);
    let mut vp = Viewport::new(GridSize::new(side, side), ViewportConfig::default());
    vp.resize(CanvasSize::new(800.0, 600.0));
    let mut now = Instant::now();

    for op in input.1.iter().take(256) {
        let event = match op {
            Op::Down(x, y) => Some(InputEvent::MouseDown(pt(*x, *y))),
            Op::Move(x, y) => Some(InputEvent::MouseMove(pt(*x, *y))),
            Op::Up(x, y) => Some(InputEvent::MouseUp(pt(*x, *y))),
            Op::Click(x, y) => Some(InputEvent::Click(pt(*x, *y))),
            Op::Wheel(x, y, d) => Some(InputEvent::Wheel {
                at: pt(*x, *y),
                delta_y: f64::from(*d),
            }),
            Op::TouchStart(t) => Some(InputEvent::TouchStart(touches(t))),
            Op::TouchMove(t) => Some(InputEvent::TouchMove(touches(t))),
            Op::TouchEnd(t) => Some(InputEvent::TouchEnd(touches(t))),
            Op::Resize(w, h) => {
                vp.resize(CanvasSize::new(f64::from(*w), f64::from(*h)));
                None
            }
            Op::ZoomIn => {
                vp.zoom_in();
                None
            }
            Op::ZoomOut => {
                vp.zoom_out();
                None
            }
            Op::Settle(ms) => {
                now += Duration::from_millis(u64::from(*ms) * 4);
                vp.poll_settle(now);
                None
            }
        };
        if let Some(event) = event {
            vp.handle(&event, now);
        }

        // The scale never leaves its limits.
        let scale = vp.transform().scale;
        assert!(scale.is_finite());
        assert!(vp.limits().contains(scale), "scale {scale} outside {:?}", vp.limits());
    }
});
