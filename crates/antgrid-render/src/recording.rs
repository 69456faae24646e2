#![forbid(unsafe_code)]

//! Headless surface that records what would have been drawn.
//!
//! Coordinates are recorded in surface pixels (the current [`Affine`] already
//! applied), so tests can assert on where things land on screen.

use antgrid_core::{CanvasSize, Color};

use crate::surface::{Affine, Point, Rect, Segment, Stroke, Surface, SurfaceError};

/// One recorded primitive, in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Backing store resized (content discarded).
    Resize(CanvasSize),
    Clear,
    Background(Color),
    ClearRect(Rect),
    FillRect { rect: Rect, color: Color },
    Segments { segments: Vec<Segment>, color: Color, width: f64 },
    FillCircle { center: Point, radius: f64, color: Color },
    StrokeCircle { center: Point, radius: f64, color: Color, width: f64 },
}

/// A [`Surface`] that keeps a log of [`DrawOp`]s.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size: CanvasSize,
    affine: Affine,
    ops: Vec<DrawOp>,
    unavailable: Option<String>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `prepare` calls fail until cleared with `None`.
    pub fn set_unavailable(&mut self, reason: Option<&str>) {
        self.unavailable = reason.map(str::to_owned);
    }

    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the log.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Every recorded `FillRect`.
    pub fn filled_rects(&self) -> impl Iterator<Item = (&Rect, &Color)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::FillRect { rect, color } => Some((rect, color)),
            _ => None,
        })
    }

    /// Whether the log contains a full clear.
    #[must_use]
    pub fn was_cleared(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, DrawOp::Clear | DrawOp::Resize(_)))
    }
}

impl Surface for RecordingSurface {
    fn prepare(&mut self, size: CanvasSize) -> Result<bool, SurfaceError> {
        if let Some(reason) = &self.unavailable {
            return Err(SurfaceError::Unavailable(reason.clone()));
        }
        if size.is_empty() {
            return Err(SurfaceError::ZeroSized {
                width: size.width,
                height: size.height,
            });
        }
        if size == self.size {
            return Ok(false);
        }
        self.size = size;
        self.ops.push(DrawOp::Resize(size));
        Ok(true)
    }

    fn size(&self) -> CanvasSize {
        self.size
    }

    fn set_transform(&mut self, affine: Affine) {
        self.affine = affine;
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn fill_background(&mut self, color: &Color) {
        self.ops.push(DrawOp::Background(color.clone()));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::ClearRect(self.affine.apply_rect(rect)));
    }

    fn fill_rect(&mut self, rect: Rect, color: &Color) {
        self.ops.push(DrawOp::FillRect {
            rect: self.affine.apply_rect(rect),
            color: color.clone(),
        });
    }

    fn stroke_segments(&mut self, segments: &[Segment], stroke: Stroke<'_>) {
        let affine = self.affine;
        self.ops.push(DrawOp::Segments {
            segments: segments
                .iter()
                .map(|s| Segment::new(affine.apply(s.from), affine.apply(s.to)))
                .collect(),
            color: stroke.color.clone(),
            width: affine.apply_len(stroke.width),
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: &Color) {
        self.ops.push(DrawOp::FillCircle {
            center: self.affine.apply(center),
            radius: self.affine.apply_len(radius),
            color: color.clone(),
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke<'_>) {
        self.ops.push(DrawOp::StrokeCircle {
            center: self.affine.apply(center),
            radius: self.affine.apply_len(radius),
            color: stroke.color.clone(),
            width: self.affine.apply_len(stroke.width),
        });
    }
}
