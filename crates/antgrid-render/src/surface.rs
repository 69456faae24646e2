#![forbid(unsafe_code)]

//! The drawing boundary.
//!
//! A [`Surface`] is one independently cleared 2D layer (a canvas element in a
//! browser host, a [`RecordingSurface`](crate::RecordingSurface) in tests).
//! The renderer only ever issues the handful of primitives below, always
//! through an [`Affine`] that maps world coordinates to surface pixels.

use std::fmt;

use antgrid_core::{CanvasSize, Color};
use antgrid_viewport::Transform;
use bitflags::bitflags;

bitflags! {
    /// The three layers, bottom to top.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Layers: u8 {
        /// Background fill and grid lines.
        const GRID     = 0b001;
        /// Committed cell colors.
        const CELLS    = 0b010;
        /// Ants.
        const ENTITIES = 0b100;
    }
}

/// A point in whatever space the current transform maps from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shrink by `by` on every side.
    #[must_use]
    pub fn inset(self, by: f64) -> Self {
        Self::new(
            self.x + by,
            self.y + by,
            self.width - 2.0 * by,
            self.height - 2.0 * by,
        )
    }
}

/// A straight line from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    #[inline]
    #[must_use]
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

/// Stroke style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a Color,
    pub width: f64,
}

/// Uniform scale plus offset: `p' = p·scale + offset`.
///
/// The builder methods post-multiply, so they read in the same order as
/// canvas calls: `IDENTITY.translate(c).scale(s).translate(t)` maps `p` to
/// `(p + t)·s + c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Affine {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    /// The world-to-pixel map for a viewport: translate to the canvas center,
    /// scale, then translate by the viewport offset.
    #[must_use]
    pub fn view(canvas: CanvasSize, transform: &Transform) -> Self {
        let center = canvas.center();
        Self::IDENTITY
            .translate(center.x, center.y)
            .scale(transform.scale)
            .translate(transform.translate_x, transform.translate_y)
    }

    /// `self ∘ inner`: apply `inner` first.
    #[must_use]
    pub fn then_inner(self, inner: Self) -> Self {
        Self {
            scale: self.scale * inner.scale,
            offset_x: self.scale * inner.offset_x + self.offset_x,
            offset_y: self.scale * inner.offset_y + self.offset_y,
        }
    }

    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        self.then_inner(Self {
            scale: 1.0,
            offset_x: dx,
            offset_y: dy,
        })
    }

    #[must_use]
    pub fn scale(self, s: f64) -> Self {
        self.then_inner(Self {
            scale: s,
            offset_x: 0.0,
            offset_y: 0.0,
        })
    }

    #[inline]
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.offset_x,
            p.y * self.scale + self.offset_y,
        )
    }

    #[must_use]
    pub fn apply_rect(&self, r: Rect) -> Rect {
        let origin = self.apply(Point::new(r.x, r.y));
        Rect::new(origin.x, origin.y, r.width * self.scale, r.height * self.scale)
    }

    /// Scale a length (radius, stroke width).
    #[inline]
    #[must_use]
    pub fn apply_len(&self, len: f64) -> f64 {
        len * self.scale
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Why a surface could not be drawn to this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// The canvas has no area (not laid out yet, or hidden).
    ZeroSized { width: f64, height: f64 },
    /// The host could not provide a drawing context.
    Unavailable(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSized { width, height } => {
                write!(f, "surface has no area ({width}x{height})")
            }
            Self::Unavailable(reason) => write!(f, "surface unavailable: {reason}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// One drawable layer.
///
/// `clear` and `fill_background` cover the whole surface regardless of the
/// current transform; every other primitive goes through it.
pub trait Surface {
    /// Make the backing store `size`. Returns whether it was resized, which
    /// discards its content.
    fn prepare(&mut self, size: CanvasSize) -> Result<bool, SurfaceError>;

    /// Current backing size.
    fn size(&self) -> CanvasSize;

    fn set_transform(&mut self, affine: Affine);

    fn clear(&mut self);

    fn fill_background(&mut self, color: &Color);

    fn clear_rect(&mut self, rect: Rect);

    fn fill_rect(&mut self, rect: Rect, color: &Color);

    /// Stroke all segments as one path.
    fn stroke_segments(&mut self, segments: &[Segment], stroke: Stroke<'_>);

    fn fill_circle(&mut self, center: Point, radius: f64, color: &Color);

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke<'_>);
}
