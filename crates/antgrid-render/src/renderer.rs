#![forbid(unsafe_code)]

//! Three-layer renderer with incremental cell repaint.
//!
//! # Repaint rules
//!
//! | Layer      | Repainted when                                              |
//! |------------|-------------------------------------------------------------|
//! | `GRID`     | canvas size, cell size, grid size, or view revision changed  |
//! | `CELLS`    | fully on any of the above, while a gesture is in flight, or  |
//! |            | after a snapshot or several coalesced diffs; otherwise only |
//! |            | the latest diff's keys                                      |
//! | `ENTITIES` | every frame                                                 |
//!
//! The renderer reads the store and viewport but never mutates them. A
//! historical baseline is painted once per baseline generation; the caller
//! releases it from the store when [`FrameReport::baseline_painted`] is set.

use antgrid_core::{Ant, CanvasSize, CellKey, Color, GridSize};
use antgrid_store::GameStore;
use antgrid_viewport::{Projection, Viewport};

use crate::config::RenderConfig;
use crate::surface::{Affine, Layers, Point, Rect, Segment, Stroke, Surface, SurfaceError};

/// The three surfaces, bottom to top.
#[derive(Debug, Default)]
pub struct LayerSet<S> {
    pub grid: S,
    pub cells: S,
    pub entities: S,
}

/// What happened to the cell layer this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRepaint {
    /// Nothing new to paint.
    Unchanged,
    /// Only the latest diff (and possibly the baseline) was painted.
    Incremental { cells: usize },
    /// Cleared and repainted from the canonical cell map.
    Full { cells: usize },
}

impl CellRepaint {
    #[must_use]
    pub fn is_full(self) -> bool {
        matches!(self, Self::Full { .. })
    }

    /// Number of cells drawn.
    #[must_use]
    pub fn painted(self) -> usize {
        match self {
            Self::Unchanged => 0,
            Self::Incremental { cells } | Self::Full { cells } => cells,
        }
    }
}

/// Summary of one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Layers that were drawn to.
    pub layers: Layers,
    pub cells: CellRepaint,
    pub ants: usize,
    /// The store's historical baseline was painted and can be released.
    pub baseline_painted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    canvas: CanvasSize,
    cell_size: f64,
    grid: GridSize,
    view_revision: u64,
}

/// Paints a [`GameStore`] through a [`Viewport`] onto three surfaces.
#[derive(Debug)]
pub struct LayeredRenderer<S: Surface> {
    config: RenderConfig,
    layers: LayerSet<S>,
    painted: Option<Layout>,
    snapshot_epoch: Option<u64>,
    diff_seq: u64,
    baseline_generation: u64,
}

impl<S: Surface> LayeredRenderer<S> {
    #[must_use]
    pub fn new(config: RenderConfig, layers: LayerSet<S>) -> Self {
        Self {
            config,
            layers,
            painted: None,
            snapshot_epoch: None,
            diff_seq: 0,
            baseline_generation: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[must_use]
    pub fn layers(&self) -> &LayerSet<S> {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerSet<S> {
        &mut self.layers
    }

    /// Force every layer to repaint on the next frame.
    pub fn invalidate(&mut self) {
        self.painted = None;
    }

    /// Render one frame.
    ///
    /// # Errors
    ///
    /// [`SurfaceError`] when the viewport is not laid out or a surface cannot
    /// be prepared. Nothing is drawn and the next successful frame repaints
    /// every layer.
    pub fn frame(&mut self, store: &GameStore, viewport: &Viewport) -> Result<FrameReport, SurfaceError> {
        let projection = viewport.projection();
        let canvas = projection.canvas();
        if projection.is_degenerate() {
            self.painted = None;
            return Err(SurfaceError::ZeroSized {
                width: canvas.width,
                height: canvas.height,
            });
        }
        let resized = match self.prepare_all(canvas) {
            Ok(resized) => resized,
            Err(err) => {
                self.painted = None;
                return Err(err);
            }
        };

        let layout = Layout {
            canvas,
            cell_size: projection.cell_size(),
            grid: projection.grid(),
            view_revision: viewport.revision(),
        };
        let layout_changed = resized || self.painted != Some(layout);
        let affine = Affine::view(canvas, &viewport.transform());
        let mut layers = Layers::ENTITIES;

        if layout_changed {
            self.paint_grid(projection, affine);
            layers |= Layers::GRID;
        }

        // More than one diff since the last frame: the new-cells view only
        // holds the latest, so the earlier ones would never reach the layer.
        let coalesced = store.diff_seq() > self.diff_seq + 1;
        let full = layout_changed
            || coalesced
            || viewport.needs_full_repaint()
            || self.snapshot_epoch != Some(store.snapshot_epoch());
        let (cells, baseline_painted) = self.paint_cells(store, projection, affine, full);
        if cells != CellRepaint::Unchanged {
            layers |= Layers::CELLS;
        }

        let ants = self.paint_entities(store.ants(), projection, affine);

        self.painted = Some(layout);
        self.snapshot_epoch = Some(store.snapshot_epoch());
        self.diff_seq = store.diff_seq();

        tracing::trace!(
            target: "antgrid.render",
            full,
            cells = cells.painted(),
            ants,
            grid = layers.contains(Layers::GRID),
            "frame"
        );
        Ok(FrameReport {
            layers,
            cells,
            ants,
            baseline_painted,
        })
    }

    fn prepare_all(&mut self, canvas: CanvasSize) -> Result<bool, SurfaceError> {
        let grid = self.layers.grid.prepare(canvas)?;
        let cells = self.layers.cells.prepare(canvas)?;
        let entities = self.layers.entities.prepare(canvas)?;
        Ok(grid || cells || entities)
    }

    // -------------------------------------------------------------------------
    // Grid lines
    // -------------------------------------------------------------------------

    fn paint_grid(&mut self, projection: &Projection, affine: Affine) {
        let surface = &mut self.layers.grid;
        surface.set_transform(Affine::IDENTITY);
        surface.fill_background(&self.config.background);
        surface.set_transform(affine);
        surface.stroke_segments(
            &grid_lines(projection),
            Stroke {
                color: &self.config.grid_line,
                width: self.config.line_width,
            },
        );
    }

    // -------------------------------------------------------------------------
    // Cells
    // -------------------------------------------------------------------------

    fn paint_cells(
        &mut self,
        store: &GameStore,
        projection: &Projection,
        affine: Affine,
        full: bool,
    ) -> (CellRepaint, bool) {
        let baseline = store
            .historical_baseline()
            .filter(|_| store.baseline_generation() != self.baseline_generation);
        if baseline.is_some() {
            self.baseline_generation = store.baseline_generation();
        }
        let baseline_painted = baseline.is_some();
        let painter = CellPainter {
            projection,
            line_width: self.config.line_width,
        };
        let surface = &mut self.layers.cells;
        surface.set_transform(affine);

        if full {
            surface.clear();
            for (key, color) in store.cells() {
                painter.paint(surface, *key, color);
            }
            // The canonical map already holds the baseline beneath live cells.
            return (CellRepaint::Full { cells: store.cells().len() }, baseline_painted);
        }

        let mut painted = 0;
        if let Some(baseline) = baseline {
            for (key, color) in baseline {
                painter.paint(surface, *key, store.color_at(*key).unwrap_or(color));
                painted += 1;
            }
        }
        if store.diff_seq() != self.diff_seq {
            for (key, color) in store.new_cells() {
                painter.paint(surface, *key, color);
                painted += 1;
            }
        }
        if painted == 0 {
            (CellRepaint::Unchanged, false)
        } else {
            (CellRepaint::Incremental { cells: painted }, baseline_painted)
        }
    }

    // -------------------------------------------------------------------------
    // Entities
    // -------------------------------------------------------------------------

    fn paint_entities(&mut self, ants: &[Ant], projection: &Projection, affine: Affine) -> usize {
        let surface = &mut self.layers.entities;
        surface.clear();
        surface.set_transform(affine);
        let cs = projection.cell_size();
        let (ox, oy) = projection.origin();
        let radius = cs * self.config.ant_radius_ratio;
        let outline = Stroke {
            color: &self.config.ant_outline,
            width: self.config.outline_width,
        };
        let heading = Stroke {
            color: &self.config.ant_outline,
            width: self.config.heading_width,
        };
        for ant in ants {
            let cell = ant.position.center();
            let center = Point::new(ox + cell.x * cs, oy + cell.y * cs);
            surface.fill_circle(center, radius, &ant.color);
            surface.stroke_circle(center, radius, outline);
            let angle = ant.direction.angle();
            let len = radius * self.config.heading_ratio;
            let tip = Point::new(center.x + angle.cos() * len, center.y + angle.sin() * len);
            surface.stroke_segments(&[Segment::new(center, tip)], heading);
        }
        ants.len()
    }
}

struct CellPainter<'a> {
    projection: &'a Projection,
    line_width: f64,
}

impl CellPainter<'_> {
    fn paint<S: Surface>(&self, surface: &mut S, key: CellKey, color: &Color) {
        let rect = cell_rect(self.projection, key);
        surface.clear_rect(rect);
        surface.fill_rect(rect.inset(self.line_width), color);
    }
}

/// World-space square of one cell.
#[must_use]
pub fn cell_rect(projection: &Projection, key: CellKey) -> Rect {
    let cs = projection.cell_size();
    let (ox, oy) = projection.origin();
    Rect::new(ox + f64::from(key.x) * cs, oy + f64::from(key.y) * cs, cs, cs)
}

/// Every vertical then every horizontal grid boundary, in world space.
#[must_use]
pub fn grid_lines(projection: &Projection) -> Vec<Segment> {
    let grid = projection.grid();
    let cs = projection.cell_size();
    let (ox, oy) = projection.origin();
    let (w, h) = projection.grid_extent();
    let columns = (0..=grid.width).map(|i| {
        let x = ox + f64::from(i) * cs;
        Segment::new(Point::new(x, oy), Point::new(x, oy + h))
    });
    let rows = (0..=grid.height).map(|j| {
        let y = oy + f64::from(j) * cs;
        Segment::new(Point::new(ox, y), Point::new(ox + w, y))
    });
    columns.chain(rows).collect()
}
