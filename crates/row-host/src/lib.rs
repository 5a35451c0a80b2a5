//! Windowed rendering surface for lists of variable-height rows.
//!
//! A [`RowHost`] never lays out every row. It keeps the last measured height
//! of each row (falling back to an estimate), a lazily extended cache of
//! cumulative offsets, and answers which rows intersect the viewport.

use std::collections::BTreeSet;
use std::ops::Range;

use serde::Serialize;

/// Height of one line of text, used until a row has been measured.
pub const DEFAULT_ESTIMATED_ROW_HEIGHT: f64 = 19.0;

/// Rows mounted above and below the visible window.
pub const DEFAULT_OVERSCAN: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Row {index} is out of range for {row_count} rows")]
    RowOutOfRange { index: usize, row_count: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowHostConfig {
    pub estimated_row_height: f64,
    pub overscan: usize,
}

impl Default for RowHostConfig {
    fn default() -> Self {
        Self {
            estimated_row_height: DEFAULT_ESTIMATED_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
        }
    }
}

impl RowHostConfig {
    #[must_use = "method moves the value of self and returns the modified value"]
    pub const fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    #[must_use = "method moves the value of self and returns the modified value"]
    pub const fn with_estimated_row_height(mut self, height: f64) -> Self {
        self.estimated_row_height = height;
        self
    }
}

/// A height reported by the rendering surface after laying out one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMeasurement {
    pub index: usize,
    pub height: f64,
}

/// Rows to show for one scroll position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowWindow {
    /// Rows intersecting the viewport.
    pub visible: Range<usize>,
    /// `visible` widened by the overscan on both sides, clamped to the list.
    pub mounted: Range<usize>,
}

impl RowWindow {
    const EMPTY: Self = Self {
        visible: 0..0,
        mounted: 0..0,
    };
}

/// Measurement state of one list. Each list owns its own host.
#[derive(Debug, Clone)]
pub struct RowHost {
    config: RowHostConfig,
    heights: Vec<Option<f64>>,
    /// Rows whose measurement must be (re)taken before it can be trusted.
    stale: BTreeSet<usize>,
    /// `offsets[i]` is the top of row `i`; only a valid prefix is kept.
    offsets: Vec<f64>,
    width: Option<f64>,
}

impl RowHost {
    pub fn new(config: RowHostConfig, row_count: usize) -> Self {
        Self {
            config,
            heights: vec![None; row_count],
            stale: BTreeSet::new(),
            offsets: vec![0.0],
            width: None,
        }
    }

    pub const fn config(&self) -> RowHostConfig {
        self.config
    }

    pub fn row_count(&self) -> usize {
        self.heights.len()
    }

    pub const fn width(&self) -> Option<f64> {
        self.width
    }

    /// Grows or shrinks the list. Measurements of surviving rows are kept.
    pub fn set_row_count(&mut self, row_count: usize) {
        self.heights.resize(row_count, None);
        self.stale.retain(|index| *index < row_count);
        self.offsets.truncate(row_count + 1);
    }

    /// Last measured height of `index`, or the estimate when unmeasured.
    pub fn row_height(&self, index: usize) -> f64 {
        self.heights
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(self.config.estimated_row_height)
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.heights.get(index).is_some_and(Option::is_some)
    }

    /// Merges one measurement into the height map.
    ///
    /// Returns whether layout changed. Offsets of rows at or before `index`
    /// stay valid; only rows after it are re-laid out. Heights that are zero,
    /// negative or not finite are ignored and the row stays pending.
    pub fn report_measurement(&mut self, measurement: RowMeasurement) -> Result<bool> {
        let RowMeasurement { index, height } = measurement;
        let row_count = self.row_count();
        if index >= row_count {
            return Err(Error::RowOutOfRange { index, row_count });
        }

        if !height.is_finite() || height <= 0.0 {
            log::warn!("ignoring height {height} reported for row {index}");
            self.stale.insert(index);
            return Ok(false);
        }

        self.stale.remove(&index);
        if self.heights[index] == Some(height) {
            return Ok(false);
        }

        self.heights[index] = Some(height);
        self.invalidate_after(index);
        Ok(true)
    }

    /// Records the width rows were measured at.
    ///
    /// Row heights depend on width (wrapping), so a different width than the
    /// recorded one drops every measurement. Returns whether that happened.
    pub fn set_width(&mut self, width: f64) -> bool {
        let changed = self.width.is_some_and(|previous| previous != width);
        if changed {
            log::debug!(
                "width changed from {:?} to {width}, dropping {} row measurements",
                self.width,
                self.heights.iter().filter(|h| h.is_some()).count()
            );
            self.heights.iter_mut().for_each(|h| *h = None);
            self.stale.clear();
            self.offsets.truncate(1);
        }
        self.width = Some(width);
        changed
    }

    /// Marks `index` for re-measurement after its content changed outside the
    /// host (e.g. a comment form opened below a line).
    ///
    /// The previous height stays in use until a new measurement arrives.
    pub fn request_remeasure(&mut self, index: usize) -> Result<()> {
        let row_count = self.row_count();
        if index >= row_count {
            return Err(Error::RowOutOfRange { index, row_count });
        }
        self.stale.insert(index);
        self.invalidate_after(index);
        Ok(())
    }

    fn invalidate_after(&mut self, index: usize) {
        self.offsets.truncate(index + 1);
    }

    fn ensure_offsets(&mut self, upto: usize) {
        while self.offsets.len() <= upto {
            let index = self.offsets.len() - 1;
            let next = self.offsets[index] + self.row_height(index);
            self.offsets.push(next);
        }
    }

    /// Top of row `index`. Indices past the end are clamped to the list bottom.
    pub fn offset_of(&mut self, index: usize) -> f64 {
        let index = index.min(self.row_count());
        self.ensure_offsets(index);
        self.offsets[index]
    }

    pub fn total_height(&mut self) -> f64 {
        self.offset_of(self.row_count())
    }

    /// Rows to render for a viewport of `viewport_height` scrolled to `scroll_top`.
    pub fn window(&mut self, scroll_top: f64, viewport_height: f64) -> RowWindow {
        let row_count = self.row_count();
        if row_count == 0 {
            return RowWindow::EMPTY;
        }

        self.ensure_offsets(row_count);
        let tops = &self.offsets[..row_count];
        let scroll_top = scroll_top.max(0.0);
        let bottom = scroll_top + viewport_height.max(0.0);

        let first = tops
            .partition_point(|top| *top <= scroll_top)
            .saturating_sub(1);
        let end = tops.partition_point(|top| *top < bottom).max(first);

        let overscan = self.config.overscan;
        RowWindow {
            visible: first..end,
            mounted: first.saturating_sub(overscan)..(end + overscan).min(row_count),
        }
    }

    /// Scroll position that brings `index` to the top of the viewport.
    pub fn scroll_offset_for(&mut self, index: usize) -> Option<f64> {
        (index < self.row_count()).then(|| self.offset_of(index))
    }

    /// Mounted rows that still need a (fresh) measurement.
    pub fn pending_measurements(&self, window: &RowWindow) -> Vec<usize> {
        window
            .mounted
            .clone()
            .filter(|index| !self.is_measured(*index) || self.stale.contains(index))
            .collect()
    }

    /// Drops all measurement state, as when the list is unmounted.
    pub fn reset(&mut self) {
        *self = Self::new(self.config, 0);
    }
}
