use std::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::common::config::GridSettings;
use crate::model::{COLUMNS, GridSpan, MAX_ROW_SPAN};

// Used when no candidate span gets closer than infinity (NaN input).
const FALLBACK_COLUMN_SPAN: u8 = 1;
const FALLBACK_ROW_SPAN: u8 = 2;

/// Width of the grid container as last measured by the host.
///
/// Clones share the same cell: an observer keeps one handle and writes to it
/// whenever the viewport changes, the engine keeps another and reads the
/// latest value on every resize computation.
#[derive(Debug, Clone)]
pub struct ContainerWidth(Arc<AtomicU64>);

impl ContainerWidth {
    pub fn new(width: f64) -> Self { Self(Arc::new(AtomicU64::new(width.to_bits()))) }

    pub fn get(&self) -> f64 { f64::from_bits(self.0.load(Ordering::Relaxed)) }

    pub fn set(&self, width: f64) { self.0.store(width.to_bits(), Ordering::Relaxed); }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Pixel limits the host applies to its resize handles.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ResizeBounds {
    pub min: Size,
    pub max: Size,
}

/// Pixel extents of every span, for the host's snap grid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapPoints {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Span <-> pixel conversions for one container width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    container_width: f64,
    row_height: f64,
    gap: f64,
}

impl GridGeometry {
    pub fn new(container_width: f64, row_height: f64, gap: f64) -> Self {
        Self { container_width, row_height, gap }
    }

    pub fn from_settings(settings: &GridSettings, container_width: f64) -> Self {
        Self::new(container_width, settings.row_height, settings.gap)
    }

    pub fn container_width(&self) -> f64 { self.container_width }

    pub fn row_height(&self) -> f64 { self.row_height }

    pub fn gap(&self) -> f64 { self.gap }

    pub fn column_width(&self) -> f64 {
        let columns = COLUMNS as f64;
        (self.container_width - self.gap * (columns - 1.0)) / columns
    }

    pub fn span_width(&self, span: u8) -> f64 {
        let span = span as f64;
        self.column_width() * span + self.gap * (span - 1.0)
    }

    pub fn span_height(&self, span: u8) -> f64 {
        let span = span as f64;
        self.row_height * span + self.gap * (span - 1.0)
    }

    pub fn span_size(&self, span: GridSpan) -> Size {
        Size {
            width: self.span_width(span.column_span()),
            height: self.span_height(span.row_span()),
        }
    }

    /// Closest column span to `width`. Exact ties go to the narrower span.
    pub fn nearest_column_span(&self, width: f64) -> u8 {
        nearest_span(width, 1..=COLUMNS, FALLBACK_COLUMN_SPAN, |span| self.span_width(span))
    }

    /// Closest row span to `height`. Exact ties go to the shorter span.
    pub fn nearest_row_span(&self, height: f64) -> u8 {
        nearest_span(height, 1..=MAX_ROW_SPAN, FALLBACK_ROW_SPAN, |span| self.span_height(span))
    }

    pub fn nearest_span(&self, width: f64, height: f64) -> GridSpan {
        GridSpan::new(self.nearest_column_span(width) as i64, self.nearest_row_span(height) as i64)
    }

    pub fn resize_bounds(&self) -> ResizeBounds {
        ResizeBounds {
            min: Size { width: self.column_width(), height: self.row_height },
            max: Size {
                width: self.container_width,
                height: self.span_height(MAX_ROW_SPAN),
            },
        }
    }

    pub fn snap_points(&self) -> SnapPoints {
        SnapPoints {
            x: (1..=COLUMNS).map(|span| self.span_width(span)).collect(),
            y: (1..=MAX_ROW_SPAN).map(|span| self.span_height(span)).collect(),
        }
    }

    /// Host-side clamp matching the resize handle limits.
    pub fn clamp_to_bounds(&self, width: f64, height: f64) -> Size {
        let bounds = self.resize_bounds();
        Size {
            width: width.max(bounds.min.width).min(bounds.max.width),
            height: height.max(bounds.min.height).min(bounds.max.height),
        }
    }
}

// Scans in increasing order and only replaces the best on a strictly smaller
// distance, so ties resolve to the lower span.
fn nearest_span(
    target: f64,
    candidates: RangeInclusive<u8>,
    fallback: u8,
    extent: impl Fn(u8) -> f64,
) -> u8 {
    let mut best = fallback;
    let mut best_distance = f64::INFINITY;
    for span in candidates {
        let distance = (target - extent(span)).abs();
        if distance < best_distance {
            best_distance = distance;
            best = span;
        }
    }
    best
}
