//! Chart specifications and the two builders that derive them from the dataset.
//!
//! A [`ChartSpec`] says *what* to draw (slices or points, labels, title,
//! colours) and nothing about *how*. Rendering goes through [`ChartBackend`],
//! so builders never touch a plotting library.

pub mod payload;
pub mod success;

use serde::Serialize;

use crate::color::Rgb;

pub use payload::payload_correlation;
pub use success::success_breakdown;

/// The two chart families the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Scatter,
}

/// One pie wedge: a category and its (non-negative) count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Points sharing one colour group (booster category).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartData {
    Pie { slices: Vec<PieSlice> },
    Scatter { series: Vec<ScatterSeries> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
}

/// Renderer-independent description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    #[serde(flatten)]
    pub data: ChartData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axes: Option<AxisLabels>,
}

impl ChartSpec {
    pub fn kind(&self) -> ChartKind {
        match self.data {
            ChartData::Pie { .. } => ChartKind::Pie,
            ChartData::Scatter { .. } => ChartKind::Scatter,
        }
    }

    /// Category labels in draw order: slice labels or series names.
    pub fn labels(&self) -> Vec<&str> {
        match &self.data {
            ChartData::Pie { slices } => slices.iter().map(|s| s.label.as_str()).collect(),
            ChartData::Scatter { series } => series.iter().map(|s| s.name.as_str()).collect(),
        }
    }

    /// Sum of slice values (0 for scatter charts).
    pub fn slice_total(&self) -> u64 {
        match &self.data {
            ChartData::Pie { slices } => slices.iter().map(|s| s.value).sum(),
            ChartData::Scatter { .. } => 0,
        }
    }

    /// Number of scatter points (0 for pie charts).
    pub fn point_count(&self) -> usize {
        match &self.data {
            ChartData::Pie { .. } => 0,
            ChartData::Scatter { series } => series.iter().map(|s| s.points.len()).sum(),
        }
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match &self.data {
            ChartData::Pie { slices } => slices.is_empty(),
            ChartData::Scatter { series } => series.iter().all(|s| s.points.is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering seam
// ---------------------------------------------------------------------------

/// A charting collaborator: turns a spec into something it can display.
pub trait ChartBackend {
    type Figure;

    fn build_chart(&self, spec: &ChartSpec) -> Self::Figure;
}
