//! Turning the checked fields of all dataset tabs into a figure of scatter
//! subplots. Everything in here is independent of the GUI.

pub mod elapsed;
mod render;

pub use render::consolidated_plot;

use csv_table::{Table, TableError};
use thiserror::Error;

/// Name of the x-axis after a timestamp column was converted.
pub const TIME_SERIES_ADJUSTED: &str = "Time (Seconds)";

#[derive(Debug, Error)]
pub enum PlotError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("unable to convert column '{column}' to elapsed seconds: {reason}")]
    Timestamp { column: String, reason: String },
}

/// Layout of the subplots, `rows` x `cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubplotGrid {
    pub rows: usize,
    pub cols: usize,
}

impl SubplotGrid {
    /// An odd number of tabs is stacked in a single column, an even number
    /// is split into two columns. Zero tabs have no layout.
    pub fn for_tabs(num_tabs: usize) -> Option<Self> {
        match num_tabs {
            0 => None,
            n if n % 2 == 1 => Some(Self { rows: n, cols: 1 }),
            n => Some(Self {
                rows: n / 2,
                cols: 2,
            }),
        }
    }

    /// Rows and columns as a compact string, e.g. `"31"` for three rows and
    /// one column.
    pub fn code(&self) -> String {
        format!("{}{}", self.rows, self.cols)
    }

    /// Row and column of the subplot with the (zero-based) `index`.
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }
}

/// Filter field of a tab plus the values that should be plotted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub field: String,
    pub values: Vec<String>,
}

/// What the user checked in one dataset tab, collected when plotting.
#[derive(Debug, Clone)]
pub struct TabSelection<'a> {
    pub name: String,
    pub table: &'a Table,
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub filter: Option<FilterSelection>,
}

impl TabSelection<'_> {
    pub fn is_active(&self) -> bool {
        !self.x.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

/// A y-axis of a subplot with everything drawn against it. All axes of a
/// subplot share the x-axis; all but the first are twins.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub y_label: String,
    pub twin: bool,
    pub series: Vec<ScatterSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subplot {
    pub tab: String,
    pub index: usize,
    pub title: String,
    pub x_label: String,
    pub axes: Vec<Axes>,
    pub legend: bool,
}

impl Subplot {
    pub fn series(&self) -> impl Iterator<Item = &ScatterSeries> {
        self.axes.iter().flat_map(|ax| ax.series.iter())
    }
}

/// The drawing surface: rebuilt from scratch on every plot action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Figure {
    pub grid: Option<SubplotGrid>,
    pub subplots: Vec<Subplot>,
}

impl Figure {
    pub fn clear(&mut self) {
        self.grid = None;
        self.subplots.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.subplots.is_empty()
    }

    pub fn num_series(&self) -> usize {
        self.subplots.iter().map(|s| s.series().count()).sum()
    }
}
