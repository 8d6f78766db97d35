mod logic;
mod ui;

pub use logic::save_svg;

use crate::plotting::Figure;

#[derive(Debug, Default)]
pub struct Plotter {
    figure: Figure,
    /// Set by "Reset View", consumed by the next render.
    reset_requested: bool,
}

impl Plotter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn set_figure(&mut self, figure: Figure) {
        self.figure = figure;
        self.reset_requested = true;
    }

    pub fn clear(&mut self) {
        self.figure.clear();
    }

    pub fn reset_view(&mut self) {
        self.reset_requested = true;
    }
}
