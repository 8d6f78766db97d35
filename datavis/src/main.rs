#![warn(clippy::all, rust_2018_idioms)]

use datavis::{Config, EguiApp};

const WINDOW_NAME: &str = "DATA VISUALIZER TOOL";
const MIN_WINDOW_WIDTH: f32 = 640.0;
const MIN_WINDOW_HEIGHT: f32 = 480.0;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::default();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_NAME)
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_NAME,
        native_options,
        Box::new(|cc| Ok(Box::new(EguiApp::new(cc, config)))),
    )
}
