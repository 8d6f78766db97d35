#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub mod plotting;

pub use app::config::Config;
pub use app::EguiApp;
