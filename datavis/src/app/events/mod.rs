use std::{path::PathBuf, thread::JoinHandle};

use app_core::{
    event::{ActionOutcome, AppEvent, EventState},
    string_error::ErrorStringExt,
};
use derive_new::new;

use super::{components::save_svg, EguiApp, StatusLine};
use crate::plotting::{consolidated_plot, Figure};

pub use app_core::event::EventQueue;

// ---------------------------------------------------------------------------
//
//
// Running events
//
//
// ---------------------------------------------------------------------------

impl EguiApp {
    /// Apply all queued events. This is where every user action ends: its
    /// outcome is logged and shown in the status line, failures included.
    pub fn run_events(&mut self) {
        while let Some(mut event) = self.event_queue.next_event() {
            match event.apply(self) {
                Ok(EventState::Finished(outcome)) => {
                    match &outcome {
                        ActionOutcome::Success(msg) => log::info!("{msg}"),
                        ActionOutcome::Warning(msg) => log::warn!("{msg}"),
                    }
                    self.status = Some(StatusLine::from(outcome));
                    self.request_redraw();
                }
                Ok(EventState::Busy) => {
                    self.event_queue.defer(event);
                }
                Err(err) => {
                    log::error!("action failed: {err}");
                    self.status = Some(StatusLine::Error(err));
                    self.request_redraw();
                }
            }
        }
        self.event_queue.restore_backlog();
    }
}

// ---------------------------------------------------------------------------
//
//
// Events
//
//
// ---------------------------------------------------------------------------

/// Load the file picked in the (threaded) open dialog into a new tab.
#[derive(new)]
pub struct LoadDatasetRequested {
    thread_handle: Option<JoinHandle<Option<PathBuf>>>,
}

/// Replace the figure with a plot of the current selection of all tabs.
pub struct PlotRequested;

/// Write the current figure to the path picked in the save dialog.
#[derive(new)]
pub struct SavePlotRequested {
    thread_handle: Option<JoinHandle<Option<PathBuf>>>,
}

// ---------------------------------------------------------------------------
//
//
// apply()
//
//
// ---------------------------------------------------------------------------

impl AppEvent for LoadDatasetRequested {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        let Some(handle) = self.thread_handle.take_if(|handle| handle.is_finished()) else {
            return Ok(EventState::Busy);
        };
        match handle.join() {
            Ok(Some(path)) => app.dock.tabs.load_file(&path),
            Ok(None) => Ok(EventState::success("loading cancelled")),
            Err(err) => Err(format!("file dialog crashed: {err:?}")),
        }
    }
}

impl AppEvent for PlotRequested {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.plotter.clear();
        let requests = app
            .dock
            .plot_requests()
            .err_to_string("unable to collect selection")?;
        let mut figure = Figure::default();
        let drawn = consolidated_plot(&requests, &mut figure);
        let num_subplots = figure.subplots.len();
        // whatever was drawn before a failure stays on screen
        app.plotter.set_figure(figure);
        drawn.err_to_string("unable to plot")?;
        if num_subplots == 0 {
            return Ok(EventState::warning(
                "nothing to plot, check an X-axis field first",
            ));
        }
        Ok(EventState::success(format!("plotted {num_subplots} dataset(s)")))
    }
}

impl AppEvent for SavePlotRequested {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        let Some(handle) = self.thread_handle.take_if(|handle| handle.is_finished()) else {
            return Ok(EventState::Busy);
        };
        match handle.join() {
            Ok(Some(path)) => {
                save_svg(app.plotter.figure(), &app.config, &path)
                    .err_to_string("unable to save plot")?;
                Ok(EventState::success(format!("saved '{}'", path.display())))
            }
            Ok(None) => Ok(EventState::success("export cancelled")),
            Err(err) => Err(format!("file dialog crashed: {err:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::app::components::FieldRole;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Stands in for the native dialog that picked `path`.
    fn picked(path: &Path) -> Option<JoinHandle<Option<PathBuf>>> {
        let path = path.to_path_buf();
        Some(std::thread::spawn(move || Some(path)))
    }

    /// Run events until the queue is empty, like consecutive frames would.
    fn run_until_done(app: &mut EguiApp) {
        for _ in 0..500 {
            app.run_events();
            if app.event_queue.is_empty() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        panic!("events did not finish");
    }

    #[test]
    fn test_unsupported_format_is_a_warning() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "X,Y\n1,2\n").unwrap();

        let mut app = EguiApp::with_config(Default::default());
        app.event_queue
            .queue_event(Box::new(LoadDatasetRequested::new(picked(&path))));
        run_until_done(&mut app);

        assert!(app.dock.tabs.is_empty());
        assert!(matches!(app.status, Some(StatusLine::Warning(_))));
    }

    #[test]
    fn test_load_and_plot() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.csv");
        std::fs::write(&path, "X,Y,Z\n1,10,a\n2,20,a\n3,30,b\n").unwrap();

        let mut app = EguiApp::with_config(Default::default());
        app.event_queue
            .queue_event(Box::new(LoadDatasetRequested::new(picked(&path))));
        app.event_queue
            .queue_event(Box::new(LoadDatasetRequested::new(picked(&path))));
        run_until_done(&mut app);
        assert_eq!(app.dock.tabs.names(), vec!["A", "A0"]);
        assert!(matches!(app.status, Some(StatusLine::Success(_))));

        app.dock.tabs.set_checked("A", FieldRole::X, "X", true);
        app.dock.tabs.set_checked("A", FieldRole::Y, "Y", true);
        app.event_queue.queue_event(Box::new(PlotRequested));
        run_until_done(&mut app);

        let figure = app.plotter.figure();
        assert_eq!(figure.grid.unwrap().code(), "11");
        assert_eq!(figure.subplots[0].tab, "A");
    }

    #[test]
    fn test_failed_plot_keeps_earlier_tabs() {
        init();
        let mut app = EguiApp::with_config(Default::default());
        let table = csv_table::Table::parse("X,Y\n1,10\n2,20\n").unwrap();
        app.dock.tabs.add_dataset(table, "A");
        // a text column on the y-axis cannot be plotted
        let table = csv_table::Table::parse("X,Y\n1,low\n2,high\n").unwrap();
        app.dock.tabs.add_dataset(table, "B");
        for tab in ["A", "B"] {
            app.dock.tabs.set_checked(tab, FieldRole::X, "X", true);
            app.dock.tabs.set_checked(tab, FieldRole::Y, "Y", true);
        }
        app.event_queue.queue_event(Box::new(PlotRequested));
        run_until_done(&mut app);

        let figure = app.plotter.figure();
        assert_eq!(figure.grid.unwrap().code(), "12");
        assert_eq!(figure.subplots.len(), 1);
        assert_eq!(figure.subplots[0].tab, "A");
        assert!(matches!(app.status, Some(StatusLine::Error(_))));

        // the next attempt starts from a cleared figure
        app.dock.tabs.set_checked("A", FieldRole::X, "X", false);
        app.event_queue.queue_event(Box::new(PlotRequested));
        run_until_done(&mut app);
        assert!(app.plotter.figure().is_empty());
        assert!(matches!(app.status, Some(StatusLine::Error(_))));
    }

    #[test]
    fn test_plot_without_selection_is_a_warning() {
        init();
        let mut app = EguiApp::with_config(Default::default());
        app.event_queue.queue_event(Box::new(PlotRequested));
        run_until_done(&mut app);
        assert!(app.plotter.figure().is_empty());
        assert!(matches!(app.status, Some(StatusLine::Warning(_))));
    }
}
