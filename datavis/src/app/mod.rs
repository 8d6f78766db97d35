mod components;
pub mod config;
mod events;

use app_core::event::ActionOutcome;
use config::Config;
use events::{EventQueue, LoadDatasetRequested, PlotRequested, SavePlotRequested};

use self::components::{Plotter, SelectionDock};

pub struct EguiApp {
    config: Config,
    dock: SelectionDock,
    plotter: Plotter,
    status: Option<StatusLine>,
    shortcuts_modal_open: bool,
    ui_selection: UISelection,
    event_queue: EventQueue<Self>,
    request_redraw: Option<()>,
}

#[derive(Debug, PartialEq, Eq)]
enum UISelection {
    Plot,
    Preferences,
}

/// Outcome of the last user action, shown at the bottom of the window.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StatusLine {
    Success(String),
    Warning(String),
    Error(String),
}

impl From<ActionOutcome> for StatusLine {
    fn from(outcome: ActionOutcome) -> Self {
        match outcome {
            ActionOutcome::Success(msg) => Self::Success(msg),
            ActionOutcome::Warning(msg) => Self::Warning(msg),
        }
    }
}

impl EguiApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            dock: SelectionDock::default(),
            plotter: Plotter::new(),
            status: None,
            shortcuts_modal_open: false,
            ui_selection: UISelection::Plot,
            event_queue: EventQueue::<Self>::new(),
            request_redraw: None,
        }
    }

    pub fn request_redraw(&mut self) {
        self.request_redraw = Some(());
    }

    fn open_dataset_dialog(&mut self) {
        log::debug!("open dialog to select dataset");
        let handle = std::thread::spawn(|| {
            let mut dialog = rfd::FileDialog::new()
                .set_title("Load New Dataset")
                .add_filter("CSV Files", &["csv"])
                .add_filter("Sqlite Files", &["db"])
                .add_filter("YAML Files", &["yaml"]);
            if let Ok(dir) = std::env::current_dir() {
                dialog = dialog.set_directory(dir);
            }
            dialog.pick_file()
        });
        let event = LoadDatasetRequested::new(Some(handle));
        self.event_queue.queue_event(Box::new(event));
    }

    fn open_export_dialog(&mut self) {
        log::debug!("open dialog to select svg plot path");
        let handle = std::thread::spawn(|| {
            rfd::FileDialog::new()
                .set_file_name("figure.svg")
                .add_filter("SVG Files", &["svg"])
                .save_file()
        });
        let event = SavePlotRequested::new(Some(handle));
        self.event_queue.queue_event(Box::new(event));
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.request_redraw.take().is_some() {
            ctx.request_repaint();
        }

        self.run_events();
        // Dialog threads are polled until they return.
        if !self.event_queue.is_empty() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        let mut should_quit = false;

        // Handle keyboard input.
        ctx.input(|i| {
            if i.key_pressed(egui::Key::F1) {
                self.shortcuts_modal_open = !self.shortcuts_modal_open;
            }
            if i.key_pressed(egui::Key::F5) {
                self.event_queue.queue_event(Box::new(PlotRequested));
            }
            if i.key_pressed(egui::Key::F10) {
                should_quit = true;
            }
        });
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::O)) {
            self.open_dataset_dialog();
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::E)) {
            self.open_export_dialog();
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.render_shortcut_modal(ctx);
            self.menu(ui, ctx);
        });

        egui::TopBottomPanel::bottom("status_line").show(ctx, |ui| {
            self.render_status(ui);
        });

        egui::SidePanel::right("selection_dock")
            .resizable(true)
            .default_width(420.0)
            .min_width(300.0)
            .show(ctx, |ui| {
                self.dock.render(&mut self.event_queue, ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| match self.ui_selection {
            UISelection::Plot => self.central_panel(ui),
            UISelection::Preferences => self.config.render(ui),
        });

        if should_quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

impl EguiApp {
    fn central_panel(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new("Welcome to the Data Visualizer!")
                    .size(24.0)
                    .strong(),
            );
        });
        if ui
            .button(egui::RichText::new("Load New Dataset ---->").size(14.0))
            .on_hover_text("load a CSV file into a new tab (CTRL + O)")
            .clicked()
        {
            self.open_dataset_dialog();
        }
        ui.separator();

        // leave room for the toolbar below the plots
        let toolbar_height = 2.0 * ui.spacing().interact_size.y;
        egui::ScrollArea::both()
            .id_salt("plot_area")
            .max_height((ui.available_height() - toolbar_height).max(0.0))
            .auto_shrink([false, false])
            .show(ui, |ui| self.plotter.render(&self.config, ui));

        ui.separator();
        if self.plotter.render_toolbar(ui) {
            self.open_export_dialog();
        }
    }

    fn render_status(&self, ui: &mut egui::Ui) {
        let text = match &self.status {
            None => egui::RichText::new("Ready"),
            Some(StatusLine::Success(msg)) => egui::RichText::new(msg.as_str()),
            Some(StatusLine::Warning(msg)) => {
                egui::RichText::new(format!("Warning: {msg}")).color(ui.visuals().warn_fg_color)
            }
            Some(StatusLine::Error(msg)) => {
                egui::RichText::new(format!("Error: {msg}")).color(ui.visuals().error_fg_color)
            }
        };
        ui.label(text);
    }

    fn menu(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Load New Dataset").clicked() {
                    self.open_dataset_dialog();
                    ui.close_menu();
                }
                if ui.button("Export SVG").clicked() {
                    self.open_export_dialog();
                    ui.close_menu();
                }
                if ui.button("Preferences").clicked() {
                    self.ui_selection = UISelection::Preferences;
                    ui.close_menu();
                }
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            // Selection of ui view.
            ui.menu_button("View", |ui| {
                ui.selectable_value(&mut self.ui_selection, UISelection::Plot, "Plot");
                ui.selectable_value(
                    &mut self.ui_selection,
                    UISelection::Preferences,
                    "Preferences",
                );
            });

            ui.toggle_value(&mut self.shortcuts_modal_open, "Help (F1)");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                egui::widgets::global_theme_preference_buttons(ui);
            });
        });
    }

    fn render_shortcut_modal(&mut self, ctx: &egui::Context) {
        if self.shortcuts_modal_open
            && egui::Modal::new("shortcut_modal".into())
                .show(ctx, |ui| {
                    ui.heading("Keyboard Shortcuts");
                    ui.separator();
                    ui.label("CTRL + O = Load New Dataset");
                    ui.separator();
                    ui.label("CTRL + E = Export Plot as SVG");
                    ui.separator();
                    ui.label("F1 = Show Keyboard Shortcuts");
                    ui.separator();
                    ui.label("F5 = Plot Selected Data");
                    ui.separator();
                    ui.label("F10 = Quit App");
                    ui.separator();
                })
                .should_close()
        {
            self.shortcuts_modal_open = false;
        };
    }
}
