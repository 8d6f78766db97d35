use crate::{
    app::events::{EventQueue, PlotRequested},
    EguiApp,
};

use super::SelectionDock;

impl SelectionDock {
    pub(crate) fn render(&mut self, event_queue: &mut EventQueue<EguiApp>, ui: &mut egui::Ui) {
        ui.heading("Data Selector");
        ui.separator();

        if self.tabs.is_empty() {
            ui.weak("Load a dataset to select fields.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("selection_dock")
                .max_height(ui.available_height() - 40.0)
                .show(ui, |ui| self.tabs.render(ui));
        }

        ui.separator();
        if ui
            .add_enabled(!self.tabs.is_empty(), egui::Button::new("PlotData"))
            .on_hover_text("plot the selection of all tabs (F5)")
            .clicked()
        {
            event_queue.queue_event(Box::new(PlotRequested));
        }
    }
}
