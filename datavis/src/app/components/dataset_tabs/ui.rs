use super::{DatasetPanel, DatasetTabs, FieldRole};
use crate::app::components::SelectorInput;

impl DatasetTabs {
    pub fn render(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for (i, tab) in self.tabs.iter().enumerate() {
                ui.selectable_value(&mut self.active_tab, i, tab.name.as_str())
                    .on_hover_text(format!(
                        "{} fields, {} rows",
                        tab.table.num_columns(),
                        tab.table.num_rows()
                    ));
            }
        });
        ui.separator();

        let Some(tab) = self.tabs.get(self.active_tab) else {
            return;
        };
        let Some((role, input)) = tab.panel.render(ui) else {
            return;
        };
        let name = tab.name.clone();
        self.apply_input(&name, role, input);
    }
}

impl DatasetPanel {
    fn render(&self, ui: &mut egui::Ui) -> Option<(FieldRole, SelectorInput)> {
        ui.columns(3, |cols| {
            [FieldRole::X, FieldRole::Y, FieldRole::Filter]
                .into_iter()
                .zip(cols.iter_mut())
                .filter_map(|(role, col)| Some((role, self.selector(role).render(col)?)))
                .last()
        })
    }
}
