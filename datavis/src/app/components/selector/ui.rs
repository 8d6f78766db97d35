use super::{FieldSelector, FilterPanel, FilterState};

/// A checkbox the user clicked in a `FieldSelector` during this frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorInput {
    Field { name: String, checked: bool },
    FilterValue { value: String, checked: bool },
}

impl FieldSelector {
    /// Draw the checkboxes. The click is returned instead of applied, so the
    /// owner can route it through the same path as programmatic changes.
    pub fn render(&self, ui: &mut egui::Ui) -> Option<SelectorInput> {
        ui.group(|ui| {
            ui.strong(self.label.as_str());
            ui.separator();

            let mut input = None;
            egui::ScrollArea::vertical()
                .id_salt(("fields", &self.label))
                .max_height(ui.available_height() * 0.5)
                .show(ui, |ui| {
                    for field in self.fields.iter() {
                        let mut checked = field.checked;
                        if ui.checkbox(&mut checked, field.name.as_str()).changed() {
                            input = Some(SelectorInput::Field {
                                name: field.name.clone(),
                                checked,
                            });
                        }
                    }
                });

            if let Some(panel) = self.filter_panel() {
                ui.separator();
                input = panel.render(ui).or(input);
            }
            input
        })
        .inner
    }
}

impl FilterPanel {
    fn render(&self, ui: &mut egui::Ui) -> Option<SelectorInput> {
        ui.strong("Filters");
        egui::ScrollArea::vertical()
            .id_salt("filter_values")
            .show(ui, |ui| match self.state() {
                FilterState::Empty => {
                    ui.weak("Check a field to filter by its values.");
                    None
                }
                FilterState::Unavailable { field } => {
                    ui.add_enabled(false, egui::Label::new("Filter Not Available for this Field!"))
                        .on_disabled_hover_text(format!(
                            "'{field}' has more than {} distinct values",
                            super::MAX_FILTER_SIZE
                        ));
                    None
                }
                FilterState::Values { values, .. } => {
                    let mut input = None;
                    for v in values.iter() {
                        let text = if v.value.is_empty() {
                            "(empty)"
                        } else {
                            v.value.as_str()
                        };
                        let mut checked = v.checked;
                        if ui.checkbox(&mut checked, text).changed() {
                            input = Some(SelectorInput::FilterValue {
                                value: v.value.clone(),
                                checked,
                            });
                        }
                    }
                    input
                }
            })
            .inner
    }
}
