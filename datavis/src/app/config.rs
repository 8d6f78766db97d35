/// Settings of the running session. Defaults are used on every start and
/// can be edited from the preferences view.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub window_width: f32,
    pub window_height: f32,
    pub subplot_height: f32,
    pub marker_radius: f32,
    pub svg_width: u64,
    pub svg_height: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: 1200.0,
            window_height: 1024.0,
            subplot_height: 400.0,
            marker_radius: 2.5,
            svg_width: 1200,
            svg_height: 900,
        }
    }
}

impl Config {
    pub fn render(&mut self, ui: &mut egui::Ui) {
        ui.heading("Preferences");
        ui.separator();

        egui::Grid::new("preferences")
            .num_columns(2)
            .spacing([40.0, 8.0])
            .striped(true)
            .show(ui, |ui| {
                ui.label("Subplot height");
                ui.add(
                    egui::DragValue::new(&mut self.subplot_height)
                        .range(100.0..=2000.0)
                        .suffix(" px"),
                );
                ui.end_row();

                ui.label("Marker radius");
                ui.add(
                    egui::DragValue::new(&mut self.marker_radius)
                        .range(0.5..=20.0)
                        .speed(0.1),
                );
                ui.end_row();

                ui.label("SVG width");
                ui.add(
                    egui::DragValue::new(&mut self.svg_width)
                        .range(100..=10000)
                        .suffix(" px"),
                );
                ui.end_row();

                ui.label("SVG height");
                ui.add(
                    egui::DragValue::new(&mut self.svg_height)
                        .range(100..=10000)
                        .suffix(" px"),
                );
                ui.end_row();
            });

        ui.separator();
        if ui.button("Restore Defaults").clicked() {
            let Config {
                window_width,
                window_height,
                ..
            } = *self;
            *self = Self {
                window_width,
                window_height,
                ..Default::default()
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_size() {
        let config = Config::default();
        assert_eq!((config.window_width, config.window_height), (1200.0, 1024.0));
        assert!(config.marker_radius > 0.0);
    }
}
