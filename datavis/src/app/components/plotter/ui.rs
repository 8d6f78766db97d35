use egui_plot::{AxisHints, HPlacement, Legend, Points};

use crate::{app::config::Config, plotting::Subplot};

use super::logic::{format_tick, y_range, AxisMap};

impl super::Plotter {
    pub fn render(&mut self, config: &Config, ui: &mut egui::Ui) {
        let Some(grid) = self.figure.grid else {
            ui.centered_and_justified(|ui| {
                ui.weak("Check an X and Y field and press \"PlotData\" (F5).");
            });
            return;
        };
        let reset = std::mem::take(&mut self.reset_requested);
        let spacing = ui.spacing().item_spacing.x;
        let width = (ui.available_width() - spacing) / grid.cols as f32 - spacing;

        for row in 0..grid.rows {
            ui.horizontal(|ui| {
                for col in 0..grid.cols {
                    let Some(subplot) = self
                        .figure
                        .subplots
                        .iter()
                        .find(|s| grid.position(s.index) == (row, col))
                    else {
                        continue;
                    };
                    ui.vertical(|ui| {
                        ui.set_width(width);
                        ui.vertical_centered(|ui| ui.strong(subplot.title.as_str()));
                        show_subplot(subplot, width, config, reset, ui);
                    });
                }
            });
        }
    }

    pub fn render_toolbar(&mut self, ui: &mut egui::Ui) -> bool {
        let mut export_requested = false;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.figure.is_empty(), egui::Button::new("Reset View"))
                .clicked()
            {
                self.reset_view();
            }
            if ui
                .add_enabled(!self.figure.is_empty(), egui::Button::new("Export SVG"))
                .on_hover_text("CTRL + E")
                .clicked()
            {
                export_requested = true;
            }
        });
        export_requested
    }
}

/// Draw all axes of a subplot into one egui plot. Twin axes are mapped onto
/// the y-range of the primary axis and labelled on the right.
fn show_subplot(subplot: &Subplot, width: f32, config: &Config, reset: bool, ui: &mut egui::Ui) {
    let primary_range = subplot
        .axes
        .first()
        .and_then(y_range)
        .unwrap_or((0.0, 1.0));

    let mut y_axes = Vec::with_capacity(subplot.axes.len());
    let mut maps = Vec::with_capacity(subplot.axes.len());
    for axes in subplot.axes.iter() {
        if !axes.twin {
            y_axes.push(AxisHints::new_y().label(axes.y_label.as_str()));
            maps.push(None);
            continue;
        }
        let map = AxisMap::new(y_range(axes).unwrap_or(primary_range), primary_range);
        y_axes.push(
            AxisHints::new_y()
                .label(axes.y_label.as_str())
                .placement(HPlacement::Right)
                .formatter(move |mark, _range| format_tick(map.inverse(mark.value))),
        );
        maps.push(Some(map));
    }

    let mut plot = egui_plot::Plot::new(("subplot", subplot.index))
        .legend(Legend::default())
        .x_axis_label(subplot.x_label.as_str())
        .width(width)
        .height(config.subplot_height);
    if !y_axes.is_empty() {
        plot = plot.custom_y_axes(y_axes);
    }
    if reset {
        plot = plot.reset();
    }

    plot.show(ui, |plot_ui| {
        let mut color_idx = 0;
        for (axes, map) in subplot.axes.iter().zip(maps.iter()) {
            for series in axes.series.iter() {
                let points: Vec<[f64; 2]> = match map {
                    Some(map) => series
                        .points
                        .iter()
                        .map(|[x, y]| [*x, map.forward(*y)])
                        .collect(),
                    None => series.points.clone(),
                };
                plot_ui.points(
                    Points::new(points)
                        .name(&series.label)
                        .radius(config.marker_radius)
                        .color(auto_color(color_idx)),
                );
                color_idx += 1;
            }
        }
    });
}

pub fn auto_color(color_idx: i32) -> egui::Color32 {
    // analog to egui_plot
    let golden_ratio = (5.0_f32.sqrt() - 1.0) / 2.0; // 0.61803398875
    let h = color_idx as f32 * golden_ratio;
    egui::epaint::Hsva::new(h, 0.85, 0.5, 1.0).into()
}
