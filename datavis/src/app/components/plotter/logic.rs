use std::io::Write;

use app_core::string_error::ErrorStringExt;
use svg_export::{Axis, Figure as SvgFigure, ScatterPlot};

use crate::{
    app::config::Config,
    plotting::{Axes, Figure, Subplot},
};

/// Affine map of a twin axis' y-range onto the y-range of the primary axis,
/// so twin series can share one egui plot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct AxisMap {
    from: (f64, f64),
    to: (f64, f64),
}

impl AxisMap {
    pub(super) fn new(from: (f64, f64), to: (f64, f64)) -> Self {
        Self { from, to }
    }

    pub(super) fn forward(&self, value: f64) -> f64 {
        self.to.0 + (value - self.from.0) * (self.to.1 - self.to.0) / (self.from.1 - self.from.0)
    }

    pub(super) fn inverse(&self, value: f64) -> f64 {
        self.from.0 + (value - self.to.0) * (self.from.1 - self.from.0) / (self.to.1 - self.to.0)
    }
}

/// Smallest and largest y value of all series on `axes`. A flat range is
/// widened so it can be mapped.
pub(super) fn y_range(axes: &Axes) -> Option<(f64, f64)> {
    let (min, max) = axes
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p[1]))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), y| {
            (min.min(y), max.max(y))
        });
    if min > max {
        return None;
    }
    if min == max {
        return Some((min - 0.5, max + 0.5));
    }
    Some((min, max))
}

/// Labels of the right-hand tick marks of a twin axis.
pub(super) fn format_tick(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // avoid "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

pub fn save_svg(figure: &Figure, config: &Config, path: &std::path::Path) -> Result<(), String> {
    log::debug!("requested to save svg at '{:?}'", path);

    let Some(grid) = figure.grid else {
        return Err("nothing plotted yet".to_string());
    };

    let mut fig = SvgFigure::empty(config.svg_width, config.svg_height);
    for subplot in figure.subplots.iter() {
        let (row, col) = grid.position(subplot.index);
        let cell = || {
            Axis::in_grid(grid.rows, grid.cols, row, col)
                .with_title(&subplot.title)
                .with_xlabel(&subplot.x_label)
        };
        insert_subplot(subplot, cell, config.marker_radius as f64, &mut fig);
    }

    let mut file = std::fs::File::create(path).err_to_string("unable to create svg file")?;
    file.write_all(fig.render().as_bytes())
        .err_to_string("could not write svg file")?;
    Ok(())
}

fn insert_subplot(
    subplot: &Subplot,
    cell: impl Fn() -> Axis,
    marker_radius: f64,
    fig: &mut SvgFigure,
) {
    let mut color_idx = 0;
    let mut legend_offset = 0;
    let mut primary: Option<Axis> = None;

    for axes in subplot.axes.iter() {
        let mut ax = match &primary {
            Some(primary) => primary.twin().with_legend_offset(legend_offset),
            None => cell(),
        };
        ax = ax.with_ylabel(&axes.y_label).with_legend(subplot.legend);

        for series in axes.series.iter() {
            let color: String = super::ui::auto_color(color_idx)
                .to_hex()
                .chars()
                .take(7)
                .collect();
            ax.add_scatter(
                ScatterPlot::new(&series.points)
                    .with_color(&color)
                    .with_radius(marker_radius)
                    .with_name(&series.label),
            );
            color_idx += 1;
        }
        legend_offset += axes.series.len();

        if axes.twin {
            ax.fit_to_data(false);
            ax.insert_into(fig);
        } else {
            ax.fit_to_data(true);
            primary = Some(ax);
        }
    }

    // the primary axis goes on top of its twins, they share the frame
    match primary {
        Some(primary) => primary.insert_into(fig),
        None => cell().insert_into(fig),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::{ScatterSeries, SubplotGrid};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn figure() -> Figure {
        let series = |label: &str, points: Vec<[f64; 2]>| ScatterSeries {
            label: label.to_string(),
            points,
        };
        Figure {
            grid: SubplotGrid::for_tabs(1),
            subplots: vec![Subplot {
                tab: "A".to_string(),
                index: 0,
                title: "A [Y, Y2] vs X".to_string(),
                x_label: "X".to_string(),
                axes: vec![
                    Axes {
                        y_label: "Y".to_string(),
                        twin: false,
                        series: vec![series("Y", vec![[1.0, 10.0], [2.0, 20.0]])],
                    },
                    Axes {
                        y_label: "Y2".to_string(),
                        twin: true,
                        series: vec![series("Y2", vec![[1.0, 100.0], [2.0, 200.0]])],
                    },
                ],
                legend: true,
            }],
        }
    }

    #[test]
    fn test_axis_map() {
        let map = AxisMap::new((100.0, 200.0), (0.0, 10.0));
        assert_eq!(map.forward(150.0), 5.0);
        assert_eq!(map.inverse(5.0), 150.0);
        assert_eq!(map.inverse(map.forward(120.0)), 120.0);
    }

    #[test]
    fn test_y_range() {
        let fig = figure();
        assert_eq!(y_range(&fig.subplots[0].axes[1]), Some((100.0, 200.0)));

        let flat = Axes {
            y_label: "Y".to_string(),
            twin: false,
            series: vec![ScatterSeries {
                label: "Y".to_string(),
                points: vec![[0.0, 1.0]],
            }],
        };
        assert_eq!(y_range(&flat), Some((0.5, 1.5)));

        let empty = Axes {
            y_label: "Y".to_string(),
            twin: false,
            series: Vec::new(),
        };
        assert_eq!(y_range(&empty), None);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(1.23456), "1.235");
        assert_eq!(format_tick(-0.0001), "0");
        assert_eq!(format_tick(200.0), "200");
    }

    #[test]
    fn test_save_svg() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.svg");
        save_svg(&figure(), &Config::default(), &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("<svg"));
        assert_eq!(raw.matches("<circle").count(), 4);
        assert!(raw.contains("A [Y, Y2] vs X"));
        assert!(raw.contains(">Y2</text>"));
    }

    #[test]
    fn test_save_svg_uses_marker_radius() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.svg");
        let config = Config {
            marker_radius: 4.0,
            ..Config::default()
        };
        save_svg(&figure(), &config, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.matches("r=\"4\"").count(), 4);
        assert!(!raw.contains("r=\"2.5\""));
    }

    #[test]
    fn test_save_empty_figure_fails() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.svg");
        assert!(save_svg(&Figure::default(), &Config::default(), &path).is_err());
        assert!(!path.exists());
    }
}
