use csv_table::Table;

use super::{
    elapsed, Axes, Figure, FilterSelection, PlotError, ScatterSeries, Subplot, SubplotGrid,
    TabSelection, TIME_SERIES_ADJUSTED,
};

/// Draw one subplot per tab that has an X field checked into `figure`, which
/// is cleared first. Tabs without X selection are skipped and do not take up
/// a grid cell. On error the subplots of the tabs before the failing one stay
/// in `figure`.
pub fn consolidated_plot(
    selections: &[TabSelection<'_>],
    figure: &mut Figure,
) -> Result<(), PlotError> {
    figure.clear();
    let active: Vec<&TabSelection<'_>> = selections.iter().filter(|s| s.is_active()).collect();
    let Some(grid) = SubplotGrid::for_tabs(active.len()) else {
        log::debug!("no tab has an x-axis field checked, nothing to plot");
        return Ok(());
    };
    log::debug!("plotting {} tab(s) on grid {}", active.len(), grid.code());

    figure.grid = Some(grid);
    for (index, selection) in active.iter().enumerate() {
        let subplot = plot_tab(index, selection)?;
        figure.subplots.push(subplot);
    }
    Ok(())
}

fn plot_tab(index: usize, selection: &TabSelection<'_>) -> Result<Subplot, PlotError> {
    let table = selection.table;
    // Only the first checked x field is plotted.
    let x_field = &selection.x[0];
    let (x_label, xs) = x_values(table, x_field)?;

    let grouping = match &selection.filter {
        Some(filter) => Some((filter, table.column(&filter.field)?.values())),
        None => None,
    };

    let mut axes = Vec::with_capacity(selection.y.len());
    for (j, y_field) in selection.y.iter().enumerate() {
        let ys = table.column(y_field)?.numbers()?;
        let series = match grouping {
            Some((filter, groups)) => grouped_series(y_field, filter, groups, &xs, &ys),
            None => vec![ScatterSeries {
                label: y_field.clone(),
                points: points(&xs, &ys, |_| true),
            }],
        };
        axes.push(Axes {
            y_label: y_field.clone(),
            twin: j > 0,
            series,
        });
    }

    Ok(Subplot {
        tab: selection.name.clone(),
        index,
        title: format!(
            "{} [{}] vs {}",
            selection.name,
            selection.y.join(", "),
            x_label
        ),
        x_label,
        axes,
        legend: true,
    })
}

/// X values and label. Fields named like a time column are converted to
/// seconds since the first row; the table itself is left untouched.
fn x_values(table: &Table, field: &str) -> Result<(String, Vec<f64>), PlotError> {
    let column = table.column(field)?;
    if field.to_lowercase().contains("time") {
        let seconds =
            elapsed::elapsed_seconds(column.values()).map_err(|reason| PlotError::Timestamp {
                column: field.to_string(),
                reason,
            })?;
        return Ok((TIME_SERIES_ADJUSTED.to_string(), seconds));
    }
    Ok((field.to_string(), column.numbers()?))
}

/// One series per filter value, holding only the rows of that group.
fn grouped_series(
    y_field: &str,
    filter: &FilterSelection,
    groups: &[String],
    xs: &[f64],
    ys: &[f64],
) -> Vec<ScatterSeries> {
    filter
        .values
        .iter()
        .map(|value| ScatterSeries {
            label: format!("{} {} = {}", y_field, filter.field, value),
            points: points(xs, ys, |row| groups[row] == *value),
        })
        .collect()
}

fn points(xs: &[f64], ys: &[f64], include: impl Fn(usize) -> bool) -> Vec<[f64; 2]> {
    xs.iter()
        .zip(ys)
        .enumerate()
        .filter(|(row, (x, y))| include(*row) && x.is_finite() && y.is_finite())
        .map(|(_, (x, y))| [*x, *y])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn table() -> Table {
        Table::parse("X,Y,Y2,Z\n1,10,100,a\n2,20,200,a\n3,30,300,b\n").unwrap()
    }

    fn plot(selections: &[TabSelection<'_>]) -> Result<Figure, PlotError> {
        let mut figure = Figure::default();
        consolidated_plot(selections, &mut figure).map(|_| figure)
    }

    fn selection<'a>(name: &str, table: &'a Table, x: &[&str], y: &[&str]) -> TabSelection<'a> {
        TabSelection {
            name: name.to_string(),
            table,
            x: x.iter().map(|s| s.to_string()).collect(),
            y: y.iter().map(|s| s.to_string()).collect(),
            filter: None,
        }
    }

    #[test]
    fn test_nothing_is_drawn_without_x_selection() {
        init();
        let table = table();
        let figure = plot(&[selection("A", &table, &[], &["Y"])]).unwrap();
        assert_eq!(figure.grid, None);
        assert!(figure.is_empty());

        let figure = plot(&[]).unwrap();
        assert!(figure.is_empty());
    }

    #[test]
    fn test_inactive_tabs_do_not_take_a_cell() {
        init();
        let table = table();
        let figure = plot(&[
            selection("A", &table, &["X"], &["Y"]),
            selection("B", &table, &[], &["Y"]),
            selection("C", &table, &["X"], &["Y"]),
        ])
        .unwrap();
        assert_eq!(figure.grid.unwrap().code(), "12");
        let tabs: Vec<&str> = figure.subplots.iter().map(|s| s.tab.as_str()).collect();
        assert_eq!(tabs, vec!["A", "C"]);
        assert_eq!(figure.subplots[1].index, 1);
    }

    #[test]
    fn test_single_series_without_filter() {
        init();
        let table = table();
        let figure = plot(&[selection("A", &table, &["X"], &["Y"])]).unwrap();
        let subplot = &figure.subplots[0];
        assert_eq!(subplot.title, "A [Y] vs X");
        assert_eq!(subplot.x_label, "X");
        assert_eq!(subplot.axes.len(), 1);
        assert_eq!(
            subplot.axes[0].series,
            vec![ScatterSeries {
                label: "Y".to_string(),
                points: vec![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]],
            }]
        );
    }

    #[test]
    fn test_grouped_scatter() {
        init();
        let table = table();
        let mut sel = selection("A", &table, &["X"], &["Y"]);
        sel.filter = Some(FilterSelection {
            field: "Z".to_string(),
            values: vec!["a".to_string(), "b".to_string()],
        });
        let figure = plot(&[sel]).unwrap();
        let series = &figure.subplots[0].axes[0].series;
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Y Z = a");
        assert_eq!(series[0].points, vec![[1.0, 10.0], [2.0, 20.0]]);
        assert_eq!(series[1].label, "Y Z = b");
        assert_eq!(series[1].points, vec![[3.0, 30.0]]);
    }

    #[test]
    fn test_unchecked_filter_values_are_not_drawn() {
        init();
        let table = table();
        let mut sel = selection("A", &table, &["X"], &["Y"]);
        sel.filter = Some(FilterSelection {
            field: "Z".to_string(),
            values: vec!["b".to_string()],
        });
        let figure = plot(&[sel]).unwrap();
        assert_eq!(figure.num_series(), 1);
    }

    #[test]
    fn test_further_y_fields_use_twin_axes() {
        init();
        let table = table();
        let figure = plot(&[selection("A", &table, &["X"], &["Y", "Y2"])]).unwrap();
        let subplot = &figure.subplots[0];
        assert_eq!(subplot.title, "A [Y, Y2] vs X");
        assert!(!subplot.axes[0].twin);
        assert!(subplot.axes[1].twin);
        assert_eq!(subplot.axes[1].y_label, "Y2");
    }

    #[test]
    fn test_time_field_is_converted_to_seconds() {
        init();
        let table =
            Table::parse("Timestamp,Y\n23:00:00,1\n00:00:00,2\n01:00:00,3\n").unwrap();
        let figure = plot(&[selection("A", &table, &["Timestamp"], &["Y"])]).unwrap();
        let subplot = &figure.subplots[0];
        assert_eq!(subplot.x_label, TIME_SERIES_ADJUSTED);
        assert_eq!(subplot.title, "A [Y] vs Time (Seconds)");
        let xs: Vec<f64> = subplot.axes[0].series[0].points.iter().map(|p| p[0]).collect();
        assert_eq!(xs, vec![0.0, 3600.0, 7200.0]);
        // the table keeps the raw strings
        assert_eq!(table.column("Timestamp").unwrap().values()[0], "23:00:00");
    }

    #[test]
    fn test_non_numeric_y_is_an_error() {
        init();
        let table = table();
        let res = plot(&[selection("A", &table, &["X"], &["Z"])]);
        assert!(matches!(res, Err(PlotError::Table(_))));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        init();
        let table = table();
        let res = plot(&[selection("A", &table, &["X"], &["nope"])]);
        assert!(matches!(res, Err(PlotError::Table(_))));
    }

    #[test]
    fn test_failing_tab_keeps_earlier_subplots() {
        init();
        let good = table();
        let text = Table::parse("X,Y\n1,low\n2,high\n").unwrap();
        let mut figure = Figure::default();
        let res = consolidated_plot(
            &[
                selection("A", &good, &["X"], &["Y"]),
                selection("B", &text, &["X"], &["Y"]),
                selection("C", &good, &["X"], &["Y"]),
            ],
            &mut figure,
        );
        assert!(matches!(res, Err(PlotError::Table(_))));
        assert_eq!(figure.grid.unwrap().code(), "31");
        let tabs: Vec<&str> = figure.subplots.iter().map(|s| s.tab.as_str()).collect();
        assert_eq!(tabs, vec!["A"]);
    }

    #[test]
    fn test_previous_figure_is_cleared() {
        init();
        let table = table();
        let mut figure = Figure::default();
        consolidated_plot(&[selection("A", &table, &["X"], &["Y"])], &mut figure).unwrap();
        assert!(!figure.is_empty());
        consolidated_plot(&[selection("A", &table, &[], &["Y"])], &mut figure).unwrap();
        assert_eq!(figure, Figure::default());
    }
}
