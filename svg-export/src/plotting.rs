use crate::svg::{self, opts, Params, Tag};

/// The basic plotting primitive. Can be converted into a Vec of `svg::Tag`.
trait Element {
    /// Convert `Element` into a Vec of `svg::Tag`.
    ///
    /// All elements are placed relative to an axis which itself is sized and
    /// placed relative to a figure. For correct placement, the axis and figure
    /// thus have to be passed into the function.
    fn to_tags(&self, ax: &Axis, fig: &Figure) -> Vec<Box<dyn svg::RenderTag>>;
}

// ----------------------------------------------------------------------------
//
//
// Figure
//
//
// ----------------------------------------------------------------------------

/// The Figure defines the overall size of a plot and holds the axes.
pub struct Figure {
    width: u64,
    height: u64,
    axes: Vec<Axis>,
}

impl Figure {
    pub fn empty(width: u64, height: u64) -> Self {
        Self {
            width,
            height,
            axes: Vec::new(),
        }
    }

    pub fn add_axis(&mut self, ax: Axis) {
        self.axes.push(ax);
    }

    pub fn num_axes(&self) -> usize {
        self.axes.len()
    }

    /// Render this `Figure` to raw SVG markup.
    pub fn render(&self) -> String {
        let mut root = Tag::<svg::Svg>::new(
            self.width,
            self.height,
            opts(&[("font-family", "sans-serif"), ("font-size", "10pt")]),
        );
        root.add_child(Tag::<svg::Rect>::new(
            0.0,
            0.0,
            self.width as f64,
            self.height as f64,
            opts(&[("fill", "white")]),
        ));
        for ax in self.axes.iter() {
            root.add_children(ax.to_tags(self));
        }
        svg::render(&root)
    }
}

impl Default for Figure {
    fn default() -> Self {
        Self::empty(800, 600)
    }
}

// ----------------------------------------------------------------------------
//
//
// Axis
//
//
// ----------------------------------------------------------------------------

/// Side of the axis on which y-ticks and the y-label are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YSide {
    Left,
    Right,
}

/// The container for plots and other elements.
///
/// A twin axis is an `Axis` placed at the same position as another one,
/// with its y-axis on the right and without frame and x-axis.
pub struct Axis {
    draw_frame: bool,
    draw_legend: bool,
    draw_xaxis: bool,
    /// Number of legend entries drawn by other axes at the same position.
    legend_offset: usize,
    xlabel: String,
    ylabel: String,
    title: String,
    height: f64,
    limits: [f64; 4],
    plots: Vec<ScatterPlot>,
    style: svg::Params,
    pub ticks: Ticks,
    /// u coordinate for placement in Figure, normalized to [0, 1]
    u: f64,
    /// v coordinate for placement in Figure, normalized to [0, 1]
    v: f64,
    width: f64,
    yside: YSide,
}

impl Axis {
    pub fn new(u: f64, v: f64, width: f64, height: f64) -> Self {
        Axis {
            u,
            v,
            width,
            height,
            limits: [0.0, 1.0, 0.0, 1.0],
            ticks: Default::default(),
            draw_frame: true,
            draw_legend: false,
            draw_xaxis: true,
            legend_offset: 0,
            plots: Vec::new(),
            style: element_opts(&[("fill", "none"), ("stroke", "black")]),
            xlabel: String::new(),
            ylabel: String::new(),
            title: String::new(),
            yside: YSide::Left,
        }
    }

    /// Axis for the cell at `row`/`col` of a `rows` x `cols` grid of subplots,
    /// leaving margins for labels, ticks and the title.
    pub fn in_grid(rows: usize, cols: usize, row: usize, col: usize) -> Self {
        let (rows, cols) = (rows.max(1) as f64, cols.max(1) as f64);
        let (cell_w, cell_h) = (1.0 / cols, 1.0 / rows);
        Self::new(
            col as f64 * cell_w + 0.12 * cell_w,
            row as f64 * cell_h + 0.12 * cell_h,
            0.76 * cell_w,
            0.72 * cell_h,
        )
    }

    /// A twin of this axis: same placement and x-limits, y-axis on the right.
    pub fn twin(&self) -> Self {
        let mut twin = Self::new(self.u, self.v, self.width, self.height);
        twin.draw_frame = false;
        twin.draw_xaxis = false;
        twin.yside = YSide::Right;
        twin.limits[0] = self.limits[0];
        twin.limits[1] = self.limits[1];
        twin.ticks.xpos = self.ticks.xpos.clone();
        twin
    }

    pub fn xlim(&mut self, xmin: f64, xmax: f64) {
        self.limits[0] = xmin;
        self.limits[1] = xmax;
    }

    pub fn ylim(&mut self, ymin: f64, ymax: f64) {
        self.limits[2] = ymin;
        self.limits[3] = ymax;
    }

    pub fn limits(&self) -> [f64; 4] {
        self.limits
    }

    pub fn add_scatter(&mut self, scatter: ScatterPlot) {
        self.plots.push(scatter);
    }

    pub fn num_plots(&self) -> usize {
        self.plots.len()
    }

    pub fn with_xlim(mut self, xmin: f64, xmax: f64) -> Self {
        self.xlim(xmin, xmax);
        self.autoticks();
        self
    }

    pub fn with_ylim(mut self, ymin: f64, ymax: f64) -> Self {
        self.ylim(ymin, ymax);
        self.autoticks();
        self
    }

    pub fn with_xlabel(mut self, text: &str) -> Self {
        self.xlabel = text.to_owned();
        self
    }

    pub fn with_ylabel(mut self, text: &str) -> Self {
        self.ylabel = text.to_owned();
        self
    }

    pub fn with_title(mut self, text: &str) -> Self {
        self.title = text.to_owned();
        self
    }

    pub fn with_legend(mut self, flag: bool) -> Self {
        self.draw_legend = flag;
        self
    }

    pub fn with_legend_offset(mut self, offset: usize) -> Self {
        self.legend_offset = offset;
        self
    }

    pub fn with_scatter(mut self, scatter: ScatterPlot) -> Self {
        self.add_scatter(scatter);
        self
    }

    /// Fit the y-limits (and the x-limits, if `fit_x` is set) to the data of
    /// all scatter plots, with a margin of 5 % on each side.
    pub fn fit_to_data(&mut self, fit_x: bool) {
        let (xmin, xmax) = padded_range(self.plots.iter().flat_map(|p| p.xs.iter().copied()));
        let (ymin, ymax) = padded_range(self.plots.iter().flat_map(|p| p.ys.iter().copied()));
        if fit_x {
            self.xlim(xmin, xmax);
        }
        self.ylim(ymin, ymax);
        self.autoticks();
    }

    pub fn insert_into(self, fig: &mut Figure) {
        fig.add_axis(self);
    }

    fn autoticks(&mut self) {
        let positions = |min: f64, max: f64, mult: f64| -> Vec<f64> {
            if !(max - min).is_finite() || max <= min {
                return Vec::new();
            }
            let span_mag = (max - min).log10().floor() as i32;
            let f = 10.0f64.powi(span_mag - 1);
            let mut step = f * mult;
            while (max - min) / step <= 3.0 {
                step /= 2.0;
            }
            while (max - min) / step > 10.0 {
                step *= 2.0;
            }

            let mut x = (min / step).ceil() * step;
            let mut pos = Vec::new();
            while x <= max {
                pos.push(x);
                x += step;
            }

            pos
        };

        let [xmin, xmax, ymin, ymax] = self.limits_ordered();

        // Choosing a multiplicator for the stepsize is done depending
        // on whether the axis is in portrait or landscape format.
        let (mx, my) = if self.width < self.height {
            (5.0, 2.5)
        } else {
            (2.5, 5.0)
        };

        self.ticks.xpos = positions(xmin, xmax, mx);
        self.ticks.ypos = positions(ymin, ymax, my);
    }

    fn transformations(
        &self,
        fig: &Figure,
    ) -> (
        impl Fn(f64) -> f64,
        impl Fn(f64) -> f64,
        impl Fn(f64) -> f64,
        impl Fn(f64) -> f64,
    ) {
        let (fw, fh) = (fig.width, fig.height);
        let (au, av, aw, ah) = (self.u, self.v, self.width, self.height);
        let [xmin, xmax, ymin, ymax] = self.limits;

        let x = move |u| fw as f64 * (au + u * aw);
        let y = move |v| fh as f64 * (av + v * ah);
        let u = move |x| (x - xmin) / (xmax - xmin);
        let v = move |y| 1.0 - (y - ymin) / (ymax - ymin);

        (x, y, u, v)
    }

    /// Convert `Axis` into a Vec of `svg::Tag`.
    ///
    /// Since we only need the figure for placing `Axis`, `Axis` is not an
    /// `Element` and implements this function without using the trait.
    fn to_tags(&self, fig: &Figure) -> Vec<Box<dyn svg::RenderTag>> {
        let (w, h) = (fig.width as f64, fig.height as f64);
        let mut children: Vec<Box<dyn svg::RenderTag>> = Vec::new();

        if self.draw_frame {
            children.push(Box::new(Tag::<svg::Rect>::new(
                w * self.u,
                h * self.v,
                self.width * w,
                self.height * h,
                Some(self.style.clone()),
            )));
        }

        children.extend(self.plots.iter().flat_map(|p| p.to_tags(self, fig)));

        if !self.title.is_empty() {
            let title = Text::new(&self.title, 0.5, 1.04, 0.0, &[("text-anchor", "middle")]);
            children.extend(title.to_tags(self, fig));
        }

        // Add axis labels.
        if self.draw_xaxis && !self.xlabel.is_empty() {
            let xlabel = Text::new(&self.xlabel, 0.5, -0.14, 0.0, &[("text-anchor", "middle")]);
            children.extend(xlabel.to_tags(self, fig));
        }
        if !self.ylabel.is_empty() {
            let shift = 0.06 + 0.012 * self.ticks.y_tick_label_character_width() as f64;
            let (u, angle) = match self.yside {
                YSide::Left => (-shift, 270.0),
                YSide::Right => (1.0 + shift, 90.0),
            };
            let ylabel = Text::new(&self.ylabel, u, 0.5, angle, &[("text-anchor", "middle")]);
            children.extend(ylabel.to_tags(self, fig));
        }

        if self.draw_legend {
            for (i, p) in self.plots.iter().filter(|p| !p.name.is_empty()).enumerate() {
                let v = 0.95 - ((self.legend_offset + i) as f64 * 0.06);
                let label = Text::new(
                    &p.name,
                    0.97,
                    v - 0.015,
                    0.0,
                    &[
                        ("fill", p.color.as_str()),
                        ("text-anchor", "end"),
                        ("font-size", "8pt"),
                    ],
                );
                children.extend(label.to_tags(self, fig));
            }
        }
        children.extend(self.ticks.to_tags(self, fig));

        let mut group = Tag::<svg::Group>::new(None);
        group.add_children(children);
        vec![Box::new(group)]
    }

    fn limits_ordered(&self) -> [f64; 4] {
        let [xmin, xmax, ymin, ymax] = self.limits;
        // Bring limits in correct order.
        let (xmin, xmax) = (xmin.min(xmax), xmin.max(xmax));
        let (ymin, ymax) = (ymin.min(ymax), ymin.max(ymax));
        [xmin, xmax, ymin, ymax]
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        let [xmin, xmax, ymin, ymax] = self.limits_ordered();
        (xmin..=xmax).contains(&x) && (ymin..=ymax).contains(&y)
    }
}

impl Default for Axis {
    fn default() -> Self {
        Axis::new(0.125, 0.1, 0.75, 0.8)
    }
}

impl From<[f64; 4]> for Axis {
    fn from(pos_and_dims: [f64; 4]) -> Self {
        let [u, v, width, height] = pos_and_dims;
        Self::new(u, v, width, height)
    }
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|z| z.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), z| {
            (min.min(z), max.max(z))
        });
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 0.5, max + 0.5);
    }
    let margin = 0.05 * (max - min);
    (min - margin, max + margin)
}

// ----------------------------------------------------------------------------
//
//
// Text
//
//
// ----------------------------------------------------------------------------

/// Text element for placing labels in the axis (also axes labels).
struct Text {
    text: String,
    u: f64,
    v: f64,
    angle: f64,
    style: svg::Params,
}

impl Text {
    fn new(text: &str, u: f64, v: f64, angle: f64, style: &[(&str, &str)]) -> Self {
        Self {
            text: text.to_owned(),
            u,
            v,
            angle,
            style: element_opts(style),
        }
    }
}

impl Element for Text {
    fn to_tags(&self, ax: &Axis, fig: &Figure) -> Vec<Box<dyn svg::RenderTag>> {
        let (x, y, _, _) = ax.transformations(fig);
        vec![Box::new(Tag::<svg::Text>::new(
            x(self.u),
            y(1.0 - self.v),
            self.angle,
            &self.text,
            Some(self.style.clone()),
        ))]
    }
}

// ----------------------------------------------------------------------------
//
//
// Ticks
//
//
// ----------------------------------------------------------------------------

/// The ticks of the axes. Includes ticks and tick labels.
pub struct Ticks {
    pub xpos: Vec<f64>,
    pub ypos: Vec<f64>,
    color: String,
    linewidth: f64,
}

impl Default for Ticks {
    fn default() -> Self {
        Self {
            xpos: Vec::new(),
            ypos: Vec::new(),
            color: "black".to_string(),
            linewidth: 1.0,
        }
    }
}

impl Element for Ticks {
    fn to_tags(&self, ax: &Axis, fig: &Figure) -> Vec<Box<dyn svg::RenderTag>> {
        let (x, y, u, v) = ax.transformations(fig);

        let width_param = format!("{}", self.linewidth);
        let style = [
            ("stroke", &self.color[..]),
            ("stroke-width", &width_param[..]),
        ];

        let mut tags: Vec<Box<dyn svg::RenderTag>> = Vec::new();
        let (xtick_labels, ytick_labels) = self.format_ticks();

        if ax.draw_xaxis {
            for (&xi, li) in self.xpos.iter().zip(xtick_labels) {
                let xt = x(u(xi));
                tags.push(Box::new(Tag::<svg::Line>::new(
                    xt,
                    xt,
                    y(0.99),
                    y(1.01),
                    opts(&style),
                )));
                tags.push(Box::new(Tag::<svg::Text>::new(
                    xt,
                    y(1.06),
                    0.0,
                    &li,
                    opts(&[("text-anchor", "middle")]),
                )));
            }
        }

        let (tick_u, label_u, anchor) = match ax.yside {
            YSide::Left => (0.0, -0.02, "end"),
            YSide::Right => (1.0, 1.02, "start"),
        };
        for (&yi, li) in self.ypos.iter().zip(ytick_labels) {
            let yt = y(v(yi));
            tags.push(Box::new(Tag::<svg::Line>::new(
                x(tick_u - 0.005),
                x(tick_u + 0.005),
                yt,
                yt,
                opts(&style),
            )));
            tags.push(Box::new(Tag::<svg::Text>::new(
                x(label_u),
                yt + 4.0,
                0.0,
                &li,
                opts(&[("text-anchor", anchor)]),
            )));
        }

        tags
    }
}

impl Ticks {
    fn format_ticks(&self) -> (Vec<String>, Vec<String>) {
        let xtick_labels = format_ticks(&self.xpos);
        let ytick_labels = format_ticks(&self.ypos);

        (xtick_labels, ytick_labels)
    }

    fn y_tick_label_character_width(&self) -> usize {
        let (_, labels) = self.format_ticks();
        labels.iter().map(|lab| lab.len()).max().unwrap_or(0)
    }
}

// ----------------------------------------------------------------------------
//
//
// ScatterPlot
//
//
// ----------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct ScatterPlot {
    xs: Vec<f64>,
    ys: Vec<f64>,
    color: String,
    radius: f64,
    name: String,
}

impl ScatterPlot {
    pub fn new(points: &[[f64; 2]]) -> Self {
        Self {
            xs: points.iter().map(|[x, _]| *x).collect(),
            ys: points.iter().map(|[_, y]| *y).collect(),
            color: "black".to_string(),
            radius: 2.5,
            name: String::new(),
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn insert_into(self, mut ax: Axis) -> Axis {
        ax.add_scatter(self);
        ax
    }
}

impl Element for ScatterPlot {
    fn to_tags(&self, ax: &Axis, fig: &Figure) -> Vec<Box<dyn svg::RenderTag>> {
        let (x, y, u, v) = ax.transformations(fig);
        let style = element_opts(&[("fill", self.color.as_str()), ("fill-opacity", "0.8")]);
        self.xs
            .iter()
            .zip(self.ys.iter())
            .filter(|(xi, yi)| xi.is_finite() && yi.is_finite() && ax.contains(**xi, **yi))
            .map(|(xi, yi)| {
                Box::new(Tag::<svg::Circle>::new(
                    x(u(*xi)),
                    y(v(*yi)),
                    self.radius,
                    Some(style.clone()),
                )) as Box<dyn svg::RenderTag>
            })
            .collect()
    }
}

// ----------------------------------------------------------------------------
//
//
// Helpers
//
//
// ----------------------------------------------------------------------------

/// Generate svg::Params from a slice of pairs.
pub fn element_opts(items: &[(&str, &str)]) -> Params {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn format_ticks(tick_positions: &[f64]) -> Vec<String> {
    let (_, _, mag_increment) = ticks_magnitude_and_increment(tick_positions);

    let fmt_fun = match mag_increment {
        i8::MIN..=-4 => |z| format!("{z:.2e}"),
        -3 => |z| format!("{z:.4}"),
        -2 => |z| format!("{z:.3}"),
        -1 | 0 => |z| format!("{z:.1}"),
        1..=4 => |z| format!("{z:.0}"),
        5..=i8::MAX => |z| format!("{z:.0e}"),
    };

    tick_positions.iter().map(fmt_fun).collect()
}

fn ticks_magnitude_and_increment(tick_positions: &[f64]) -> (i8, i8, i8) {
    if tick_positions.len() < 2 {
        return (0, 0, 0);
    }
    let (magnitude_min, magnitude_max) =
        tick_positions
            .iter()
            .filter(|y| **y != 0.0)
            .fold((f64::MAX, f64::MIN), |mut acc, x| {
                let mag_x = x.abs().log10();
                if mag_x < acc.0 {
                    acc.0 = mag_x
                };
                if mag_x > acc.1 {
                    acc.1 = mag_x
                };
                acc
            });
    let mag_increment = {
        let n = tick_positions.len() - 1;
        let acc: f64 = tick_positions
            .iter()
            .zip(tick_positions.iter().skip(1))
            .map(|(zi, zj)| (zj - zi).abs())
            .sum();
        (acc / n as f64).log10()
    };
    (
        magnitude_min.floor() as i8,
        magnitude_max.floor() as i8,
        mag_increment.floor() as i8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_magnitude_and_increment_1() {
        let pos = vec![0.001, 0.002, 0.003, 0.004];
        let (magnitude_min, magnitude_max, mag_increment) = ticks_magnitude_and_increment(&pos);
        assert_eq!(mag_increment, -3);
        assert_eq!(magnitude_min, -3);
        assert_eq!(magnitude_max, -3);
    }

    #[test]
    fn test_ticks_magnitude_and_increment_2() {
        let pos = vec![10000.0, 12000.0, 14000.0, 16000.0, 18000.0, 20000.0];
        let (magnitude_min, magnitude_max, mag_increment) = ticks_magnitude_and_increment(&pos);
        assert_eq!(mag_increment, 3);
        assert_eq!(magnitude_min, 4);
        assert_eq!(magnitude_max, 4);
    }

    #[test]
    fn test_single_tick_does_not_panic() {
        assert_eq!(format_ticks(&[3.0]), vec!["3.0"]);
        assert!(format_ticks(&[]).is_empty());
    }

    #[test]
    fn test_padded_range() {
        let (min, max) = padded_range([0.0, 10.0].into_iter());
        assert!((min + 0.5).abs() < 1e-12);
        assert!((max - 10.5).abs() < 1e-12);
        assert_eq!(padded_range([2.0, 2.0].into_iter()), (1.5, 2.5));
        assert_eq!(padded_range([f64::NAN].into_iter()), (0.0, 1.0));
    }

    #[test]
    fn test_scatter_points_outside_limits_are_skipped() {
        let fig = Figure::default();
        let ax = Axis::default().with_xlim(0.0, 1.0).with_ylim(0.0, 1.0);
        let scatter = ScatterPlot::new(&[[0.5, 0.5], [2.0, 0.5], [f64::NAN, 0.1]]);
        assert_eq!(scatter.to_tags(&ax, &fig).len(), 1);
    }

    #[test]
    fn test_render_grid_with_twin_axis() {
        let mut fig = Figure::empty(800, 600);
        let mut ax = Axis::in_grid(2, 1, 1, 0)
            .with_xlabel("x")
            .with_ylabel("primary")
            .with_title("second row")
            .with_legend(true)
            .with_scatter(ScatterPlot::new(&[[0.0, 1.0], [1.0, 2.0]]).with_name("first"));
        ax.fit_to_data(true);
        let mut twin = ax
            .twin()
            .with_ylabel("secondary")
            .with_legend(true)
            .with_legend_offset(ax.num_plots())
            .with_scatter(
                ScatterPlot::new(&[[0.0, 100.0], [1.0, 300.0]])
                    .with_name("second")
                    .with_color("#ff0000"),
            );
        twin.fit_to_data(false);
        assert_eq!(twin.limits()[0], ax.limits()[0]);

        ax.insert_into(&mut fig);
        twin.insert_into(&mut fig);
        assert_eq!(fig.num_axes(), 2);

        let raw = fig.render();
        assert_eq!(raw.matches("<circle").count(), 4);
        assert!(raw.contains(">second row</text>"));
        assert!(raw.contains(">secondary</text>"));
        assert!(raw.contains("fill:#ff0000"));
        // Only the primary axis draws a frame (plus the white background).
        assert_eq!(raw.matches("<rect").count(), 2);
    }
}
