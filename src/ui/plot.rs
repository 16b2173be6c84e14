use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::chart::{ChartBackend, ChartData, ChartSpec};
use crate::color::Rgb;

// ---------------------------------------------------------------------------
// egui_plot backend
// ---------------------------------------------------------------------------

/// Builds egui_plot figures from chart specs.
#[derive(Debug, Default, Clone, Copy)]
pub struct EguiCharts;

/// Arc resolution for pie wedges, in segments per full turn.
const SEGMENTS_PER_TURN: f64 = 120.0;

fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

#[derive(Debug, Clone)]
struct Wedge {
    label: String,
    share: f64,
    color: Color32,
    outline: Vec<[f64; 2]>,
    label_pos: [f64; 2],
}

#[derive(Debug, Clone)]
struct PointGroup {
    name: String,
    color: Color32,
    points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
enum Body {
    Pie(Vec<Wedge>),
    Scatter {
        groups: Vec<PointGroup>,
        x_label: String,
        y_label: String,
    },
}

/// A chart ready to be drawn every frame.
#[derive(Debug, Clone)]
pub struct Figure {
    title: String,
    body: Body,
}

impl ChartBackend for EguiCharts {
    type Figure = Figure;

    fn build_chart(&self, spec: &ChartSpec) -> Figure {
        let body = match &spec.data {
            ChartData::Pie { slices } => {
                let total: u64 = slices.iter().map(|s| s.value).sum();
                let mut wedges = Vec::new();
                let mut start = 0.0;
                for slice in slices.iter().filter(|s| s.value > 0) {
                    let share = slice.value as f64 / total as f64;
                    wedges.push(Wedge {
                        label: slice.label.clone(),
                        share,
                        color: color32(slice.color),
                        outline: wedge_outline(start, share),
                        label_pos: polar(start + share / 2.0, 0.65),
                    });
                    start += share;
                }
                Body::Pie(wedges)
            }
            ChartData::Scatter { series } => {
                let (x_label, y_label) = spec
                    .axes
                    .as_ref()
                    .map(|a| (a.x.clone(), a.y.clone()))
                    .unwrap_or_default();
                let groups = series
                    .iter()
                    .filter(|s| !s.points.is_empty())
                    .map(|s| PointGroup {
                        name: s.name.clone(),
                        color: color32(s.color),
                        points: s.points.iter().map(|p| [p.x, p.y]).collect(),
                    })
                    .collect();
                Body::Scatter {
                    groups,
                    x_label,
                    y_label,
                }
            }
        };

        Figure {
            title: spec.title.clone(),
            body,
        }
    }
}

/// Point at `fraction` of a clockwise turn starting from twelve o'clock.
fn polar(fraction: f64, radius: f64) -> [f64; 2] {
    let angle = FRAC_PI_2 - fraction * TAU;
    [radius * angle.cos(), radius * angle.sin()]
}

/// Closed outline of a unit-circle wedge covering `[start, start + share)` of a turn.
fn wedge_outline(start: f64, share: f64) -> Vec<[f64; 2]> {
    let steps = ((share * SEGMENTS_PER_TURN).ceil() as usize).max(2);
    let mut outline = Vec::with_capacity(steps + 2);
    outline.push([0.0, 0.0]);
    for i in 0..=steps {
        outline.push(polar(start + share * i as f64 / steps as f64, 1.0));
    }
    outline
}

impl Figure {
    pub fn is_empty(&self) -> bool {
        match &self.body {
            Body::Pie(wedges) => wedges.is_empty(),
            Body::Scatter { groups, .. } => groups.is_empty(),
        }
    }

    /// Draw the figure with its title. `id` must be unique per chart slot.
    pub fn show(&self, ui: &mut Ui, id: &str, height: f32) {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new(&self.title).strong().size(16.0));
        });

        if self.is_empty() {
            ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.weak("No launches match the current selection.");
                });
            });
            return;
        }

        match &self.body {
            Body::Pie(wedges) => show_pie(ui, id, height, wedges),
            Body::Scatter {
                groups,
                x_label,
                y_label,
            } => show_scatter(ui, id, height, groups, x_label, y_label),
        }
    }
}

fn show_pie(ui: &mut Ui, id: &str, height: f32, wedges: &[Wedge]) {
    Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .include_x(-1.2)
        .include_x(1.2)
        .include_y(-1.2)
        .include_y(1.2)
        .show(ui, |plot_ui| {
            for wedge in wedges {
                let polygon = Polygon::new(PlotPoints::new(wedge.outline.clone()))
                    .name(&wedge.label)
                    .fill_color(wedge.color)
                    .stroke(Stroke::new(1.0, Color32::WHITE));
                plot_ui.polygon(polygon);

                let [x, y] = wedge.label_pos;
                let text = RichText::new(format!("{:.1}%", wedge.share * 100.0))
                    .color(Color32::WHITE)
                    .strong();
                plot_ui.text(Text::new(PlotPoint::new(x, y), text));
            }
        });
}

fn show_scatter(
    ui: &mut Ui,
    id: &str,
    height: f32,
    groups: &[PointGroup],
    x_label: &str,
    y_label: &str,
) {
    Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for group in groups {
                let points = Points::new(PlotPoints::new(group.points.clone()))
                    .name(&group.name)
                    .color(group.color)
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(4.0);
                plot_ui.points(points);
            }
        });
}
