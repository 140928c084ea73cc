use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, Painter, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::{contrast_text, normalize, red_yellow_green, CategoryColors};
use crate::data::aggregate::{CategoryCount, GroupMean, HistogramBin};
use crate::format;

const CHART_HEIGHT: f32 = 320.0;
const BAR_COLOR: Color32 = Color32::from_rgb(0x63, 0x6e, 0xfa);

// ---------------------------------------------------------------------------
// Horizontal bar chart of group means (top jobs / top countries)
// ---------------------------------------------------------------------------

/// Horizontal bars, one per group, bottom to top in the given order.
pub fn group_means_chart(ui: &mut Ui, id: &str, title: &str, groups: &[GroupMean]) {
    ui.strong(title);

    let labels: Vec<String> = groups.iter().map(|g| g.label.to_string()).collect();
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.mean)
                .name(format!("{}: {} ({} records)", g.label, format::usd(g.mean), g.count))
                .fill(BAR_COLOR)
                .width(0.7)
        })
        .collect();

    let chart = BarChart::new(bars)
        .horizontal()
        .color(BAR_COLOR)
        .element_formatter(Box::new(|bar: &Bar, _: &BarChart| bar.name.clone()));

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_label("Mean annual salary (USD)")
        .x_axis_formatter(|mark, _range| format::usd(mark.value))
        .y_axis_formatter(move |mark, _range| category_tick(&labels, mark.value))
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Label for an axis tick that lands on a bar index, empty elsewhere.
fn category_tick(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Salary histogram
// ---------------------------------------------------------------------------

pub fn salary_histogram(ui: &mut Ui, bins: &[HistogramBin]) {
    ui.strong("Salary distribution");

    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .name(format!(
                    "{} – {}: {}",
                    format::usd(b.lower),
                    format::usd(b.upper),
                    format::count(b.count)
                ))
                .fill(BAR_COLOR)
        })
        .collect();

    let chart = BarChart::new(bars)
        .color(BAR_COLOR)
        .element_formatter(Box::new(|bar: &Bar, _: &BarChart| bar.name.clone()));

    Plot::new("salary_histogram")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_label("Salary range (USD)")
        .y_axis_label("Frequency")
        .x_axis_formatter(|mark, _range| format::usd(mark.value))
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Donut chart for the remote-work mix
// ---------------------------------------------------------------------------

pub fn remote_donut(ui: &mut Ui, mix: &[CategoryCount], total: usize, colors: &CategoryColors) {
    ui.strong("Remote-work mix");

    ui.horizontal(|ui: &mut Ui| {
        let size = CHART_HEIGHT * 0.75;
        let (rect, _response) = ui.allocate_exact_size(Vec2::splat(size), Sense::hover());
        let painter = ui.painter_at(rect);
        let outer = size / 2.0 - 4.0;
        let inner = outer * 0.5;

        for (entry, (start, sweep)) in mix.iter().zip(slice_angles(mix, total)) {
            paint_ring_segment(
                &painter,
                rect.center(),
                (inner, outer),
                start,
                sweep,
                colors.color_for(&entry.label),
            );
        }

        ui.vertical(|ui: &mut Ui| {
            for entry in mix {
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                    ui.painter()
                        .rect_filled(swatch, 2.0, colors.color_for(&entry.label));
                    ui.label(format!(
                        "{}  {:.1}% ({})",
                        entry.label,
                        entry.share(total) * 100.0,
                        format::count(entry.count)
                    ));
                });
            }
        });
    });
}

/// `(start, sweep)` in radians for each slice, starting at twelve o'clock.
fn slice_angles(mix: &[CategoryCount], total: usize) -> Vec<(f32, f32)> {
    let mut start = -FRAC_PI_2;
    mix.iter()
        .map(|entry| {
            let sweep = entry.share(total) as f32 * TAU;
            let slice = (start, sweep);
            start += sweep;
            slice
        })
        .collect()
}

/// An annulus segment drawn as thin convex quads.
fn paint_ring_segment(
    painter: &Painter,
    center: Pos2,
    (inner, outer): (f32, f32),
    start: f32,
    sweep: f32,
    color: Color32,
) {
    if sweep <= 0.0 {
        return;
    }
    let steps = ((sweep / TAU) * 128.0).ceil().max(1.0) as usize;
    let at = |radius: f32, angle: f32| center + Vec2::angled(angle) * radius;

    for i in 0..steps {
        let a0 = start + sweep * i as f32 / steps as f32;
        let a1 = start + sweep * (i + 1) as f32 / steps as f32;
        painter.add(Shape::convex_polygon(
            vec![at(outer, a0), at(outer, a1), at(inner, a1), at(inner, a0)],
            color,
            Stroke::NONE,
        ));
    }
}

// ---------------------------------------------------------------------------
// Country heat tiles (choropleth stand-in)
// ---------------------------------------------------------------------------

/// One tile per country, coloured red (lowest mean) to green (highest).
pub fn country_tiles(ui: &mut Ui, title: &str, groups: &[GroupMean]) {
    ui.strong(title);

    let min = groups.iter().map(|g| g.mean).fold(f64::INFINITY, f64::min);
    let max = groups.iter().map(|g| g.mean).fold(f64::NEG_INFINITY, f64::max);

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for g in groups {
            let fill = red_yellow_green(normalize(g.mean, min, max));
            let text = RichText::new(&*g.label).strong().color(contrast_text(fill));
            ui.add(
                egui::Button::new(text)
                    .fill(fill)
                    .min_size(Vec2::new(64.0, 40.0)),
            )
            .on_hover_text(format!(
                "{}: {} mean over {} records",
                g.label,
                format::usd(g.mean),
                format::count(g.count)
            ));
        }
    });

    ui.add_space(6.0);
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format::usd(min));
        let (rect, _) = ui.allocate_exact_size(Vec2::new(200.0, 12.0), Sense::hover());
        let steps = 40;
        let step_width = rect.width() / steps as f32;
        for i in 0..steps {
            let x = rect.left() + i as f32 * step_width;
            let cell = egui::Rect::from_min_size(
                Pos2::new(x, rect.top()),
                Vec2::new(step_width + 0.5, rect.height()),
            );
            let t = i as f64 / (steps - 1) as f64;
            ui.painter().rect_filled(cell, 0.0, red_yellow_green(t));
        }
        ui.label(format::usd(max));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn ticks_only_on_bar_indices() {
        let labels = vec!["USA".to_string(), "CAN".to_string()];
        assert_eq!(category_tick(&labels, 1.0), "CAN");
        assert_eq!(category_tick(&labels, 0.5), "");
        assert_eq!(category_tick(&labels, -1.0), "");
        assert_eq!(category_tick(&labels, 2.0), "");
    }

    #[test]
    fn slices_cover_the_full_circle() {
        let mix = vec![
            CategoryCount { label: Arc::from("remote"), count: 3 },
            CategoryCount { label: Arc::from("onsite"), count: 1 },
        ];
        let angles = slice_angles(&mix, 4);
        let swept: f32 = angles.iter().map(|(_, s)| s).sum();
        assert!((swept - TAU).abs() < 1e-5);
        assert!((angles[1].0 - (angles[0].0 + angles[0].1)).abs() < 1e-6);
    }
}
