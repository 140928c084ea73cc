use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Diverging red → yellow → green scale for the country map
// ---------------------------------------------------------------------------

/// Colour for `t` in `[0, 1]` on a red-yellow-green scale; out-of-range
/// values are clamped. Interpolates in linear RGB.
pub fn red_yellow_green(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.5 };
    let red: LinSrgb = Srgb::new(0.843, 0.188, 0.153).into_linear();
    let yellow: LinSrgb = Srgb::new(1.0, 1.0, 0.749).into_linear();
    let green: LinSrgb = Srgb::new(0.102, 0.596, 0.314).into_linear();

    let mixed = if t < 0.5 {
        red.mix(yellow, t * 2.0)
    } else {
        yellow.mix(green, (t - 0.5) * 2.0)
    };
    to_color32(Srgb::from_linear(mixed))
}

/// Position of `value` within `[min, max]`, 0.5 for a degenerate range.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range <= 0.0 {
        0.5
    } else {
        (value - min) / range
    }
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_text(background: Color32) -> Color32 {
    let luma = 0.299 * f32::from(background.r())
        + 0.587 * f32::from(background.g())
        + 0.114 * f32::from(background.b());
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps every category of a column to a distinct colour.
///
/// Built from the whole dataset so a category keeps its colour when
/// filters hide other categories.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: BTreeMap<Arc<str>, Color32>,
    default_color: Color32,
}

impl CategoryColors {
    pub fn new(categories: &BTreeSet<Arc<str>>) -> Self {
        let palette = generate_palette(categories.len());
        let mapping = categories
            .iter()
            .zip(palette)
            .map(|(label, c)| (Arc::clone(label), c))
            .collect();

        CategoryColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given category.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        let distinct: BTreeSet<[u8; 4]> = colors.iter().map(|c| c.to_array()).collect();
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn scale_runs_red_to_green() {
        let low = red_yellow_green(0.0);
        let high = red_yellow_green(1.0);
        assert!(low.r() > low.g());
        assert!(high.g() > high.r());
        assert_eq!(red_yellow_green(-3.0), low);
        assert_eq!(red_yellow_green(7.0), high);
    }

    #[test]
    fn text_contrasts_with_background() {
        assert_eq!(contrast_text(red_yellow_green(0.5)), Color32::BLACK);
        assert_eq!(contrast_text(Color32::from_rgb(20, 20, 80)), Color32::WHITE);
    }

    #[test]
    fn normalize_handles_flat_range() {
        assert_eq!(normalize(5.0, 5.0, 5.0), 0.5);
        assert_eq!(normalize(15.0, 10.0, 20.0), 0.5);
        assert_eq!(normalize(20.0, 10.0, 20.0), 1.0);
    }

    #[test]
    fn category_colours_are_stable() {
        let cats: BTreeSet<Arc<str>> = ["hybrid", "onsite", "remote"].iter().map(|s| Arc::from(*s)).collect();
        let colors = CategoryColors::new(&cats);
        assert_eq!(colors.color_for("remote"), CategoryColors::new(&cats).color_for("remote"));
        assert_ne!(colors.color_for("remote"), colors.color_for("hybrid"));
        assert_eq!(colors.color_for("unknown"), Color32::GRAY);
    }
}
