use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::groups::RedshiftGroup;

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
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Redshift group colours
// ---------------------------------------------------------------------------

/// Scatter colour of each redshift group.
#[derive(Debug, Clone)]
pub struct GroupColors {
    binned: Vec<Color32>,
    out_of_range: Color32,
    ungrouped: Color32,
}

impl Default for GroupColors {
    fn default() -> Self {
        GroupColors {
            binned: generate_palette(3),
            out_of_range: Color32::GRAY,
            ungrouped: Color32::LIGHT_BLUE,
        }
    }
}

impl GroupColors {
    pub fn color_for(&self, group: Option<RedshiftGroup>) -> Color32 {
        match group {
            None => self.ungrouped,
            Some(RedshiftGroup::OutOfRange) => self.out_of_range,
            Some(g) => self.binned[g as usize],
        }
    }
}

// ---------------------------------------------------------------------------
// Diverging colour map for correlation coefficients
// ---------------------------------------------------------------------------

/// Blue (−1) → light grey (0) → red (+1); NaN is mid grey.
pub fn diverging(value: f64) -> Color32 {
    if !value.is_finite() {
        return Color32::GRAY;
    }
    let cold: LinSrgb = Srgb::new(59u8, 76, 192).into_format::<f32>().into_linear();
    let neutral: LinSrgb = Srgb::new(221u8, 221, 221).into_format::<f32>().into_linear();
    let warm: LinSrgb = Srgb::new(180u8, 4, 38).into_format::<f32>().into_linear();

    let t = value.clamp(-1.0, 1.0) as f32;
    let mixed = if t < 0.0 {
        neutral.mix(cold, -t)
    } else {
        neutral.mix(warm, t)
    };
    to_color32(Srgb::from_linear(mixed))
}

/// Annotation colour readable on top of [`diverging`].
pub fn diverging_text(value: f64) -> Color32 {
    if value.is_finite() && value.abs() > 0.6 {
        Color32::WHITE
    } else {
        Color32::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn groups_get_distinct_colours() {
        let colors = GroupColors::default();
        let mut seen: Vec<Color32> = RedshiftGroup::ALL
            .iter()
            .map(|g| colors.color_for(Some(*g)))
            .collect();
        seen.push(colors.color_for(None));
        seen.dedup();
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn diverging_end_points() {
        assert_eq!(diverging(-1.0), Color32::from_rgb(59, 76, 192));
        assert_eq!(diverging(0.0), Color32::from_rgb(221, 221, 221));
        assert_eq!(diverging(1.0), Color32::from_rgb(180, 4, 38));
        assert_eq!(diverging(f64::NAN), Color32::GRAY);
        assert_eq!(diverging(3.0), diverging(1.0));
    }
}
