use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
            let hsl = Hsl::new(hue, 0.65, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Series colours: series key → Color32
// ---------------------------------------------------------------------------

/// Stable colour per chart series (years of the monthly charts, states of
/// the map).
#[derive(Debug, Clone)]
pub struct SeriesColors<K: Ord> {
    mapping: BTreeMap<K, Color32>,
    default_color: Color32,
}

impl<K: Ord + Clone> SeriesColors<K> {
    pub fn new<'a, I>(keys: I) -> Self
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut keys: Vec<K> = keys.into_iter().cloned().collect();
        keys.sort();
        keys.dedup();
        let palette = generate_palette(keys.len());
        SeriesColors {
            mapping: keys.into_iter().zip(palette).collect(),
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, key: &K) -> Color32 {
        self.mapping.get(key).copied().unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(3).len(), 3);
    }

    #[test]
    fn test_duplicate_keys_share_a_colour() {
        let colors = SeriesColors::new(&[2022, 2020, 2022, 2021]);
        assert_eq!(colors.mapping.len(), 3);
        assert_ne!(colors.color_for(&2020), colors.color_for(&2021));
        assert_eq!(colors.color_for(&1999), Color32::GRAY);
    }
}
