use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use vc_scout::data::stats::SectorCount;

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
            let hsl = Hsl::new(hue, 0.70, 0.50);
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
// Color mapping: sector → Color32
// ---------------------------------------------------------------------------

/// Gives each sector of the current view its own colour, so chart bars and
/// card tags match.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: HashMap<String, Color32>,
    default_color: Color32,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self {
            mapping: HashMap::new(),
            default_color: Color32::GRAY,
        }
    }
}

impl ColorMap {
    /// Colours assigned in histogram order, largest sector first.
    pub fn new(sectors: &[SectorCount]) -> Self {
        let palette = generate_palette(sectors.len());
        let mapping = sectors
            .iter()
            .zip(palette)
            .map(|(s, c)| (s.sector.clone(), c))
            .collect();
        ColorMap {
            mapping,
            ..Default::default()
        }
    }

    pub fn color_for(&self, sector: &str) -> Color32 {
        self.mapping
            .get(sector)
            .copied()
            .unwrap_or(self.default_color)
    }
}
