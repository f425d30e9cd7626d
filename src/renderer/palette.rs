//! Theme colors

use crate::sim::ColorClass;

/// TEDx red used for letters and the watermark
pub const TEDX_RED: &str = "#FF3B2F";
/// Darker red for the player mark and jump dust
pub const TEDX_RED_DEEP: &str = "#E62B1E";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub ground: &'static str,
    pub ground_line: &'static str,
    /// Black on light, white on dark
    pub contrast: &'static str,
    pub glyph_shadow: &'static str,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: "#FFFFFF",
        ground: "#F0F0F0",
        ground_line: "#CCCCCC",
        contrast: "#000000",
        glyph_shadow: "rgba(0, 0, 0, 0.3)",
    };

    pub const DARK: Palette = Palette {
        background: "#000000",
        ground: "#1A1A1A",
        ground_line: "#333333",
        contrast: "#FFFFFF",
        glyph_shadow: "rgba(255, 255, 255, 0.3)",
    };

    pub fn for_theme(dark_mode: bool) -> Self {
        if dark_mode { Self::DARK } else { Self::LIGHT }
    }

    /// Obstacle letter color
    pub fn glyph(&self, class: ColorClass) -> &'static str {
        match class {
            ColorClass::Primary => TEDX_RED,
            ColorClass::Contrast => self.contrast,
        }
    }

    /// Particle color
    pub fn particle(&self, class: ColorClass) -> &'static str {
        match class {
            ColorClass::Primary => TEDX_RED_DEEP,
            ColorClass::Contrast => self.contrast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_follows_theme() {
        assert_eq!(Palette::for_theme(false).glyph(ColorClass::Contrast), "#000000");
        assert_eq!(Palette::for_theme(true).glyph(ColorClass::Contrast), "#FFFFFF");
        assert_eq!(Palette::for_theme(true).glyph(ColorClass::Primary), TEDX_RED);
        assert_eq!(Palette::for_theme(false).particle(ColorClass::Primary), TEDX_RED_DEEP);
    }
}
