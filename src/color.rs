//! Colors used by the demo scene.
//!
//! Colors are RGBA with `f32` components in the range [0.0, 1.0].

pub use rgb::Rgba;

/// The color type used throughout instagrid.
pub type Color = Rgba<f32>;

/// Black (0, 0, 0).
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

/// White (255, 255, 255).
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Silver (192, 192, 192). Default model color.
pub const SILVER: Color = Color::new(0.7529412, 0.7529412, 0.7529412, 1.0);

/// Light steel blue (176, 196, 222).
pub const LIGHT_STEEL_BLUE: Color = Color::new(0.6901961, 0.76862746, 0.87058824, 1.0);

/// `0x444444`, color of the center lines of the ground grid.
pub const GRID_CENTER_LINE: Color = from_hex(0x444444);

/// `0x888888`, color of the other lines of the ground grid.
pub const GRID_LINE: Color = from_hex(0x888888);

/// Transparent color (0, 0, 0, 0).
pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

/// Converts a `0xRRGGBB` value to an opaque color.
#[inline]
pub const fn from_hex(rgb: u32) -> Color {
    Color::new(
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_conversion() {
        assert_eq!(from_hex(0xffffff), WHITE);
        assert_eq!(from_hex(0x000000), BLACK);

        let c = from_hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1.0e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);

        assert!((GRID_CENTER_LINE.r - 0.2667).abs() < 1.0e-3);
        assert!((GRID_LINE.g - 0.5333).abs() < 1.0e-3);
    }
}
