use image::Rgba;

/// Expands a 5-bit channel to 8 bits with rounding.
#[inline]
pub fn expand5(v: u16) -> u8 {
    debug_assert!(v <= 0x1F);
    (((v * 527) + 23) >> 6) as u8
}

/// Expands a 6-bit channel to 8 bits with rounding.
#[inline]
pub fn expand6(v: u16) -> u8 {
    debug_assert!(v <= 0x3F);
    (((v * 259) + 33) >> 6) as u8
}

/// Opaque 8-bit RGB color with widened arithmetic for palette interpolation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorRGB {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl ColorRGB {
    pub const BLACK: ColorRGB = ColorRGB { r: 0, g: 0, b: 0 };

    pub fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// Unpacks an RGB565 value (red in the high bits).
    pub fn from_565(v: u16) -> Self {
        Self {
            r: expand5((v >> 11) & 0x1F) as i32,
            g: expand6((v >> 5) & 0x3F) as i32,
            b: expand5(v & 0x1F) as i32,
        }
    }

    /// Converts to an opaque pixel. Channels are truncated to 8 bits.
    pub fn to_pixel(self) -> Rgba<u8> {
        Rgba([self.r as u8, self.g as u8, self.b as u8, 255])
    }
}

impl std::ops::Add for ColorRGB {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl std::ops::Mul<i32> for ColorRGB {
    type Output = Self;
    fn mul(self, scalar: i32) -> Self {
        Self {
            r: self.r * scalar,
            g: self.g * scalar,
            b: self.b * scalar,
        }
    }
}

// Integer division per channel, truncating like the engine's decoder.
impl std::ops::Div<i32> for ColorRGB {
    type Output = Self;
    fn div(self, scalar: i32) -> Self {
        Self {
            r: self.r / scalar,
            g: self.g / scalar,
            b: self.b / scalar,
        }
    }
}
