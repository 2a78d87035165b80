use crate::error::{EftError, Result};
use crate::{COMPRESSED_TILE_SIZE, TILE_DIM};
use image::{Rgba, RgbaImage};
use serde::Serialize;
use std::fmt;

/// Byte order of the color channels in a composed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ChannelOrder {
    #[default]
    Rgba,
    Bgra,
}

impl ChannelOrder {
    /// Places a logical RGBA pixel into output byte order.
    #[inline]
    pub fn place(self, pixel: Rgba<u8>) -> [u8; 4] {
        let [r, g, b, a] = pixel.0;
        match self {
            ChannelOrder::Rgba => [r, g, b, a],
            ChannelOrder::Bgra => [b, g, r, a],
        }
    }
}

/// Whether the tile grid is walked with width and height exchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AxisOrder {
    #[default]
    Normal,
    Swapped,
}

impl AxisOrder {
    pub fn from_swap(swap: bool) -> Self {
        if swap {
            AxisOrder::Swapped
        } else {
            AxisOrder::Normal
        }
    }

    /// Returns `(width_stride, height_stride)` for the declared dimensions.
    pub fn strides(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            AxisOrder::Normal => (width, height),
            AxisOrder::Swapped => (height, width),
        }
    }
}

/// Compositor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Layout {
    pub axes: AxisOrder,
    pub channels: ChannelOrder,
}

impl Layout {
    pub fn new(axes: AxisOrder, channels: ChannelOrder) -> Self {
        Self { axes, channels }
    }
}

/// Conditions that still yield an image but may affect how it looks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DecodeWarning {
    /// The header lacked the expected magic number.
    MissingMagic(u64),
    /// The metadata blob carries ordering data that is not applied; tiles are
    /// placed sequentially and the image may come out scrambled.
    UnresolvedTileOrder,
    /// Bytes after the last whole tile were ignored.
    TrailingBytes(usize),
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::MissingMagic(found) => {
                write!(f, "unrecognized magic {:#018x}", found)
            }
            DecodeWarning::UnresolvedTileOrder => {
                write!(f, "tile ordering data is not applied, the image may look scrambled")
            }
            DecodeWarning::TrailingBytes(n) => {
                write!(f, "{} trailing bytes after the last whole tile were ignored", n)
            }
        }
    }
}

/// One 512x512 tile of DXT1 blocks, borrowed from the source buffer.
#[derive(Debug, Clone, Copy)]
pub struct CompressedTile<'a>(&'a [u8; COMPRESSED_TILE_SIZE]);

impl<'a> CompressedTile<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let data: &'a [u8; COMPRESSED_TILE_SIZE] = data.try_into().map_err(|_| {
            EftError::MalformedInput(format!(
                "compressed tile must be {} bytes, got {}",
                COMPRESSED_TILE_SIZE,
                data.len()
            ))
        })?;
        Ok(Self(data))
    }

    /// Returns tile `index` of a buffer of concatenated tiles.
    pub fn nth(data: &'a [u8], index: usize) -> Result<Self> {
        let start = index * COMPRESSED_TILE_SIZE;
        let end = start + COMPRESSED_TILE_SIZE;
        match data.get(start..end) {
            Some(slice) => Self::new(slice),
            None => Err(EftError::MalformedInput(format!(
                "tile {} lies outside the {} byte input",
                index,
                data.len()
            ))),
        }
    }

    pub fn bytes(&self) -> &'a [u8; COMPRESSED_TILE_SIZE] {
        self.0
    }
}

/// A decoded 512x512 RGBA tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTile(RgbaImage);

impl DecodedTile {
    pub(crate) fn from_image(image: RgbaImage) -> Self {
        debug_assert_eq!(image.dimensions(), (TILE_DIM, TILE_DIM));
        Self(image)
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.0.get_pixel(x, y)
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.0
    }

    pub fn into_image(self) -> RgbaImage {
        self.0
    }
}
