use crate::color::ColorRGB;
use crate::error::{EftError, Result, try_alloc};
use crate::types::{CompressedTile, DecodedTile};
use crate::{BLOCK_SIZE, BLOCKS_PER_TILE_ROW, TILE_DIM};
use byteorder::{ByteOrder, LE};
use image::{ImageBuffer, Rgba};

/// One 8-byte DXT1 block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dxt1Block {
    pub color0: u16,
    pub color1: u16,
    pub codes: u32,
}

impl Dxt1Block {
    pub fn read(data: &[u8]) -> Self {
        Self {
            color0: LE::read_u16(&data[0..2]),
            color1: LE::read_u16(&data[2..4]),
            codes: LE::read_u32(&data[4..8]),
        }
    }

    /// Four-color mode is selected by comparing the packed endpoints.
    pub fn is_opaque(&self) -> bool {
        self.color0 > self.color1
    }

    pub fn palette(&self) -> [ColorRGB; 4] {
        let c0 = ColorRGB::from_565(self.color0);
        let c1 = ColorRGB::from_565(self.color1);
        if self.is_opaque() {
            [c0, c1, (c0 * 2 + c1) / 3, (c0 + c1 * 2) / 3]
        } else {
            [c0, c1, (c0 + c1) / 2, ColorRGB::BLACK]
        }
    }

    /// Decodes the block into 16 pixels in raster order.
    pub fn decode(&self) -> [Rgba<u8>; 16] {
        let palette = self.palette();
        let selectors = reassemble_selectors(self.codes);
        let mut out = [Rgba([0, 0, 0, 255]); 16];
        for yb in 0..4 {
            for xb in 0..4 {
                let shift = (yb * 4 + xb) * 2;
                let index = ((selectors >> shift) & 0x3) as usize;
                out[yb * 4 + xb] = palette[index].to_pixel();
            }
        }
        out
    }
}

/// Splits the selector word into bytes and puts them back in the same order.
///
/// The result always equals the input. Tile placement was validated against
/// this exact sequence.
#[inline]
pub fn reassemble_selectors(codes: u32) -> u32 {
    let bytes = [
        (codes & 0xFF) as u8,
        ((codes >> 8) & 0xFF) as u8,
        ((codes >> 16) & 0xFF) as u8,
        ((codes >> 24) & 0xFF) as u8,
    ];
    ((bytes[3] as u32) << 24)
        | ((bytes[2] as u32) << 16)
        | ((bytes[1] as u32) << 8)
        | bytes[0] as u32
}

/// Decodes one compressed tile into a 512x512 RGBA tile.
pub fn decode_tile(tile: CompressedTile<'_>) -> Result<DecodedTile> {
    let data = tile.bytes();
    let stride = TILE_DIM as usize;
    let mut pixels = try_alloc(stride * stride * 4)?;

    for by in 0..BLOCKS_PER_TILE_ROW {
        for bx in 0..BLOCKS_PER_TILE_ROW {
            let offset = (by * BLOCK_SIZE * BLOCKS_PER_TILE_ROW) + bx * BLOCK_SIZE;
            let block = Dxt1Block::read(&data[offset..offset + BLOCK_SIZE]).decode();

            for yb in 0..4 {
                for xb in 0..4 {
                    let dst = ((by * 4 + yb) * stride + (bx * 4 + xb)) * 4;
                    pixels[dst..dst + 4].copy_from_slice(&block[yb * 4 + xb].0);
                }
            }
        }
    }

    // Length is exact, so from_raw cannot fail.
    let image = ImageBuffer::from_raw(TILE_DIM, TILE_DIM, pixels)
        .ok_or_else(|| EftError::MalformedInput("decoded tile has wrong length".into()))?;
    Ok(DecodedTile::from_image(image))
}
