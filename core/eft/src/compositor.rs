use crate::TILE_DIM;
use crate::error::{EftError, Result, try_alloc};
use crate::types::{AxisOrder, ChannelOrder, DecodedTile, Layout};
use image::{ImageBuffer, RgbaImage};
use rayon::prelude::*;

/// Source position inside a decoded tile for output position `(x, y)`.
///
/// Columns are shifted left by 8 with wraparound, and the last 8 columns also
/// take their rows from 4 further down.
#[inline]
pub fn remap(x: u32, y: u32) -> (u32, u32) {
    let x_offset = (x + 8) & (TILE_DIM - 1);
    let y_offset = if x > TILE_DIM - 9 {
        (y + 4) & (TILE_DIM - 1)
    } else {
        y
    };
    (x_offset, y_offset)
}

/// Tile grid geometry for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub rows: u32,
    pub cols: u32,
    pub width_stride: u32,
    pub height_stride: u32,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, axes: AxisOrder) -> Result<Self> {
        if width == 0 || height == 0 || width % TILE_DIM != 0 || height % TILE_DIM != 0 {
            return Err(EftError::MalformedInput(format!(
                "image dimensions {}x{} are not positive multiples of {}",
                width, height, TILE_DIM
            )));
        }
        let (width_stride, height_stride) = axes.strides(width, height);
        Ok(Self {
            rows: height_stride / TILE_DIM,
            cols: width_stride / TILE_DIM,
            width_stride,
            height_stride,
        })
    }

    pub fn tile_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Pixels covered by one row of tiles.
    pub fn row_pixels(&self) -> usize {
        TILE_DIM as usize * self.width_stride as usize
    }

    /// Pixel index of `(x, y)` of tile column `col`, relative to the start of its tile row.
    #[inline]
    pub fn row_offset(&self, col: u32, x: u32, y: u32) -> usize {
        y as usize * self.width_stride as usize + (col * TILE_DIM) as usize + x as usize
    }

    /// Pixel index in the final buffer.
    #[inline]
    pub fn destination(&self, row: u32, col: u32, x: u32, y: u32) -> usize {
        row as usize * self.row_pixels() + self.row_offset(col, x, y)
    }
}

/// A composed image. `width` and `height` are the effective dimensions after
/// any axis swap, and `data` holds `width * height * 4` bytes in `layout.channels` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EftImage {
    pub width: u32,
    pub height: u32,
    pub layout: Layout,
    pub data: Vec<u8>,
}

impl EftImage {
    /// Converts to an RGBA image in place, undoing BGRA placement if needed.
    pub fn into_rgba_image(self) -> Result<RgbaImage> {
        let Self {
            width,
            height,
            layout,
            mut data,
        } = self;
        if layout.channels == ChannelOrder::Bgra {
            data.par_chunks_exact_mut(4).for_each(|px| px.swap(0, 2));
        }
        ImageBuffer::from_raw(width, height, data).ok_or_else(|| {
            EftError::MalformedInput(format!("pixel buffer does not match {}x{}", width, height))
        })
    }

    /// Like [`EftImage::into_rgba_image`] but keeps `self`, at the cost of a copy.
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        self.clone().into_rgba_image()
    }
}

/// Places decoded tiles into a flat pixel buffer.
///
/// Tiles are consumed in order, row-major over the grid. The tile count must
/// match the grid exactly.
pub fn compose(
    tiles: &[DecodedTile],
    width: u32,
    height: u32,
    layout: Layout,
) -> Result<EftImage> {
    let grid = TileGrid::new(width, height, layout.axes)?;
    if tiles.len() != grid.tile_count() {
        return Err(EftError::MalformedInput(format!(
            "{}x{} needs {} tiles, got {}",
            width,
            height,
            grid.tile_count(),
            tiles.len()
        )));
    }

    let mut data = try_alloc(grid.row_pixels() * grid.rows as usize * 4)?;
    let channels = layout.channels;

    // Each tile row owns a disjoint band of the output.
    data.par_chunks_mut(grid.row_pixels() * 4)
        .zip(tiles.par_chunks(grid.cols as usize))
        .for_each(|(band, row_tiles)| {
            for (col, tile) in row_tiles.iter().enumerate() {
                for y in 0..TILE_DIM {
                    for x in 0..TILE_DIM {
                        let (sx, sy) = remap(x, y);
                        let dst = grid.row_offset(col as u32, x, y) * 4;
                        band[dst..dst + 4]
                            .copy_from_slice(&channels.place(tile.pixel(sx, sy)));
                    }
                }
            }
        });

    log::debug!(
        "composed {} tiles into {}x{} ({:?})",
        tiles.len(),
        grid.width_stride,
        grid.height_stride,
        layout
    );

    Ok(EftImage {
        width: grid.width_stride,
        height: grid.height_stride,
        layout,
        data,
    })
}
