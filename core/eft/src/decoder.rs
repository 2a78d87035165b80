use crate::buffer::PixelBuffer;
use crate::codec::decode_tile;
use crate::compositor::{EftImage, TileGrid, compose};
use crate::error::{EftError, Result};
use crate::reader::{EftFile, EftHeader};
use crate::types::{AxisOrder, ChannelOrder, CompressedTile, DecodeWarning, DecodedTile, Layout};
use crate::{COMPRESSED_TILE_SIZE, HEADER_SIZE};
use rayon::prelude::*;
use std::time::Instant;

/// Result of decoding a whole EFT file.
#[derive(Debug, Clone)]
pub struct DecodedEft {
    pub header: EftHeader,
    pub image: EftImage,
    pub warnings: Vec<DecodeWarning>,
}

impl DecodedEft {
    /// True if the header carried tile ordering data that was not applied.
    pub fn may_be_scrambled(&self) -> bool {
        self.warnings.contains(&DecodeWarning::UnresolvedTileOrder)
    }
}

/// The compressed tile region of a file, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTexture {
    pub width: u32,
    pub height: u32,
    pub tile_count: usize,
    pub data: Vec<u8>,
}

pub struct EftDecoder;

impl EftDecoder {
    /// Decodes the first `tile_count` tiles of `data` in parallel, in order.
    pub fn decode_tiles(data: &[u8], tile_count: usize) -> Result<Vec<DecodedTile>> {
        let needed = tile_count * COMPRESSED_TILE_SIZE;
        if data.len() < needed {
            return Err(EftError::MalformedInput(format!(
                "{} tiles need {} bytes, got {}",
                tile_count,
                needed,
                data.len()
            )));
        }

        (0..tile_count)
            .into_par_iter()
            .map(|i| decode_tile(CompressedTile::nth(data, i)?))
            .collect()
    }

    /// Decodes concatenated tiles and composes them into a `width` x `height` image.
    pub fn decode(data: &[u8], width: u32, height: u32, layout: Layout) -> Result<EftImage> {
        let grid = TileGrid::new(width, height, layout.axes)?;
        let expected = grid.tile_count();
        if data.len() != expected * COMPRESSED_TILE_SIZE {
            return Err(EftError::MalformedInput(format!(
                "{}x{} needs {} tiles ({} bytes), got {} bytes",
                width,
                height,
                expected,
                expected * COMPRESSED_TILE_SIZE,
                data.len()
            )));
        }

        let started = Instant::now();
        let tiles = Self::decode_tiles(data, expected)?;
        log::debug!("decoded {} tiles in {:?}", tiles.len(), started.elapsed());

        compose(&tiles, width, height, layout)
    }

    /// Parses an EFT file and decodes it.
    pub fn decode_file(bytes: &[u8], layout: Layout) -> Result<DecodedEft> {
        let file = EftFile::parse(bytes)?;
        let image = Self::decode(file.data, file.header.width, file.header.height, layout)?;
        Ok(DecodedEft {
            header: file.header,
            image,
            warnings: file.warnings,
        })
    }

    /// Decodes an EFT file into an RGBA buffer.
    pub fn load_rgba(bytes: &[u8], axes: AxisOrder) -> Result<PixelBuffer> {
        let decoded = Self::decode_file(bytes, Layout::new(axes, ChannelOrder::Rgba))?;
        Ok(decoded.into())
    }

    /// Decodes an EFT file into a BGRA buffer.
    pub fn load_bgra(bytes: &[u8], axes: AxisOrder) -> Result<PixelBuffer> {
        let decoded = Self::decode_file(bytes, Layout::new(axes, ChannelOrder::Bgra))?;
        Ok(decoded.into())
    }

    /// Returns the compressed data after the header without decoding it.
    pub fn load_s3tc(bytes: &[u8]) -> Result<RawTexture> {
        let file = EftFile::parse(bytes)?;
        Ok(RawTexture {
            width: file.header.width,
            height: file.header.height,
            tile_count: file.tile_count,
            data: bytes[HEADER_SIZE..].to_vec(),
        })
    }
}
