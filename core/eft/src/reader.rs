use crate::error::{EftError, Result};
use crate::types::DecodeWarning;
use crate::{COMPRESSED_TILE_SIZE, EFT_MAGIC, HEADER_SIZE, METADATA_OFFSET, METADATA_SIZE, TILE_DIM};
use byteorder::{LE, ReadBytesExt};
use serde::Serialize;
use std::io::{Cursor, Read};

/// Largest dimension code in the engine's size table.
pub const MAX_DIMENSION_CODE: u32 = 0x10;

/// Resolves a header dimension code (`0x1..=0x10`) to pixels.
pub fn dimension_from_code(code: u32) -> Result<u32> {
    match code {
        1..=MAX_DIMENSION_CODE => Ok(code * TILE_DIM),
        _ => Err(EftError::UnknownDimensionCode(code)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EftHeader {
    pub magic: u64,
    pub height_code: u32,
    pub width_code: u32,
    pub width: u32,
    pub height: u32,
    /// Opaque tile-ordering data. Starts at offset 16 and runs 4 bytes past the
    /// header, into the first tile.
    #[serde(skip)]
    pub metadata: Vec<u8>,
}

impl EftHeader {
    pub fn read<R: Read>(mut reader: R) -> Result<Self> {
        let magic = reader.read_u64::<LE>()?;
        let height_code = reader.read_u32::<LE>()?;
        let width_code = reader.read_u32::<LE>()?;

        let mut metadata = vec![0u8; METADATA_SIZE];
        reader.read_exact(&mut metadata)?;

        Ok(Self {
            magic,
            height_code,
            width_code,
            width: dimension_from_code(width_code)?,
            height: dimension_from_code(height_code)?,
            metadata,
        })
    }

    pub fn check_magic(&self) -> Result<()> {
        if self.magic != EFT_MAGIC {
            return Err(EftError::UnrecognizedHeader {
                expected: EFT_MAGIC,
                found: self.magic,
            });
        }
        Ok(())
    }

    /// The part of the metadata that lies inside the header region.
    pub fn ordering_hint(&self) -> &[u8] {
        let len = (HEADER_SIZE - METADATA_OFFSET).min(self.metadata.len());
        &self.metadata[..len]
    }

    pub fn has_ordering_hint(&self) -> bool {
        self.ordering_hint().iter().any(|&b| b != 0)
    }

    pub fn expected_tiles(&self) -> usize {
        (self.width / TILE_DIM) as usize * (self.height / TILE_DIM) as usize
    }
}

/// A parsed EFT container borrowing its tile data from the input.
#[derive(Debug, Clone)]
pub struct EftFile<'a> {
    pub header: EftHeader,
    /// Concatenated compressed tiles, starting right after the header.
    pub data: &'a [u8],
    pub tile_count: usize,
    pub warnings: Vec<DecodeWarning>,
}

impl<'a> EftFile<'a> {
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let min_len = METADATA_OFFSET + METADATA_SIZE;
        if bytes.len() < min_len {
            return Err(EftError::MalformedInput(format!(
                "file is {} bytes, header needs at least {}",
                bytes.len(),
                min_len
            )));
        }

        let header = EftHeader::read(Cursor::new(bytes))?;
        let mut warnings = Vec::new();

        if let Err(e) = header.check_magic() {
            log::warn!("{}; this file may not be an EFT", e);
            warnings.push(DecodeWarning::MissingMagic(header.magic));
        }
        if header.has_ordering_hint() {
            log::debug!("header carries tile ordering data, tiles are placed sequentially");
            warnings.push(DecodeWarning::UnresolvedTileOrder);
        }

        let data = &bytes[HEADER_SIZE..];
        let tile_count = data.len() / COMPRESSED_TILE_SIZE;
        let trailing = data.len() % COMPRESSED_TILE_SIZE;
        if trailing != 0 {
            log::warn!("ignoring {} trailing bytes after tile {}", trailing, tile_count);
            warnings.push(DecodeWarning::TrailingBytes(trailing));
        }

        Ok(Self {
            header,
            data: &data[..tile_count * COMPRESSED_TILE_SIZE],
            tile_count,
            warnings,
        })
    }
}
