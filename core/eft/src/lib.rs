//! Decoder for EFT tiled textures.
//!
//! An EFT file is a 1024-byte header followed by 512x512 tiles of DXT1 blocks.
//! Tiles are decoded independently and then composed into one image with the
//! engine's intra-tile remap applied.

pub mod buffer;
pub mod codec;
pub mod color;
pub mod compositor;
pub mod decoder;
pub mod error;
pub mod process;
pub mod reader;
pub mod types;

pub use buffer::PixelBuffer;
pub use compositor::{EftImage, compose};
pub use decoder::{DecodedEft, EftDecoder, RawTexture};
pub use error::{EftError, Result};
pub use reader::{EftFile, EftHeader};
pub use types::{AxisOrder, ChannelOrder, DecodeWarning, Layout};

/// Magic number in the first 8 bytes of every known EFT file.
pub const EFT_MAGIC: u64 = 1_103_806_595_072;

pub const HEADER_SIZE: usize = 0x400;
pub const METADATA_OFFSET: usize = 16;
pub const METADATA_SIZE: usize = 1012;

/// Tile edge length in pixels.
pub const TILE_DIM: u32 = 512;
pub const BLOCK_SIZE: usize = 8;
pub const BLOCKS_PER_TILE_ROW: usize = TILE_DIM as usize / 4;
pub const COMPRESSED_TILE_SIZE: usize = BLOCKS_PER_TILE_ROW * BLOCKS_PER_TILE_ROW * BLOCK_SIZE;
