use crate::compositor::EftImage;
use crate::decoder::DecodedEft;
use crate::types::{ChannelOrder, DecodeWarning};

/// Caller-owned pixel buffer returned at the host boundary.
///
/// The buffer can be released early with [`PixelBuffer::release`]; releasing
/// twice is harmless and only logs a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub channels: ChannelOrder,
    /// Conditions noticed while decoding the source file.
    pub warnings: Vec<DecodeWarning>,
    data: Option<Vec<u8>>,
}

impl PixelBuffer {
    pub fn pixels(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// True if the source carried tile ordering data that was not applied.
    pub fn may_be_scrambled(&self) -> bool {
        self.warnings.contains(&DecodeWarning::UnresolvedTileOrder)
    }

    pub fn is_released(&self) -> bool {
        self.data.is_none()
    }

    /// Takes ownership of the bytes, leaving the handle released.
    pub fn take(&mut self) -> Option<Vec<u8>> {
        self.data.take()
    }

    /// Frees the pixel data. Returns `false` if there was nothing to free.
    pub fn release(&mut self) -> bool {
        match self.data.take() {
            Some(_) => true,
            None => {
                log::warn!("attempted to release an empty pixel buffer");
                false
            }
        }
    }
}

impl From<EftImage> for PixelBuffer {
    fn from(image: EftImage) -> Self {
        Self {
            width: image.width,
            height: image.height,
            channels: image.layout.channels,
            warnings: Vec::new(),
            data: Some(image.data),
        }
    }
}

impl From<DecodedEft> for PixelBuffer {
    fn from(decoded: DecodedEft) -> Self {
        Self {
            warnings: decoded.warnings,
            ..Self::from(decoded.image)
        }
    }
}
