use thiserror::Error;

#[derive(Error, Debug)]
pub enum EftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to allocate {bytes} bytes")]
    AllocationFailure { bytes: usize },
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Unrecognized header: expected magic {expected:#018x}, found {found:#018x}")]
    UnrecognizedHeader { expected: u64, found: u64 },
    #[error("Unknown dimension code: {0:#x}")]
    UnknownDimensionCode(u32),
}

pub type Result<T> = std::result::Result<T, EftError>;

/// Allocates a zeroed byte buffer, reporting failure instead of aborting.
pub(crate) fn try_alloc(bytes: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes)
        .map_err(|_| EftError::AllocationFailure { bytes })?;
    buf.resize(bytes, 0);
    Ok(buf)
}
