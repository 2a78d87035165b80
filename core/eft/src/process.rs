use crate::decoder::EftDecoder;
use crate::error::Result;
use crate::reader::EftFile;
use crate::types::{AxisOrder, ChannelOrder, DecodeWarning, Layout};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Header summary printed by `info`.
#[derive(Debug, Clone, Serialize)]
pub struct EftInfo {
    pub magic: u64,
    pub magic_ok: bool,
    pub height_code: u32,
    pub width_code: u32,
    pub width: u32,
    pub height: u32,
    pub tile_count: usize,
    pub expected_tiles: usize,
    pub has_ordering_hint: bool,
    pub warnings: Vec<DecodeWarning>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub decoded: usize,
    pub failed: usize,
}

fn default_output(input: &Path, output: &Option<PathBuf>, extension: &str) -> PathBuf {
    match output {
        Some(p) => p.clone(),
        None => input.with_extension(extension),
    }
}

fn report_warnings(input: &Path, warnings: &[DecodeWarning]) {
    for warning in warnings {
        if *warning == DecodeWarning::UnresolvedTileOrder {
            println!(
                "{:?}: tile ordering data is not applied, the image may look scrambled",
                input
            );
        }
    }
}

/// Decodes an EFT file and saves it as PNG.
pub fn eft_decode(input: &Path, output: &Option<PathBuf>, axes: AxisOrder) -> Result<PathBuf> {
    let bytes = fs::read(input)?;
    let decoded = EftDecoder::decode_file(&bytes, Layout::new(axes, ChannelOrder::Rgba))?;
    report_warnings(input, &decoded.warnings);

    let out_path = default_output(input, output, "png");
    let (width, height) = (decoded.image.width, decoded.image.height);
    decoded.image.into_rgba_image()?.save(&out_path)?;
    println!("Decoded {}x{} EFT to {:?}", width, height, out_path);
    Ok(out_path)
}

/// Decodes an EFT file and writes the flat pixel buffer as-is.
pub fn eft_decode_raw_pixels(
    input: &Path,
    output: &Option<PathBuf>,
    layout: Layout,
) -> Result<PathBuf> {
    let bytes = fs::read(input)?;
    let decoded = EftDecoder::decode_file(&bytes, layout)?;
    report_warnings(input, &decoded.warnings);

    let extension = match layout.channels {
        ChannelOrder::Rgba => "rgba",
        ChannelOrder::Bgra => "bgra",
    };
    let out_path = default_output(input, output, extension);
    fs::write(&out_path, &decoded.image.data)?;
    println!(
        "Wrote {}x{} {} pixels to {:?}",
        decoded.image.width, decoded.image.height, extension, out_path
    );
    Ok(out_path)
}

/// Writes the compressed DXT1 tile data of an EFT file without decoding it.
pub fn eft_extract(input: &Path, output: &Option<PathBuf>) -> Result<PathBuf> {
    let bytes = fs::read(input)?;
    let raw = EftDecoder::load_s3tc(&bytes)?;

    let out_path = default_output(input, output, "dxt");
    fs::write(&out_path, &raw.data)?;
    println!(
        "Extracted {} tiles ({}x{}) to {:?}",
        raw.tile_count, raw.width, raw.height, out_path
    );
    Ok(out_path)
}

pub fn eft_info(input: &Path) -> Result<EftInfo> {
    let bytes = fs::read(input)?;
    let file = EftFile::parse(&bytes)?;
    let header = &file.header;
    Ok(EftInfo {
        magic: header.magic,
        magic_ok: header.check_magic().is_ok(),
        height_code: header.height_code,
        width_code: header.width_code,
        width: header.width,
        height: header.height,
        tile_count: file.tile_count,
        expected_tiles: header.expected_tiles(),
        has_ordering_hint: header.has_ordering_hint(),
        warnings: file.warnings.clone(),
    })
}

/// Output PNG path for `input`, keeping its position below `root`.
///
/// Inputs outside `root` fall back to their file name.
pub fn batch_output_path(root: &Path, input: &Path, out_dir: &Path) -> PathBuf {
    let relative = match input.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel,
        _ => input.file_name().map(Path::new).unwrap_or(input),
    };
    out_dir.join(relative).with_extension("png")
}

fn decode_into(input: &Path, out_path: &Option<PathBuf>, axes: AxisOrder) -> Result<PathBuf> {
    if let Some(parent) = out_path.as_deref().and_then(Path::parent) {
        fs::create_dir_all(parent)?;
    }
    eft_decode(input, out_path, axes)
}

/// Decodes many files found under `root` in parallel. A failing file is
/// reported and skipped.
///
/// With an output directory, each PNG keeps the input's path relative to
/// `root`, so same-named files in different subdirectories stay apart.
pub fn eft_decode_batch(
    root: &Path,
    inputs: &[PathBuf],
    output_dir: &Option<PathBuf>,
    axes: AxisOrder,
) -> Result<BatchReport> {
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)?;
    }

    println!("Found {} EFT textures to decode.", inputs.len());

    let results: Vec<bool> = inputs
        .par_iter()
        .map(|input| {
            let out_path = output_dir
                .as_ref()
                .map(|dir| batch_output_path(root, input, dir));
            match decode_into(input, &out_path, axes) {
                Ok(_) => true,
                Err(e) => {
                    log::error!("failed to decode {:?}: {}", input, e);
                    false
                }
            }
        })
        .collect();

    let decoded = results.iter().filter(|ok| **ok).count();
    let report = BatchReport {
        decoded,
        failed: results.len() - decoded,
    };
    println!(
        "EFT decoding complete: {} decoded, {} failed.",
        report.decoded, report.failed
    );
    Ok(report)
}
