use anyhow::{Context, Result, bail};
use clap::Subcommand;
use eft::process::{eft_decode, eft_decode_batch, eft_decode_raw_pixels, eft_extract, eft_info};
use eft::{AxisOrder, ChannelOrder, Layout};
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Subcommand)]
pub enum EftCommands {
    /// Decode an EFT file into a PNG
    Decode {
        /// Input EFT file path
        input: PathBuf,
        /// Output file path (optional, defaults to input with .png, .rgba or .bgra)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Walk the tile grid with width and height exchanged
        #[arg(long, default_value_t = false)]
        swap_axes: bool,
        /// Write the flat pixel buffer instead of a PNG
        #[arg(long, default_value_t = false)]
        raw_pixels: bool,
        /// Use BGRA byte order for --raw-pixels output
        #[arg(long, default_value_t = false, requires = "raw_pixels")]
        bgra: bool,
    },
    /// Extract the compressed DXT1 tile data without decoding
    Raw {
        /// Input EFT file path
        input: PathBuf,
        /// Output file path (optional, defaults to input with .dxt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print header information
    Info {
        /// Input EFT file path
        input: PathBuf,
        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Decode every .eft file under a directory
    Batch {
        /// Input directory
        input: PathBuf,
        /// Output directory (optional, defaults to next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Walk the tile grid with width and height exchanged
        #[arg(long, default_value_t = false)]
        swap_axes: bool,
    },
}

pub fn handle(cmd: EftCommands) -> Result<()> {
    match cmd {
        EftCommands::Decode {
            input,
            output,
            swap_axes,
            raw_pixels,
            bgra,
        } => {
            let axes = AxisOrder::from_swap(swap_axes);
            if raw_pixels {
                let channels = if bgra {
                    ChannelOrder::Bgra
                } else {
                    ChannelOrder::Rgba
                };
                eft_decode_raw_pixels(&input, &output, Layout::new(axes, channels))
                    .with_context(|| format!("Failed to decode {:?}", input))?;
            } else {
                eft_decode(&input, &output, axes)
                    .with_context(|| format!("Failed to decode {:?}", input))?;
            }
            Ok(())
        }
        EftCommands::Raw { input, output } => {
            eft_extract(&input, &output)
                .with_context(|| format!("Failed to extract {:?}", input))?;
            Ok(())
        }
        EftCommands::Info { input, json } => {
            let info = eft_info(&input).with_context(|| format!("Failed to read {:?}", input))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("File:        {:?}", input);
                println!(
                    "Magic:       {:#018x} ({})",
                    info.magic,
                    if info.magic_ok { "ok" } else { "unrecognized" }
                );
                println!(
                    "Dimensions:  {}x{} (codes {:#x}/{:#x})",
                    info.width, info.height, info.width_code, info.height_code
                );
                println!("Tiles:       {} of {} expected", info.tile_count, info.expected_tiles);
                let order = if info.has_ordering_hint {
                    "hinted, not applied"
                } else {
                    "sequential"
                };
                println!("Tile order:  {}", order);
                for warning in &info.warnings {
                    println!("Warning:     {}", warning);
                }
            }
            Ok(())
        }
        EftCommands::Batch {
            input,
            output,
            swap_axes,
        } => {
            if !input.is_dir() {
                bail!("{:?} is not a directory", input);
            }
            let files: Vec<PathBuf> = WalkDir::new(&input)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| {
                    p.extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("eft"))
                })
                .collect();

            let report = eft_decode_batch(
                &input,
                &files,
                &output,
                AxisOrder::from_swap(swap_axes),
            )?;
            if report.failed > 0 {
                log::warn!("{} of {} files failed to decode", report.failed, files.len());
            }
            Ok(())
        }
    }
}
