use byteorder::{LE, WriteBytesExt};
use eft::process::{
    batch_output_path, eft_decode, eft_decode_batch, eft_decode_raw_pixels, eft_extract, eft_info,
};
use eft::{
    AxisOrder, COMPRESSED_TILE_SIZE, ChannelOrder, DecodeWarning, EFT_MAGIC, EftDecoder, EftError,
    HEADER_SIZE, Layout,
};
use image::{ImageReader, Rgba};
use std::fs;
use std::path::Path;

const RED_BLOCK: [u8; 8] = [0x00, 0xF8, 0x1F, 0x00, 0, 0, 0, 0];
const GREEN_BLOCK: [u8; 8] = [0xE0, 0x07, 0x00, 0x00, 0, 0, 0, 0];

fn tile_of(block: [u8; 8]) -> Vec<u8> {
    block.iter().copied().cycle().take(COMPRESSED_TILE_SIZE).collect()
}

fn write_eft(path: &Path, height_code: u32, width_code: u32, tiles: &[Vec<u8>]) -> std::io::Result<()> {
    let mut out = Vec::new();
    out.write_u64::<LE>(EFT_MAGIC)?;
    out.write_u32::<LE>(height_code)?;
    out.write_u32::<LE>(width_code)?;
    out.resize(HEADER_SIZE, 0);
    for tile in tiles {
        out.extend_from_slice(tile);
    }
    fs::write(path, out)
}

#[test]
fn test_decode_to_png() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let input = temp_dir.path().join("terrain.eft");
    // 1024 wide, 512 high: red tile on the left, green on the right.
    write_eft(&input, 0x1, 0x2, &[tile_of(RED_BLOCK), tile_of(GREEN_BLOCK)])?;

    let out_path = eft_decode(&input, &None, AxisOrder::Normal)?;
    assert_eq!(out_path, temp_dir.path().join("terrain.png"));

    let img = ImageReader::open(&out_path)?.decode()?.to_rgba8();
    assert_eq!(img.dimensions(), (1024, 512));
    assert_eq!(*img.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    assert_eq!(*img.get_pixel(511, 511), Rgba([255, 0, 0, 255]));
    assert_eq!(*img.get_pixel(512, 0), Rgba([0, 255, 0, 255]));
    assert_eq!(*img.get_pixel(1023, 300), Rgba([0, 255, 0, 255]));
    Ok(())
}

#[test]
fn test_swapped_decode_stacks_tiles() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let input = temp_dir.path().join("swapped.eft");
    write_eft(&input, 0x1, 0x2, &[tile_of(RED_BLOCK), tile_of(GREEN_BLOCK)])?;

    let out_path = temp_dir.path().join("out.png");
    eft_decode(&input, &Some(out_path.clone()), AxisOrder::Swapped)?;

    let img = ImageReader::open(&out_path)?.decode()?.to_rgba8();
    assert_eq!(img.dimensions(), (512, 1024));
    assert_eq!(*img.get_pixel(100, 0), Rgba([255, 0, 0, 255]));
    assert_eq!(*img.get_pixel(100, 600), Rgba([0, 255, 0, 255]));
    Ok(())
}

#[test]
fn test_raw_pixels_bgra() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let input = temp_dir.path().join("red.eft");
    write_eft(&input, 0x1, 0x1, &[tile_of(RED_BLOCK)])?;

    let layout = Layout::new(AxisOrder::Normal, ChannelOrder::Bgra);
    let out_path = eft_decode_raw_pixels(&input, &None, layout)?;
    assert_eq!(out_path.extension().unwrap(), "bgra");

    let data = fs::read(out_path)?;
    assert_eq!(data.len(), 512 * 512 * 4);
    assert!(data.chunks_exact(4).all(|p| p == [0, 0, 255, 255]));
    Ok(())
}

#[test]
fn test_extract_and_info() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let input = temp_dir.path().join("raw.eft");
    let tile = tile_of(GREEN_BLOCK);
    write_eft(&input, 0x1, 0x1, &[tile.clone()])?;

    let out_path = eft_extract(&input, &None)?;
    assert_eq!(fs::read(out_path)?, tile);

    let info = eft_info(&input)?;
    assert!(info.magic_ok);
    assert_eq!((info.width, info.height), (512, 512));
    assert_eq!((info.tile_count, info.expected_tiles), (1, 1));
    assert!(!info.has_ordering_hint);
    assert!(info.warnings.is_empty());

    // One stray byte past the last tile.
    let mut bytes = fs::read(&input)?;
    bytes.push(0);
    bytes[0] = 0;
    fs::write(&input, bytes)?;
    let info = eft_info(&input)?;
    assert!(!info.magic_ok);
    assert!(info.warnings.contains(&DecodeWarning::TrailingBytes(1)));
    let lines: Vec<String> = info.warnings.iter().map(ToString::to_string).collect();
    assert!(lines.iter().any(|l| l.starts_with("unrecognized magic")));
    Ok(())
}

#[test]
fn test_batch_skips_broken_files() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let good = temp_dir.path().join("good.eft");
    let broken = temp_dir.path().join("broken.eft");
    write_eft(&good, 0x1, 0x1, &[tile_of(RED_BLOCK)])?;
    // Declares 1024x1024 but carries a single tile.
    write_eft(&broken, 0x2, 0x2, &[tile_of(RED_BLOCK)])?;

    let out_dir = temp_dir.path().join("png");
    let report = eft_decode_batch(
        temp_dir.path(),
        &[good, broken],
        &Some(out_dir.clone()),
        AxisOrder::Normal,
    )?;
    assert_eq!((report.decoded, report.failed), (1, 1));
    assert!(out_dir.join("good.png").exists());
    assert!(!out_dir.join("broken.png").exists());
    Ok(())
}

#[test]
fn test_batch_keeps_subdirectories() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path().join("textures");
    fs::create_dir_all(root.join("a"))?;
    fs::create_dir_all(root.join("b"))?;
    let red = root.join("a").join("ground.eft");
    let green = root.join("b").join("ground.eft");
    write_eft(&red, 0x1, 0x1, &[tile_of(RED_BLOCK)])?;
    write_eft(&green, 0x1, 0x1, &[tile_of(GREEN_BLOCK)])?;

    let out_dir = temp_dir.path().join("png");
    let report = eft_decode_batch(&root, &[red, green], &Some(out_dir.clone()), AxisOrder::Normal)?;
    assert_eq!((report.decoded, report.failed), (2, 0));

    let pngs: Vec<_> = walk_pngs(&out_dir)?;
    assert_eq!(pngs.len(), 2, "{:?}", pngs);

    let a = ImageReader::open(out_dir.join("a").join("ground.png"))?.decode()?.to_rgba8();
    let b = ImageReader::open(out_dir.join("b").join("ground.png"))?.decode()?.to_rgba8();
    assert_eq!(*a.get_pixel(10, 10), Rgba([255, 0, 0, 255]));
    assert_eq!(*b.get_pixel(10, 10), Rgba([0, 255, 0, 255]));
    Ok(())
}

fn walk_pngs(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            found.extend(walk_pngs(&path)?);
        } else if path.extension().is_some_and(|e| e == "png") {
            found.push(path);
        }
    }
    Ok(found)
}

#[test]
fn test_batch_output_path() {
    let root = Path::new("/data/textures");
    let out = Path::new("/out");
    assert_eq!(
        batch_output_path(root, Path::new("/data/textures/a/ground.eft"), out),
        Path::new("/out/a/ground.png")
    );
    assert_eq!(
        batch_output_path(root, Path::new("/elsewhere/sky.eft"), out),
        Path::new("/out/sky.png")
    );
}

#[test]
fn test_geometry_mismatch_produces_no_image() {
    let mut bytes = Vec::new();
    bytes.write_u64::<LE>(EFT_MAGIC).unwrap();
    bytes.write_u32::<LE>(0x2).unwrap();
    bytes.write_u32::<LE>(0x2).unwrap();
    bytes.resize(HEADER_SIZE, 0);
    bytes.extend(tile_of(RED_BLOCK));

    let result = EftDecoder::load_rgba(&bytes, AxisOrder::Normal);
    assert!(matches!(result, Err(EftError::MalformedInput(_))));
}
