//! Rendering contact sheets into RGBA images.

use std::path::Path;

use hullsprite_spec::sheet_color;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use tracing::warn;

use super::font::draw_text;
use super::layout::{master_label, master_title, sprite_label, SheetStyle, PADDING};
use super::scan::SpriteInfo;
use super::SheetError;

const ERROR_RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Largest canvas a sheet may allocate (1 GiB of RGBA).
pub const MAX_SHEET_PIXELS: u64 = 1 << 28;

fn canvas(width: u32, height: u32, background: Rgba<u8>) -> Result<RgbaImage, SheetError> {
    if u64::from(width) * u64::from(height) > MAX_SHEET_PIXELS {
        return Err(SheetError::InvalidLayout(format!(
            "sheet of {}x{} pixels is too large; lower --size, --cols or set --max-rows",
            width, height
        )));
    }
    Ok(RgbaImage::from_pixel(width, height, background))
}

fn rgba(rgb: [u8; 3]) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}

fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    let x_end = x.saturating_add(w).min(img.width());
    let y_end = y.saturating_add(h).min(img.height());
    for py in y.min(y_end)..y_end {
        for px in x.min(x_end)..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

fn outline_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, stroke: u32, color: Rgba<u8>) {
    fill_rect(img, x, y, w, stroke, color);
    fill_rect(img, x, (y + h).saturating_sub(stroke), w, stroke, color);
    fill_rect(img, x, y, stroke, h, color);
    fill_rect(img, (x + w).saturating_sub(stroke), y, stroke, h, color);
}

/// Loads a sprite and shrinks it to fit a `size`-square box, keeping its
/// aspect ratio. Smaller sprites are not enlarged.
fn load_thumbnail(path: &Path, size: u32) -> Result<RgbaImage, image::ImageError> {
    let sprite = image::open(path)?.to_rgba8();
    let (w, h) = sprite.dimensions();
    if w <= size && h <= size {
        return Ok(sprite);
    }
    let ratio = (size as f64 / w as f64).min(size as f64 / h as f64);
    let tw = ((w as f64 * ratio).round() as u32).clamp(1, size);
    let th = ((h as f64 * ratio).round() as u32).clamp(1, size);
    Ok(imageops::resize(&sprite, tw, th, FilterType::Lanczos3))
}

/// Draws one sprite cell (thumbnail plus label) at (`x`, `y`).
fn draw_cell(img: &mut RgbaImage, style: &SheetStyle, x: u32, y: u32, sprite: &SpriteInfo, label: &str) {
    match load_thumbnail(&sprite.path, style.thumb_box()) {
        Ok(thumb) => {
            let tx = x + (style.cell_width() - thumb.width()) / 2;
            let ty = y + (style.thumb - thumb.height()) / 2;
            imageops::overlay(img, &thumb, i64::from(tx), i64::from(ty));
        }
        Err(e) => {
            warn!(path = %sprite.path.display(), error = %e, "unreadable sprite");
            let edge = style.thumb.saturating_sub(4);
            outline_rect(img, x + 2, y + 2, edge, edge, style.error_stroke, ERROR_RED);
            draw_text(img, x + 10, y + style.thumb / 2, "ERROR", ERROR_RED, 1);
        }
    }
    let label_y = y + style.thumb + style.label_gap;
    draw_text(img, x + style.label_inset, label_y, label, style.label_color, 1);
}

/// Composes one page of a faction sheet.
pub fn compose_faction_sheet(
    faction: &str,
    title: &str,
    sprites: &[SpriteInfo],
    style: &SheetStyle,
) -> Result<RgbaImage, SheetError> {
    style.validate()?;
    let width = style.sheet_width()?;
    let height = style.faction_sheet_height(sprites.len())?;
    let mut img = canvas(width, height, style.background)?;

    fill_rect(&mut img, 0, 0, width, style.header_height, style.header_fill);
    draw_text(
        &mut img,
        PADDING,
        style.title_offset,
        title,
        rgba(sheet_color(faction)),
        style.title_scale,
    );

    let grid_y = style.header_height + PADDING;
    for (index, sprite) in sprites.iter().enumerate() {
        let (dx, dy) = style.cell_offset(index);
        let label = sprite_label(&sprite.name, &sprite.subdir);
        draw_cell(&mut img, style, PADDING + dx, grid_y + dy, sprite, &label);
    }
    Ok(img)
}

/// Composes the master sheet from factions already in display order.
pub fn compose_master_sheet(groups: &[(&str, &[SpriteInfo])]) -> Result<RgbaImage, SheetError> {
    let style = SheetStyle::master();
    let width = style.sheet_width()?;
    let height = groups
        .iter()
        .filter(|(_, sprites)| !sprites.is_empty())
        .try_fold(2 * PADDING, |total, (_, sprites)| {
            total
                .checked_add(style.master_block_height(sprites.len())?)
                .ok_or_else(|| SheetError::InvalidLayout("master sheet is too tall".to_string()))
        })?;
    let mut img = canvas(width, height, style.background)?;

    let mut y = PADDING;
    for (faction, sprites) in groups {
        if sprites.is_empty() {
            continue;
        }
        let block_end = y + style.master_block_height(sprites.len())?;
        fill_rect(&mut img, 0, y, width, style.header_height, style.header_fill);
        draw_text(
            &mut img,
            PADDING,
            y + style.title_offset,
            &master_title(faction, sprites.len()),
            rgba(sheet_color(faction)),
            style.title_scale,
        );
        y += style.header_height;

        for (index, sprite) in sprites.iter().enumerate() {
            let (dx, dy) = style.cell_offset(index);
            let label = master_label(&sprite.name);
            draw_cell(&mut img, &style, PADDING + dx, y + dy, sprite, &label);
        }
        y = block_end;
    }
    Ok(img)
}

/// Writes a sheet as PNG, creating parent directories.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<(), SheetError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SheetError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|source| SheetError::Save {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_sprite(path: &Path, w: u32, h: u32) {
        let img = RgbaImage::from_pixel(w, h, Rgba([0, 200, 0, 255]));
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    fn info(path: PathBuf, name: &str, subdir: &str) -> SpriteInfo {
        SpriteInfo {
            path,
            name: name.to_string(),
            subdir: subdir.to_string(),
        }
    }

    #[test]
    fn test_thumbnail_preserves_aspect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        write_sprite(&path, 400, 200);
        let thumb = load_thumbnail(&path, 124).unwrap();
        assert_eq!(thumb.dimensions(), (124, 62));

        let small = dir.path().join("small.png");
        write_sprite(&small, 20, 10);
        assert_eq!(load_thumbnail(&small, 124).unwrap().dimensions(), (20, 10));
    }

    #[test]
    fn test_faction_sheet_dimensions_and_placement() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("punisher.png");
        write_sprite(&path, 64, 64);
        let sprites = vec![info(path, "punisher", "frigate")];

        let style = SheetStyle::faction(64, 2);
        let img = compose_faction_sheet("amarr", "AMARR (1 ships)", &sprites, &style).unwrap();
        assert_eq!(img.dimensions(), (2 * 64 + 20, 40 + 84 + 20));

        // Thumbnail is 60x60 centred in the first 64px cell at (10, 50).
        assert_eq!(img.get_pixel(10 + 32, 50 + 32), &Rgba([0, 200, 0, 255]));
        // Second cell is empty background.
        assert_eq!(img.get_pixel(10 + 64 + 32, 50 + 32), &style.background);
        // Header band.
        assert_eq!(img.get_pixel(300.min(img.width() - 1), 1), &style.header_fill);
    }

    #[test]
    fn test_unreadable_sprite_gets_error_outline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        let sprites = vec![info(path, "broken", "")];

        let style = SheetStyle::faction(64, 1);
        let img = compose_faction_sheet("misc", "MISC (1 ships)", &sprites, &style).unwrap();
        assert_eq!(img.get_pixel(12, 50 + 2), &ERROR_RED);
    }

    #[test]
    fn test_master_sheet_height() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        write_sprite(&path, 8, 8);
        let a = vec![info(path.clone(), "a", "")];
        let b: Vec<SpriteInfo> = (0..13).map(|i| info(path.clone(), &format!("s{}", i), "")).collect();

        let img = compose_master_sheet(&[("amarr", a.as_slice()), ("caldari", b.as_slice())]).unwrap();
        let style = SheetStyle::master();
        assert_eq!(img.width(), 12 * 96 + 20);
        assert_eq!(
            img.height(),
            20 + style.master_block_height(1).unwrap() + style.master_block_height(13).unwrap()
        );
    }

    #[test]
    fn test_invalid_layout() {
        let style = SheetStyle::faction(4, 8);
        assert!(matches!(
            compose_faction_sheet("amarr", "A", &[], &style),
            Err(SheetError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_oversized_sheet_is_an_error_not_a_panic() {
        let style = SheetStyle::faction(1 << 20, 8);
        let sprites = vec![info(PathBuf::from("a.png"), "a", "")];
        assert!(matches!(
            compose_faction_sheet("amarr", "A", &sprites, &style),
            Err(SheetError::InvalidLayout(_))
        ));

        let style = SheetStyle::faction(128, u32::MAX);
        assert!(matches!(
            compose_faction_sheet("amarr", "A", &sprites, &style),
            Err(SheetError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_save_png_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/sheet.png");
        save_png(&RgbaImage::new(4, 4), &out).unwrap();
        assert!(out.exists());
    }
}
