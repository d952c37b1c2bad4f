//! Grid geometry, pagination and label rules for contact sheets.

use image::Rgba;

use super::SheetError;

/// Outer padding around the grid.
pub const PADDING: u32 = 10;
/// Default thumbnail edge for per-faction sheets.
pub const DEFAULT_THUMB: u32 = 128;
/// Default column count for per-faction sheets.
pub const DEFAULT_COLS: u32 = 8;
/// Thumbnail edge on the master sheet.
pub const MASTER_THUMB: u32 = 96;
/// Column count on the master sheet.
pub const MASTER_COLS: u32 = 12;
/// File name of the master sheet.
pub const MASTER_FILE: &str = "ALL_SPRITES_audit.png";

/// Visual parameters of one sheet kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetStyle {
    pub thumb: u32,
    pub cols: u32,
    pub label_height: u32,
    pub header_height: u32,
    pub background: Rgba<u8>,
    pub header_fill: Rgba<u8>,
    pub label_color: Rgba<u8>,
    pub title_scale: u32,
    /// Offset of the title from the top of its header band.
    pub title_offset: u32,
    /// Offset of the label from the left edge of its cell.
    pub label_inset: u32,
    /// Gap between the thumbnail box and its label.
    pub label_gap: u32,
    /// Stroke width of the error placeholder outline.
    pub error_stroke: u32,
}

impl SheetStyle {
    /// Style of a per-faction sheet.
    pub fn faction(thumb: u32, cols: u32) -> Self {
        Self {
            thumb,
            cols,
            label_height: 20,
            header_height: 40,
            background: Rgba([30, 30, 35, 255]),
            header_fill: Rgba([40, 40, 45, 255]),
            label_color: Rgba([180, 180, 180, 255]),
            title_scale: 2,
            title_offset: 10,
            label_inset: 4,
            label_gap: 2,
            error_stroke: 2,
        }
    }

    /// Style of the all-factions master sheet.
    pub fn master() -> Self {
        Self {
            thumb: MASTER_THUMB,
            cols: MASTER_COLS,
            label_height: 16,
            header_height: 30,
            background: Rgba([25, 25, 30, 255]),
            header_fill: Rgba([35, 35, 40, 255]),
            label_color: Rgba([150, 150, 150, 255]),
            title_scale: 2,
            title_offset: 6,
            label_inset: 2,
            label_gap: 0,
            error_stroke: 1,
        }
    }

    pub fn cell_width(&self) -> u32 {
        self.thumb
    }

    pub fn cell_height(&self) -> u32 {
        self.thumb.saturating_add(self.label_height)
    }

    /// Rejects styles whose grid cannot be drawn.
    pub fn validate(&self) -> Result<(), SheetError> {
        if self.cols == 0 || self.thumb <= 4 {
            return Err(SheetError::InvalidLayout(format!(
                "need at least one column and a thumbnail larger than 4px (cols={}, thumb={})",
                self.cols, self.thumb
            )));
        }
        self.thumb
            .checked_add(self.label_height)
            .ok_or_else(|| too_large("cell height"))?;
        self.sheet_width().map(|_| ())
    }

    /// Rows needed for `count` sprites.
    pub fn rows(&self, count: usize) -> Result<u32, SheetError> {
        if self.cols == 0 {
            return Err(SheetError::InvalidLayout("need at least one column".to_string()));
        }
        let count = u32::try_from(count).map_err(|_| too_large("sprite count"))?;
        Ok(count.div_ceil(self.cols))
    }

    /// Sheet width: the grid plus padding on both sides.
    pub fn sheet_width(&self) -> Result<u32, SheetError> {
        self.cols
            .checked_mul(self.cell_width())
            .and_then(|w| w.checked_add(2 * PADDING))
            .ok_or_else(|| too_large("sheet width"))
    }

    fn grid_height(&self, count: usize) -> Result<u32, SheetError> {
        self.rows(count)?
            .checked_mul(self.cell_height())
            .ok_or_else(|| too_large("sheet height"))
    }

    /// Height of a per-faction sheet holding `count` sprites.
    pub fn faction_sheet_height(&self, count: usize) -> Result<u32, SheetError> {
        self.grid_height(count)?
            .checked_add(self.header_height + 2 * PADDING)
            .ok_or_else(|| too_large("sheet height"))
    }

    /// Height of one faction block on the master sheet.
    pub fn master_block_height(&self, count: usize) -> Result<u32, SheetError> {
        self.grid_height(count)?
            .checked_add(self.header_height + PADDING)
            .ok_or_else(|| too_large("sheet height"))
    }

    /// Top-left of cell `index` relative to the grid origin.
    ///
    /// Only meaningful for indices whose sheet height was computed successfully.
    pub fn cell_offset(&self, index: usize) -> (u32, u32) {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        let cols = self.cols.max(1);
        let col = index % cols;
        let row = index / cols;
        (
            col.saturating_mul(self.cell_width()),
            row.saturating_mul(self.cell_height()),
        )
    }

    /// Edge of the box a thumbnail is shrunk into.
    pub fn thumb_box(&self) -> u32 {
        self.thumb.saturating_sub(4).max(1)
    }
}

fn too_large(what: &str) -> SheetError {
    SheetError::InvalidLayout(format!("{} does not fit in 32 bits", what))
}

/// Splits sprites into pages of at most `cols * max_rows`.
pub fn paginate<T>(items: &[T], cols: u32, max_rows: Option<u32>) -> Vec<&[T]> {
    match max_rows {
        Some(rows) if rows > 0 && !items.is_empty() => {
            items
            .chunks((cols.max(1) as usize).saturating_mul(rows as usize))
            .collect()
        }
        _ => vec![items],
    }
}

/// File name of page `page` (zero-based) of a faction's sheet.
pub fn page_file_name(faction: &str, page: usize) -> String {
    if page == 0 {
        format!("{}_audit.png", faction)
    } else {
        format!("{}_audit_p{}.png", faction, page + 1)
    }
}

/// Header title of a faction sheet page.
pub fn faction_title(faction: &str, total: usize, page: usize, pages: usize) -> String {
    let mut title = format!("{} ({} ships)", faction.to_uppercase(), total);
    if pages > 1 {
        title.push_str(&format!(" {}/{}", page + 1, pages));
    }
    title
}

/// Header title of a faction block on the master sheet.
pub fn master_title(faction: &str, total: usize) -> String {
    format!("{} ({})", faction.to_uppercase(), total)
}

fn truncate(text: &str, limit: usize, keep: usize) -> String {
    if text.chars().count() > limit {
        let mut short: String = text.chars().take(keep).collect();
        short.push_str("..");
        short
    } else {
        text.to_string()
    }
}

/// Label under a sprite on a faction sheet.
///
/// Names longer than 14 characters keep 12 plus `..`; a subdirectory adds a
/// three-character prefix, and the result is cut to 14 plus `..` when it
/// exceeds 16.
pub fn sprite_label(name: &str, subdir: &str) -> String {
    let label = truncate(name, 14, 12);
    if subdir.is_empty() {
        return label;
    }
    let prefix: String = subdir.chars().take(3).collect();
    truncate(&format!("{}/{}", prefix, label), 16, 14)
}

/// Label under a sprite on the master sheet.
pub fn master_label(name: &str) -> String {
    truncate(name, 12, 10)
}
