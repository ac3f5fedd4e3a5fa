use std::collections::HashMap;

use image::{Rgba, RgbaImage, imageops};
use rayon::prelude::*;

use crate::foundation::core::{Fragment, Rotation, TILE_SIZE, TileData, TileId};
use crate::foundation::error::{StitchError, StitchResult};
use crate::layout::grid::LayoutPlan;
use crate::palette::table::Palette;

/// Assemble a completed capture into one composite image.
///
/// Each fragment's tile data is decoded, rotated by its quarter-turn
/// count and placed at the plan's offsets onto an opaque white canvas.
/// Fragments without backing data (the empty sentinel, or a wait that
/// never resolved) are skipped and show through as canvas. Fragments are
/// composited in recording order with source-over blending, so later
/// entries win where they overlap.
pub fn assemble(
    fragments: &[Fragment],
    tiles: &HashMap<TileId, TileData>,
    plan: &LayoutPlan,
    palette: &Palette,
) -> StitchResult<RgbaImage> {
    let decoded = fragments
        .par_iter()
        .map(|fragment| decode_fragment(fragment, tiles, palette))
        .collect::<StitchResult<Vec<_>>>()?;

    let mut canvas = RgbaImage::from_pixel(plan.width(), plan.height(), Rgba([255, 255, 255, 255]));

    for (fragment, tile_image) in fragments.iter().zip(&decoded) {
        let Some(tile_image) = tile_image else {
            continue;
        };
        let (left, top) = plan.place(fragment.pos);
        imageops::overlay(&mut canvas, tile_image, i64::from(left), i64::from(top));
    }

    Ok(canvas)
}

fn decode_fragment(
    fragment: &Fragment,
    tiles: &HashMap<TileId, TileData>,
    palette: &Palette,
) -> StitchResult<Option<RgbaImage>> {
    let Some(data) = tiles.get(&fragment.tile) else {
        return Ok(None);
    };
    let rgba = palette.decode(data)?;
    let tile = RgbaImage::from_raw(TILE_SIZE, TILE_SIZE, rgba).ok_or_else(|| {
        StitchError::capture(format!(
            "tile {} decoded to a buffer that is not {TILE_SIZE}x{TILE_SIZE}",
            fragment.tile.0
        ))
    })?;
    Ok(Some(rotate_quarter(tile, fragment.rotation)))
}

fn rotate_quarter(tile: RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation.quarter_turns() {
        0 => tile,
        1 => imageops::rotate90(&tile),
        2 => imageops::rotate180(&tile),
        _ => imageops::rotate270(&tile),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
