use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::core::{Orientation, TILE_SIZE, WorldPos};

/// Deterministic mapping from one axis' coordinate values to pixel
/// offsets, plus the canvas extent along that axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AxisMapping {
    offsets: BTreeMap<i32, u32>,
    /// Canvas extent along this axis in pixels.
    pub extent_px: u32,
}

impl AxisMapping {
    /// The trivial single-cell mapping used when a capture has no
    /// placement-sourced positions.
    pub fn single_cell() -> Self {
        Self {
            offsets: BTreeMap::from([(0, 0)]),
            extent_px: TILE_SIZE,
        }
    }

    /// Pixel offset assigned to a coordinate value. Values the capture
    /// never recorded place at offset 0.
    pub fn offset_of(&self, value: i32) -> u32 {
        self.offsets.get(&value).copied().unwrap_or(0)
    }

    /// Number of distinct coordinate values mapped.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the mapping holds no values.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Build the mapping for one axis.
///
/// Distinct values are assigned offsets of `index * 128` in sorted order.
/// The horizontal axis sorts ascending for orientations North and East
/// and descending otherwise; the vertical axis always sorts descending,
/// regardless of orientation. The extent is `(|max - min| + 1) * 128`.
pub fn build_axis_mapping(
    values: &[i32],
    vertical: bool,
    orientation: Option<Orientation>,
) -> AxisMapping {
    let distinct: BTreeSet<i32> = values.iter().copied().collect();
    let (Some(&min), Some(&max)) = (distinct.first(), distinct.last()) else {
        return AxisMapping::single_cell();
    };

    let ascending = !vertical && orientation.is_some_and(Orientation::ascending_horizontal);

    let ordered: Vec<i32> = if ascending {
        distinct.into_iter().collect()
    } else {
        distinct.into_iter().rev().collect()
    };

    let offsets = ordered
        .into_iter()
        .enumerate()
        .map(|(index, value)| (value, index as u32 * TILE_SIZE))
        .collect();

    AxisMapping {
        offsets,
        extent_px: (max.abs_diff(min) + 1) * TILE_SIZE,
    }
}

/// Which world axis feeds the horizontal mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalAxis {
    /// World x varies across the capture.
    X,
    /// All x values are identical; world z varies instead.
    Z,
}

/// Full 2-D layout for one capture: a horizontal and a vertical mapping
/// and the axis choice that produced the horizontal one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutPlan {
    /// World axis selected for the horizontal mapping.
    pub axis: HorizontalAxis,
    /// Horizontal mapping (x or z values to left offsets).
    pub horizontal: AxisMapping,
    /// Vertical mapping (y values to top offsets).
    pub vertical: AxisMapping,
}

impl LayoutPlan {
    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.horizontal.extent_px
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.vertical.extent_px
    }

    /// Pixel placement `(left, top)` for a fragment position.
    pub fn place(&self, pos: WorldPos) -> (u32, u32) {
        let horizontal_value = match self.axis {
            HorizontalAxis::X => pos.x,
            HorizontalAxis::Z => pos.z,
        };
        (
            self.horizontal.offset_of(horizontal_value),
            self.vertical.offset_of(pos.y),
        )
    }
}

/// Collapse recorded 3-D positions to a 2-D layout.
///
/// Captures are assumed planar: when every recorded x is identical the
/// horizontal axis falls back to z. A capture with no placement-sourced
/// positions (direct path only) gets the single-cell 128x128 plan.
pub fn plan_layout(
    xs: &[i32],
    ys: &[i32],
    zs: &[i32],
    orientation: Option<Orientation>,
) -> LayoutPlan {
    if xs.is_empty() || ys.is_empty() {
        return LayoutPlan {
            axis: HorizontalAxis::X,
            horizontal: AxisMapping::single_cell(),
            vertical: AxisMapping::single_cell(),
        };
    }

    let distinct_x: BTreeSet<i32> = xs.iter().copied().collect();
    let (axis, horizontal_values) = if distinct_x.len() == 1 {
        (HorizontalAxis::Z, zs)
    } else {
        (HorizontalAxis::X, xs)
    };

    LayoutPlan {
        axis,
        horizontal: build_axis_mapping(horizontal_values, false, orientation),
        vertical: build_axis_mapping(ys, true, orientation),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
