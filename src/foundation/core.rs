use std::sync::Arc;

/// Edge length of one tile in pixels.
pub const TILE_SIZE: u32 = 128;

/// Number of pixels (= color-index bytes) in one tile.
pub const TILE_PIXELS: usize = (TILE_SIZE * TILE_SIZE) as usize;

/// Opaque identifier correlating a fragment to its raw tile data.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TileId(
    /// Raw id value as carried by the protocol.
    pub u32,
);

impl TileId {
    /// Sentinel id meaning "no backing data"; resolves to a blank tile.
    pub const EMPTY: TileId = TileId(0);

    /// Whether this is the [`TileId::EMPTY`] sentinel.
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

/// Immutable raw color-index bytes for one tile, shared across waiters.
pub type TileData = Arc<[u8]>;

/// Integer world-space position of a placed fragment.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct WorldPos {
    /// World x coordinate.
    pub x: i32,
    /// World y coordinate.
    pub y: i32,
    /// World z coordinate.
    pub z: i32,
}

impl WorldPos {
    /// The fixed origin used for direct-path fragments.
    pub const ORIGIN: WorldPos = WorldPos { x: 0, y: 0, z: 0 };

    /// Build a position from its components.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Clockwise quarter-turn count in `[0, 3]` applied to a tile image.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rotation(u8);

impl Rotation {
    /// Reduce a raw metadata value to a quarter-turn count.
    pub fn from_raw(raw: u32) -> Self {
        Self((raw % 4) as u8)
    }

    /// Number of clockwise quarter turns, in `[0, 3]`.
    pub fn quarter_turns(self) -> u8 {
        self.0
    }
}

/// Cardinal orientation derived from a holder's rounded yaw.
///
/// Only four rounded yaw values are meaningful; anything else is a data
/// error and leaves the capture orientation unset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    /// Rounded yaw 2.
    North,
    /// Rounded yaw 3.
    East,
    /// Rounded yaw 5.
    South,
    /// Rounded yaw 0.
    West,
}

impl Orientation {
    /// Map a raw yaw through the fixed 4-entry table, rounding to the
    /// nearest integer first. Unknown values yield `None`.
    pub fn from_yaw(yaw: f64) -> Option<Self> {
        match yaw.round() as i64 {
            2 => Some(Self::North),
            3 => Some(Self::East),
            5 => Some(Self::South),
            0 => Some(Self::West),
            _ => None,
        }
    }

    /// Whether the horizontal layout axis sorts ascending for this
    /// orientation. The vertical axis never consults this.
    pub fn ascending_horizontal(self) -> bool {
        matches!(self, Self::North | Self::East)
    }
}

/// One placed or referenced tile occurrence contributing to a capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fragment {
    /// World position; `WorldPos::ORIGIN` for direct-path fragments.
    pub pos: WorldPos,
    /// Tile id resolved against the capture's tile map at assembly.
    pub tile: TileId,
    /// Clockwise quarter turns applied before placement.
    pub rotation: Rotation,
}
