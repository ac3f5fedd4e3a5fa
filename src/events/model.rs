use crate::foundation::core::{Rotation, TileId, WorldPos};

/// Entity kinds allowed to hold a tile for the placement path.
const FRAME_KINDS: [&str; 3] = ["item_frame", "item_frames", "glow_item_frame"];

/// Item kind name identifying a tile-backed item.
const FILLED_MAP: &str = "filled_map";

/// A typed inbound notification, validated once at the event boundary.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Notification {
    /// Raw tile data arrived for an id.
    TileData(TileDataEvent),
    /// A qualifying holder was placed in the world with a tile attached.
    Placement(PlacementEvent),
    /// A tile reference was observed outside the placement path.
    DirectTile(DirectTileEvent),
}

/// Raw per-pixel color indices arriving for one tile id.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TileDataEvent {
    /// Correlation id for later fragment references.
    pub tile: TileId,
    /// Flat color-index bytes; one tile's worth.
    pub data: Vec<u8>,
}

/// An item attached to a holder or referenced directly.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ItemStack {
    /// Registry name of the item kind, resolved by the host.
    pub kind: String,
    /// Tile id carried in the item's auxiliary data, if any.
    pub map: Option<TileId>,
}

impl ItemStack {
    /// Whether this item is a tile-backed map item.
    pub fn is_filled_map(&self) -> bool {
        self.kind == FILLED_MAP
    }
}

/// The placed entity a placement notification refers to.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HolderContext {
    /// Registry name of the entity kind, resolved by the host.
    pub kind: String,
    /// World position of the holder.
    pub position: WorldPos,
    /// Raw yaw; rounded and mapped to an orientation downstream.
    pub yaw: f64,
}

impl HolderContext {
    /// Whether the holder's kind is on the frame-like allowlist.
    pub fn is_frame(&self) -> bool {
        FRAME_KINDS.contains(&self.kind.as_str())
    }
}

/// A qualifying holder placed in the world with an attached tile item.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacementEvent {
    /// The placed holder.
    pub holder: HolderContext,
    /// The attached item.
    pub item: ItemStack,
    /// Quarter-turn rotation from metadata; absent means zero.
    pub rotation: Option<Rotation>,
}

/// A filled-tile reference observed outside the placement path.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DirectTileEvent {
    /// The referenced item; a missing map id means the empty sentinel.
    pub item: ItemStack,
}
