//! One-shot validation of dynamic upstream payloads.
//!
//! The upstream stream delivers loosely-shaped JSON values. Everything is
//! validated here, once, so the rest of the crate only ever sees the
//! typed [`Notification`] model. Irrelevant payloads decode to `None`
//! silently; relevant-but-malformed ones decode to `None` with a
//! diagnostic and no state mutation.

use serde_json::Value;

use crate::events::model::{
    DirectTileEvent, HolderContext, ItemStack, Notification, PlacementEvent, TileDataEvent,
};
use crate::events::protocol::MetadataKeys;
use crate::foundation::core::{Rotation, TileId};

/// Decode a generic inbound packet into a tile-data or direct-tile
/// notification.
///
/// A packet carrying both a numeric `itemDamage` and a `data` byte array
/// is raw tile data; a packet carrying a tile-backed `item` is a direct
/// tile reference; anything else is not for us.
pub fn decode_packet(packet: &Value) -> Option<Notification> {
    let obj = packet.as_object()?;

    if let (Some(id), Some(data)) = (obj.get("itemDamage"), obj.get("data"))
        && let Some(id) = id.as_u64()
        && data.is_array()
    {
        let Ok(tile) = u32::try_from(id) else {
            tracing::warn!(tile = id, "tile id out of range; dropped");
            return None;
        };
        let Some(bytes) = decode_byte_array(data) else {
            tracing::warn!(tile = id, "tile data payload is not a byte array; dropped");
            return None;
        };
        return Some(Notification::TileData(TileDataEvent {
            tile: TileId(tile),
            data: bytes,
        }));
    }

    let item = decode_item(obj.get("item")?)?;
    if !item.is_filled_map() {
        return None;
    }
    Some(Notification::DirectTile(DirectTileEvent { item }))
}

/// Decode an entity-metadata notification into a placement.
///
/// `holder` is the host's entity lookup for the notification's entity id;
/// a missing entity drops the event with a diagnostic. Holders outside
/// the frame allowlist and items other than filled maps are ignored.
pub fn decode_entity_metadata(
    holder: Option<HolderContext>,
    metadata: &Value,
    keys: MetadataKeys,
) -> Option<Notification> {
    let Some(holder) = holder else {
        tracing::warn!("entity for metadata notification not found; dropped");
        return None;
    };
    if !holder.is_frame() {
        return None;
    }

    let entries = metadata.as_array()?;
    let item = decode_item(metadata_value(entries, keys.item)?)?;
    if !item.is_filled_map() {
        return None;
    }

    let rotation = metadata_value(entries, keys.rotation)
        .and_then(Value::as_u64)
        .map(|raw| Rotation::from_raw(raw as u32));

    Some(Notification::Placement(PlacementEvent {
        holder,
        item,
        rotation,
    }))
}

fn metadata_value(entries: &[Value], index: u32) -> Option<&Value> {
    entries
        .iter()
        .find(|entry| entry.get("index").and_then(Value::as_u64) == Some(u64::from(index)))
        .and_then(|entry| entry.get("value"))
}

fn decode_item(value: &Value) -> Option<ItemStack> {
    let kind = value.get("kind")?.as_str()?.to_owned();
    let map = match value.get("map") {
        None | Some(Value::Null) => None,
        Some(raw) => match raw.as_u64().and_then(|id| u32::try_from(id).ok()) {
            Some(id) => Some(TileId(id)),
            None => {
                tracing::warn!(%kind, "item map id is not a valid integer; dropped");
                return None;
            }
        },
    };
    Some(ItemStack { kind, map })
}

fn decode_byte_array(value: &Value) -> Option<Vec<u8>> {
    value
        .as_array()?
        .iter()
        .map(|v| u8::try_from(v.as_u64()?).ok())
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/events/wire.rs"]
mod tests;
