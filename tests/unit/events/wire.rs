use serde_json::json;

use super::*;
use crate::foundation::core::WorldPos;

fn frame_holder() -> HolderContext {
    HolderContext {
        kind: "item_frame".to_owned(),
        position: WorldPos::new(1, 2, 3),
        yaw: 2.0,
    }
}

fn keys() -> MetadataKeys {
    MetadataKeys {
        item: 8,
        rotation: 9,
    }
}

#[test]
fn tile_data_packet_decodes() {
    let packet = json!({ "itemDamage": 5, "data": [0, 1, 254, 255] });
    let decoded = decode_packet(&packet).expect("tile data");
    assert_eq!(
        decoded,
        Notification::TileData(TileDataEvent {
            tile: TileId(5),
            data: vec![0, 1, 254, 255],
        })
    );
}

#[test]
fn out_of_range_bytes_drop_the_packet() {
    let packet = json!({ "itemDamage": 5, "data": [0, 256] });
    assert_eq!(decode_packet(&packet), None);
}

#[test]
fn direct_tile_packet_decodes() {
    let packet = json!({ "item": { "kind": "filled_map", "map": 12 } });
    let decoded = decode_packet(&packet).expect("direct tile");
    assert_eq!(
        decoded,
        Notification::DirectTile(DirectTileEvent {
            item: ItemStack {
                kind: "filled_map".to_owned(),
                map: Some(TileId(12)),
            },
        })
    );
}

#[test]
fn direct_tile_without_map_id_keeps_none() {
    let packet = json!({ "item": { "kind": "filled_map" } });
    let Some(Notification::DirectTile(event)) = decode_packet(&packet) else {
        panic!("expected a direct tile");
    };
    assert_eq!(event.item.map, None);
}

#[test]
fn non_map_items_are_ignored() {
    let packet = json!({ "item": { "kind": "compass", "map": 3 } });
    assert_eq!(decode_packet(&packet), None);
}

#[test]
fn unrelated_packets_are_ignored() {
    assert_eq!(decode_packet(&json!({ "health": 20 })), None);
    assert_eq!(decode_packet(&json!(null)), None);
    assert_eq!(decode_packet(&json!({ "itemDamage": 5 })), None);
}

#[test]
fn placement_metadata_decodes() {
    let metadata = json!([
        { "index": 8, "value": { "kind": "filled_map", "map": 7 } },
        { "index": 9, "value": 3 },
    ]);
    let decoded =
        decode_entity_metadata(Some(frame_holder()), &metadata, keys()).expect("placement");
    let Notification::Placement(event) = decoded else {
        panic!("expected a placement");
    };
    assert_eq!(event.holder.position, WorldPos::new(1, 2, 3));
    assert_eq!(event.item.map, Some(TileId(7)));
    assert_eq!(event.rotation, Some(Rotation::from_raw(3)));
}

#[test]
fn rotation_entry_is_optional() {
    let metadata = json!([
        { "index": 8, "value": { "kind": "filled_map", "map": 7 } },
    ]);
    let Some(Notification::Placement(event)) =
        decode_entity_metadata(Some(frame_holder()), &metadata, keys())
    else {
        panic!("expected a placement");
    };
    assert_eq!(event.rotation, None);
}

#[test]
fn missing_entity_drops_the_event() {
    let metadata = json!([
        { "index": 8, "value": { "kind": "filled_map", "map": 7 } },
    ]);
    assert_eq!(decode_entity_metadata(None, &metadata, keys()), None);
}

#[test]
fn non_frame_holders_are_ignored() {
    let mut holder = frame_holder();
    holder.kind = "armor_stand".to_owned();
    let metadata = json!([
        { "index": 8, "value": { "kind": "filled_map", "map": 7 } },
    ]);
    assert_eq!(decode_entity_metadata(Some(holder), &metadata, keys()), None);
}

#[test]
fn item_entry_must_sit_at_the_resolved_index() {
    // item present, but at the pre-1.17 index while keys expect 8
    let metadata = json!([
        { "index": 7, "value": { "kind": "filled_map", "map": 7 } },
    ]);
    assert_eq!(
        decode_entity_metadata(Some(frame_holder()), &metadata, keys()),
        None
    );
}

#[test]
fn frame_variants_pass_the_allowlist() {
    for kind in ["item_frame", "item_frames", "glow_item_frame"] {
        let mut holder = frame_holder();
        holder.kind = kind.to_owned();
        assert!(holder.is_frame(), "{kind} must qualify");
    }
}
