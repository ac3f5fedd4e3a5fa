use super::*;

#[test]
fn support_window_boundaries() {
    assert!(!ProtocolVersion::new(1, 13, 1).is_supported());
    assert!(ProtocolVersion::new(1, 13, 2).is_supported());
    assert!(ProtocolVersion::new(1, 16, 5).is_supported());
    assert!(ProtocolVersion::new(1, 20, 4).is_supported());
    assert!(!ProtocolVersion::new(1, 20, 5).is_supported());
    assert!(!ProtocolVersion::new(1, 8, 9).is_supported());
    assert!(!ProtocolVersion::new(1, 21, 0).is_supported());
}

#[test]
fn metadata_keys_follow_the_version_table() {
    let keys = MetadataKeys::for_version(ProtocolVersion::new(1, 13, 2));
    assert_eq!((keys.item, keys.rotation), (6, 7));

    let keys = MetadataKeys::for_version(ProtocolVersion::new(1, 14, 4));
    assert_eq!((keys.item, keys.rotation), (7, 8));

    let keys = MetadataKeys::for_version(ProtocolVersion::new(1, 16, 5));
    assert_eq!((keys.item, keys.rotation), (7, 8));

    let keys = MetadataKeys::for_version(ProtocolVersion::new(1, 17, 1));
    assert_eq!((keys.item, keys.rotation), (8, 9));

    let keys = MetadataKeys::for_version(ProtocolVersion::new(1, 20, 4));
    assert_eq!((keys.item, keys.rotation), (8, 9));
}

#[test]
fn parse_accepts_two_and_three_components() {
    let full: ProtocolVersion = "1.16.5".parse().unwrap();
    assert_eq!(full, ProtocolVersion::new(1, 16, 5));

    let short: ProtocolVersion = "1.18".parse().unwrap();
    assert_eq!(short, ProtocolVersion::new(1, 18, 0));
}

#[test]
fn parse_rejects_garbage() {
    assert!("1.x.2".parse::<ProtocolVersion>().is_err());
    assert!("1.2.3.4".parse::<ProtocolVersion>().is_err());
}

#[test]
fn display_round_trips() {
    let version = ProtocolVersion::new(1, 20, 4);
    let parsed: ProtocolVersion = version.to_string().parse().unwrap();
    assert_eq!(parsed, version);
}

#[test]
fn ordering_is_component_wise() {
    assert!(ProtocolVersion::new(1, 13, 2) > ProtocolVersion::new(1, 13, 1));
    assert!(ProtocolVersion::new(1, 20, 0) < ProtocolVersion::new(1, 20, 5));
    assert!(ProtocolVersion::new(2, 0, 0) > ProtocolVersion::new(1, 20, 5));
}
