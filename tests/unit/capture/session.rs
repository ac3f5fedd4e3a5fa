use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::*;
use crate::foundation::core::{Fragment, Orientation, Rotation, TileId, WorldPos};

fn fragment(tile: TileId) -> Fragment {
    Fragment {
        pos: WorldPos::ORIGIN,
        tile,
        rotation: Rotation::default(),
    }
}

#[test]
fn empty_sentinel_resolves_immediately() {
    let session = CaptureSession::new();
    let started = Instant::now();
    assert!(session.await_tile(TileId::EMPTY).is_none());
    assert!(started.elapsed() < POLL_INTERVAL);
}

#[test]
fn present_tile_resolves_without_waiting() {
    let session = CaptureSession::new();
    session.insert_tile(TileId(5), vec![1, 2, 3]);
    let started = Instant::now();
    let data = session.await_tile(TileId(5)).expect("tile present");
    assert_eq!(&data[..], &[1, 2, 3]);
    assert!(started.elapsed() < POLL_INTERVAL);
}

#[test]
fn wait_resolves_once_data_arrives() {
    let session = Arc::new(CaptureSession::new());
    let waiter = thread::spawn({
        let session = session.clone();
        move || session.await_tile(TileId(7))
    });

    thread::sleep(Duration::from_millis(150));
    session.insert_tile(TileId(7), vec![9]);

    let data = waiter.join().expect("waiter thread").expect("resolved");
    assert_eq!(&data[..], &[9]);
}

#[test]
fn repeated_id_keeps_last_write() {
    let session = CaptureSession::new();
    session.insert_tile(TileId(3), vec![1]);
    session.insert_tile(TileId(3), vec![2]);
    assert_eq!(&session.await_tile(TileId(3)).unwrap()[..], &[2]);
}

#[test]
fn cancel_unblocks_pending_wait() {
    let session = Arc::new(CaptureSession::new());
    let waiter = thread::spawn({
        let session = session.clone();
        move || {
            let started = Instant::now();
            let resolved = session.await_tile(TileId(9));
            (resolved, started.elapsed())
        }
    });

    thread::sleep(Duration::from_millis(50));
    session.cancel();

    let (resolved, waited) = waiter.join().expect("waiter thread");
    assert!(resolved.is_none());
    // unblocks within one poll tick of the cancellation
    assert!(waited < Duration::from_millis(50) + POLL_INTERVAL * 2);
}

#[test]
fn completeness_requires_matching_counts() {
    let session = CaptureSession::new();
    session.insert_tile(TileId(1), vec![0]);
    session.insert_tile(TileId(2), vec![0]);

    // one fragment, two buffers: not complete
    assert!(session.push_fragment_and_claim(fragment(TileId(1))).is_none());
    // counts first become equal here
    let completed = session
        .push_fragment_and_claim(fragment(TileId(2)))
        .expect("second append completes the capture");
    assert_eq!(completed.fragments.len(), 2);
    assert_eq!(completed.tiles.len(), 2);
}

#[test]
fn excess_position_records_block_completion() {
    let session = CaptureSession::new();
    session.insert_tile(TileId(1), vec![0]);
    session.record_placement(WorldPos::new(0, 0, 0), None);
    session.record_placement(WorldPos::new(1, 0, 0), None);

    // counts match but the placement stream is ahead of the fragments
    assert!(session.push_fragment_and_claim(fragment(TileId(1))).is_none());
}

#[test]
fn direct_fragments_do_not_touch_position_records() {
    let session = CaptureSession::new();
    session.insert_tile(TileId(4), vec![0]);
    session.insert_tile(TileId(5), vec![0]);
    assert!(session.push_fragment_and_claim(fragment(TileId(4))).is_none());

    session.with_state(|state| {
        assert_eq!(state.fragments.len(), 1);
        assert!(state.xs.is_empty());
        assert!(state.ys.is_empty());
        assert!(state.zs.is_empty());
    });
}

#[test]
fn claim_leaves_the_session_empty() {
    let session = CaptureSession::new();
    session.insert_tile(TileId(1), vec![0]);
    session.record_placement(WorldPos::new(2, 3, 4), Orientation::from_yaw(2.0));
    session
        .push_fragment_and_claim(fragment(TileId(1)))
        .expect("complete");

    session.with_state(|state| {
        assert!(state.tiles.is_empty());
        assert!(state.fragments.is_empty());
        assert!(state.xs.is_empty());
        assert!(state.ys.is_empty());
        assert!(state.zs.is_empty());
        assert!(state.orientation.is_none());
    });
}

#[test]
fn cancelled_session_never_claims() {
    let session = CaptureSession::new();
    session.insert_tile(TileId(1), vec![0]);
    session.cancel();
    assert!(session.push_fragment_and_claim(fragment(TileId(1))).is_none());
}

#[test]
fn every_placement_overwrites_orientation() {
    let session = CaptureSession::new();
    session.record_placement(WorldPos::ORIGIN, Some(Orientation::North));
    session.with_state(|state| assert_eq!(state.orientation, Some(Orientation::North)));

    // an unknown yaw clears it rather than keeping the stale value
    session.record_placement(WorldPos::ORIGIN, None);
    session.with_state(|state| assert_eq!(state.orientation, None));
}
