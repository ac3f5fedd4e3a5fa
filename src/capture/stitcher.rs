use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::capture::session::{CaptureSession, SessionState};
use crate::events::model::{DirectTileEvent, HolderContext, Notification, PlacementEvent};
use crate::events::protocol::{MetadataKeys, ProtocolVersion};
use crate::events::wire;
use crate::foundation::core::{Fragment, Orientation, Rotation, TILE_PIXELS, TileId, WorldPos};
use crate::foundation::error::{StitchError, StitchResult};
use crate::layout::grid::plan_layout;
use crate::palette::table::Palette;
use crate::render::compose::assemble;

/// The assembled output artifact for one completed capture.
#[derive(Clone, Debug)]
pub struct CaptureImage {
    /// The composite image, opaque white where no fragment landed.
    pub image: image::RgbaImage,
}

impl CaptureImage {
    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Event-driven capture service.
///
/// Handlers may be invoked from any thread; each resolves against the
/// capture session that was current when it started, so a reset can
/// never leak a stale fragment into the next capture. A handler blocks
/// only inside the raw-data wait, during which other handlers (notably
/// tile-data arrivals) keep running.
pub struct Stitcher {
    session: Mutex<Arc<CaptureSession>>,
    stopped: AtomicBool,
    palette: Palette,
    keys: MetadataKeys,
    output: Sender<CaptureImage>,
}

impl Stitcher {
    /// Create a service for one upstream protocol version, returning the
    /// receiving end for completed captures.
    ///
    /// An unsupported version is reported and the service starts stopped;
    /// no captures occur until a supported session resumes it.
    pub fn new(version: ProtocolVersion) -> (Self, Receiver<CaptureImage>) {
        let supported = version.is_supported();
        if !supported {
            tracing::error!(%version, "unsupported protocol version; capture disabled");
        }
        let (output, artifacts) = channel();
        let stitcher = Self {
            session: Mutex::new(Arc::new(CaptureSession::new())),
            stopped: AtomicBool::new(!supported),
            palette: Palette::standard(),
            keys: MetadataKeys::for_version(version),
            output,
        };
        (stitcher, artifacts)
    }

    /// The metadata indices resolved for this session's protocol version.
    pub fn metadata_keys(&self) -> MetadataKeys {
        self.keys
    }

    /// Whether inbound events are currently ignored.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Stop processing. The in-flight capture is abandoned and every
    /// pending raw-data wait unblocks without producing output.
    pub fn stop(&self) {
        self.set_stopped(true);
    }

    /// Resume processing with a fresh capture.
    pub fn resume(&self) {
        self.set_stopped(false);
    }

    fn set_stopped(&self, stopped: bool) {
        if self.stopped.swap(stopped, Ordering::AcqRel) != stopped {
            self.reset_session();
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, Arc<CaptureSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_session(&self) -> Arc<CaptureSession> {
        self.lock_session().clone()
    }

    fn reset_session(&self) {
        let mut current = self.lock_session();
        let old = std::mem::replace(&mut *current, Arc::new(CaptureSession::new()));
        drop(current);
        old.cancel();
    }

    fn swap_if_current(&self, session: &Arc<CaptureSession>) {
        let mut current = self.lock_session();
        if Arc::ptr_eq(&current, session) {
            let old = std::mem::replace(&mut *current, Arc::new(CaptureSession::new()));
            drop(current);
            old.cancel();
        }
    }

    /// Dispatch one typed notification.
    pub fn on_notification(&self, notification: Notification) -> StitchResult<()> {
        match notification {
            Notification::TileData(event) => self.on_tile_data(event.tile, event.data),
            Notification::Placement(event) => self.on_placement(event),
            Notification::DirectTile(event) => self.on_direct_tile(event),
        }
    }

    /// Decode and dispatch a raw generic packet (tile data or a direct
    /// tile reference). Irrelevant packets are ignored.
    pub fn on_raw_packet(&self, packet: &Value) -> StitchResult<()> {
        if self.is_stopped() {
            return Ok(());
        }
        match wire::decode_packet(packet) {
            Some(notification) => self.on_notification(notification),
            None => Ok(()),
        }
    }

    /// Decode and dispatch a raw entity-metadata notification. `holder`
    /// is the host's lookup of the named entity; `None` drops the event.
    pub fn on_raw_entity_metadata(
        &self,
        holder: Option<HolderContext>,
        metadata: &Value,
    ) -> StitchResult<()> {
        if self.is_stopped() {
            return Ok(());
        }
        match wire::decode_entity_metadata(holder, metadata, self.keys) {
            Some(notification) => self.on_notification(notification),
            None => Ok(()),
        }
    }

    /// Record raw tile data for an id. Last write wins on repeats.
    #[tracing::instrument(skip(self, data))]
    pub fn on_tile_data(&self, tile: TileId, data: Vec<u8>) -> StitchResult<()> {
        if self.is_stopped() {
            return Ok(());
        }
        if data.len() != TILE_PIXELS {
            return Err(StitchError::payload(format!(
                "tile {} data is {} bytes, expected {TILE_PIXELS}",
                tile.0,
                data.len()
            )));
        }
        self.current_session().insert_tile(tile, data);
        Ok(())
    }

    /// Direct path: a tile reference observed outside the placement
    /// stream contributes one fragment at the origin with no rotation.
    #[tracing::instrument(skip(self, event))]
    pub fn on_direct_tile(&self, event: DirectTileEvent) -> StitchResult<()> {
        if self.is_stopped() {
            return Ok(());
        }
        if !event.item.is_filled_map() {
            tracing::debug!(kind = %event.item.kind, "direct item is not a filled map; ignored");
            return Ok(());
        }

        let session = self.current_session();
        let tile = event.item.map.unwrap_or(TileId::EMPTY);
        if session.await_tile(tile).is_none() && !tile.is_empty() {
            return Ok(());
        }

        self.finish_fragment(
            &session,
            Fragment {
                pos: WorldPos::ORIGIN,
                tile,
                rotation: Rotation::default(),
            },
        )
    }

    /// Placement path: a frame-like holder with an attached filled map
    /// contributes a positioned, rotated fragment.
    ///
    /// The holder position and orientation are recorded before the
    /// raw-data wait; the fragment itself is appended once resolved.
    #[tracing::instrument(skip(self, event))]
    pub fn on_placement(&self, event: PlacementEvent) -> StitchResult<()> {
        if self.is_stopped() {
            return Ok(());
        }
        if !event.holder.is_frame() {
            tracing::debug!(kind = %event.holder.kind, "holder is not a frame; ignored");
            return Ok(());
        }
        if !event.item.is_filled_map() {
            tracing::debug!(kind = %event.item.kind, "attached item is not a filled map; ignored");
            return Ok(());
        }

        let session = self.current_session();

        let orientation = Orientation::from_yaw(event.holder.yaw);
        if orientation.is_none() {
            tracing::warn!(
                yaw = event.holder.yaw,
                "yaw outside the orientation table; capture orientation unset"
            );
        }
        session.record_placement(event.holder.position, orientation);

        let tile = event.item.map.ok_or_else(|| {
            StitchError::payload("filled map attached to a frame carries no map id")
        })?;
        let rotation = event.rotation.unwrap_or_default();

        if session.await_tile(tile).is_none() && !tile.is_empty() {
            return Ok(());
        }

        self.finish_fragment(
            &session,
            Fragment {
                pos: event.holder.position,
                tile,
                rotation,
            },
        )
    }

    fn finish_fragment(
        &self,
        session: &Arc<CaptureSession>,
        fragment: Fragment,
    ) -> StitchResult<()> {
        let Some(completed) = session.push_fragment_and_claim(fragment) else {
            return Ok(());
        };

        // Fresh state is in place before the artifact leaves the service.
        self.swap_if_current(session);

        let capture = self.assemble_capture(completed)?;
        if self.output.send(capture).is_err() {
            tracing::debug!("capture receiver dropped; composite discarded");
        }
        Ok(())
    }

    fn assemble_capture(&self, state: SessionState) -> StitchResult<CaptureImage> {
        let SessionState {
            tiles,
            fragments,
            xs,
            ys,
            zs,
            orientation,
        } = state;

        let plan = plan_layout(&xs, &ys, &zs, orientation);
        let image = assemble(&fragments, &tiles, &plan, &self.palette)?;
        tracing::debug!(
            fragments = fragments.len(),
            width = image.width(),
            height = image.height(),
            "capture assembled"
        );
        Ok(CaptureImage { image })
    }

    #[cfg(test)]
    pub(crate) fn session_handle(&self) -> Arc<CaptureSession> {
        self.current_session()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/stitcher.rs"]
mod tests;
