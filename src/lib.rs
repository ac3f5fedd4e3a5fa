//! Mapstitch reassembles one composite image per capture from 128x128
//! map-tile fragments that arrive asynchronously and out of order.
//!
//! Fragments reference their raw pixel data by an opaque tile id; the
//! data may arrive before or after the reference. The pipeline turns a
//! stream of notifications into a finished `RgbaImage`:
//!
//! 1. **Correlate**: a fragment reference blocks until its raw tile data
//!    is observed ([`CaptureSession::await_tile`])
//! 2. **Accumulate**: resolved fragments and their world positions
//!    collect in a single live [`CaptureSession`] until the set is
//!    complete
//! 3. **Layout**: 3-D positions collapse to a deterministic 2-D grid of
//!    pixel offsets ([`plan_layout`])
//! 4. **Assemble**: each fragment is palette-decoded, rotated and
//!    composited onto an opaque white canvas ([`assemble`])
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **One capture at a time**: completing or stopping replaces the whole
//!   session object; no handler can observe a half-reset state.
//! - **Typed boundary**: dynamic upstream payloads are validated once in
//!   [`wire`]; everything past that point is the typed model.
//! - **No IO in assembly**: the output artifact is handed to the caller
//!   as pixels, never written by this crate.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod capture;
mod events;
mod foundation;
mod layout;
mod palette;
mod render;

/// Raw-payload decoding at the event boundary.
pub mod wire {
    pub use crate::events::wire::{decode_entity_metadata, decode_packet};
}

pub use capture::session::CaptureSession;
pub use capture::stitcher::{CaptureImage, Stitcher};
pub use events::model::{
    DirectTileEvent, HolderContext, ItemStack, Notification, PlacementEvent, TileDataEvent,
};
pub use events::protocol::{MetadataKeys, ProtocolVersion};
pub use foundation::core::{
    Fragment, Orientation, Rotation, TILE_PIXELS, TILE_SIZE, TileData, TileId, WorldPos,
};
pub use foundation::error::{StitchError, StitchResult};
pub use layout::grid::{AxisMapping, HorizontalAxis, LayoutPlan, build_axis_mapping, plan_layout};
pub use palette::table::Palette;
pub use render::compose::assemble;
