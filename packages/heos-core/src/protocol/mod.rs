//! HEOS event-stream protocol.
//!
//! # Module Structure
//!
//! - `types` - Player, now-playing and transport-state domain types
//! - `fields` - Tolerant JSON path lookup and scalar coercion
//! - `decoder` - Message decoding into typed events

pub mod decoder;
pub mod fields;
pub mod types;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use decoder::{decode, decode_value, DecodeError, DecodeResult, HeosEvent};
pub use types::{NowPlaying, NowPlayingPatch, Player, PlayerId, Track, TransportState};
