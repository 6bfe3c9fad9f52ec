//! Audio sources and playback
//!
//! A spoken asset is either pre-hosted or synthesized on demand from text;
//! playback treats both the same way.

mod playback;
mod source;

pub use playback::{AudioAffordance, AudioClip, AudioFetcher, AudioPlayback, PlaybackState, PlaybackTicket};
pub use source::{resolve_audio, synthesis_source, AudioSource};
