//! Sound layers, cues and crossfades for Solar Quest, played through Kira.

pub mod backend;
pub mod director;
pub mod kira_backend;
pub mod sound;

pub use backend::{AudioBackend, AudioError, SilentBackend};
pub use director::{AudioDirector, ChannelState, BOOST_PLAYBACK_RATE};
pub use kira_backend::KiraBackend;
pub use sound::{Cue, Layer, Sound, SoundAsset, CLICK_POOL_SIZE};

// Re-export for convenience
pub use kira;
