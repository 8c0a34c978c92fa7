//! Types partagés, contrats des collaborateurs et configuration pour audiobuddy.
//!
//! This crate holds everything the selection menu, the audio service and the
//! terminal host need to agree on, without depending on any of them.

pub mod asset;
pub mod config;
pub mod error;
pub mod traits;

pub use asset::AssetRef;
pub use config::SoundTestConfig;
pub use error::MenuError;
pub use traits::{AudioService, Direction, EntryId, MenuAction, MenuHost, MenuOutcome, SoundHandle};
