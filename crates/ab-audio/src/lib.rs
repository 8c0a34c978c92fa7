// Audio service for the sound test: decoding, mixing and device output.

pub mod decode;
pub mod error;
pub mod manager;
pub mod mixer;
pub mod output;

pub use error::AudioError;
pub use manager::{AudioManager, EffectHandle};
pub use mixer::{Clip, Mixer, MixerCommand, Volumes};

#[cfg(test)]
pub(crate) mod test_wav;
