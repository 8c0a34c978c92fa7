use std::sync::Arc;

use ab_core::config::AudioSettings;

/// Nombre maximal de voix d'effets simultanées. The oldest voice is dropped
/// when a new effect starts on a full mixer.
pub const MAX_EFFECT_VOICES: usize = 32;

/// Decoded sound, stereo frames already at the output sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    frames: Vec<[f32; 2]>,
    sample_rate: u32,
}

impl Clip {
    #[must_use]
    pub fn new(frames: Vec<[f32; 2]>, sample_rate: u32) -> Self {
        Self {
            frames,
            sample_rate,
        }
    }

    #[must_use]
    pub fn frames(&self) -> &[[f32; 2]] {
        &self.frames
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length in frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Gains applied by the mixer, each in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Volumes {
    pub master: f32,
    pub music: f32,
    pub effect: f32,
}

impl Default for Volumes {
    fn default() -> Self {
        Self {
            master: 1.0,
            music: 1.0,
            effect: 1.0,
        }
    }
}

impl From<&AudioSettings> for Volumes {
    fn from(settings: &AudioSettings) -> Self {
        Self {
            master: settings.master_volume,
            music: settings.music_volume,
            effect: settings.effect_volume,
        }
    }
}

/// Commandes envoyées au mixer depuis le thread UI.
#[derive(Debug)]
pub enum MixerCommand {
    /// Replace the music voice.
    PlayMusic { clip: Arc<Clip>, looped: bool },
    StopMusic,
    /// Start a one-shot effect voice.
    PlayEffect(Arc<Clip>),
}

/// One playing clip.
#[derive(Debug)]
struct Voice {
    clip: Arc<Clip>,
    pos: usize,
    looped: bool,
}

impl Voice {
    fn new(clip: Arc<Clip>, looped: bool) -> Self {
        Self {
            clip,
            pos: 0,
            looped,
        }
    }

    fn next_frame(&mut self) -> Option<[f32; 2]> {
        let frames = self.clip.frames();
        match frames.get(self.pos) {
            Some(frame) => {
                self.pos += 1;
                Some(*frame)
            }
            None if self.looped && !frames.is_empty() => {
                self.pos = 1;
                Some(frames[0])
            }
            None => None,
        }
    }

    fn is_finished(&self) -> bool {
        !self.looped && self.pos >= self.clip.len()
    }
}

/// Software mixer: one music voice plus one-shot effect voices.
///
/// Lives on the audio thread; the UI side only holds the command sender.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use ab_audio::mixer::{Clip, Mixer, MixerCommand, Volumes};
///
/// let (mut mixer, tx) = Mixer::new(Volumes::default());
/// tx.send(MixerCommand::PlayEffect(Arc::new(Clip::new(vec![[0.5, 0.5]], 44100)))).unwrap();
/// let mut out = [0.0f32; 4];
/// mixer.fill(&mut out, 2);
/// assert_eq!(out, [0.5, 0.5, 0.0, 0.0]);
/// ```
pub struct Mixer {
    rx: flume::Receiver<MixerCommand>,
    music: Option<Voice>,
    effects: Vec<Voice>,
    volumes: Volumes,
}

impl Mixer {
    /// Create a mixer and the sender used to drive it.
    #[must_use]
    pub fn new(volumes: Volumes) -> (Self, flume::Sender<MixerCommand>) {
        let (tx, rx) = flume::unbounded();
        (
            Self {
                rx,
                music: None,
                effects: Vec::with_capacity(MAX_EFFECT_VOICES),
                volumes,
            },
            tx,
        )
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.rx.try_recv() {
            match command {
                MixerCommand::PlayMusic { clip, looped } => {
                    self.music = Some(Voice::new(clip, looped));
                }
                MixerCommand::StopMusic => self.music = None,
                MixerCommand::PlayEffect(clip) => {
                    if self.effects.len() >= MAX_EFFECT_VOICES {
                        self.effects.remove(0);
                    }
                    self.effects.push(Voice::new(clip, false));
                }
            }
        }
    }

    /// Apply pending commands, then write interleaved samples for
    /// `out.len() / channels` frames.
    ///
    /// Mono devices get the average of both sides; channels past the second
    /// are silent.
    pub fn fill(&mut self, out: &mut [f32], channels: usize) {
        self.drain_commands();

        let channels = channels.max(1);
        let Volumes {
            master,
            music,
            effect,
        } = self.volumes;

        for frame in out.chunks_mut(channels) {
            let mut mix = [0.0f32; 2];

            if let Some(voice) = self.music.as_mut()
                && let Some(sample) = voice.next_frame()
            {
                mix[0] += sample[0] * music;
                mix[1] += sample[1] * music;
            }

            for voice in &mut self.effects {
                if let Some(sample) = voice.next_frame() {
                    mix[0] += sample[0] * effect;
                    mix[1] += sample[1] * effect;
                }
            }

            let left = (mix[0] * master).clamp(-1.0, 1.0);
            let right = (mix[1] * master).clamp(-1.0, 1.0);

            frame.fill(0.0);
            if let [l, r, ..] = frame {
                *l = left;
                *r = right;
            } else if let [m] = frame {
                *m = (left + right) * 0.5;
            }
        }

        if self.music.as_ref().is_some_and(Voice::is_finished) {
            self.music = None;
        }
        self.effects.retain(|voice| !voice.is_finished());
    }

    /// `true` tant qu'une musique est en cours.
    #[must_use]
    pub fn is_music_playing(&self) -> bool {
        self.music.is_some()
    }

    /// Nombre de voix d'effets actives.
    #[must_use]
    pub fn active_effects(&self) -> usize {
        self.effects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(frames: &[[f32; 2]]) -> Arc<Clip> {
        Arc::new(Clip::new(frames.to_vec(), 44100))
    }

    #[test]
    fn music_and_effects_are_summed_with_volumes() {
        let (mut mixer, tx) = Mixer::new(Volumes {
            master: 0.5,
            music: 0.5,
            effect: 1.0,
        });
        tx.send(MixerCommand::PlayMusic {
            clip: clip(&[[0.8, 0.4]; 4]),
            looped: true,
        })
        .unwrap();
        tx.send(MixerCommand::PlayEffect(clip(&[[0.2, 0.2]]))).unwrap();

        let mut out = [0.0f32; 4];
        mixer.fill(&mut out, 2);
        // (0.8*0.5 + 0.2) * 0.5 = 0.3 ; (0.4*0.5 + 0.2) * 0.5 = 0.2
        assert!((out[0] - 0.3).abs() < 1e-6);
        assert!((out[1] - 0.2).abs() < 1e-6);
        // effect finished after one frame
        assert!((out[2] - 0.2).abs() < 1e-6);
        assert_eq!(mixer.active_effects(), 0);
        assert!(mixer.is_music_playing());
    }

    #[test]
    fn looped_music_wraps_and_one_shot_music_ends() {
        let (mut mixer, tx) = Mixer::new(Volumes::default());
        tx.send(MixerCommand::PlayMusic {
            clip: clip(&[[0.1, 0.1], [0.2, 0.2]]),
            looped: true,
        })
        .unwrap();
        let mut out = [0.0f32; 5];
        mixer.fill(&mut out, 1);
        let expected = [0.1, 0.2, 0.1, 0.2, 0.1];
        for (got, want) in out.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6);
        }

        tx.send(MixerCommand::PlayMusic {
            clip: clip(&[[0.1, 0.1]]),
            looped: false,
        })
        .unwrap();
        mixer.fill(&mut out, 1);
        assert!(!mixer.is_music_playing());
        assert!(out[1].abs() < f32::EPSILON);
    }

    #[test]
    fn stop_music_silences_output() {
        let (mut mixer, tx) = Mixer::new(Volumes::default());
        tx.send(MixerCommand::PlayMusic {
            clip: clip(&[[0.5, 0.5]]),
            looped: true,
        })
        .unwrap();
        tx.send(MixerCommand::StopMusic).unwrap();
        let mut out = [1.0f32; 4];
        mixer.fill(&mut out, 2);
        assert!(out.iter().all(|s| s.abs() < f32::EPSILON));
        assert!(!mixer.is_music_playing());
    }

    #[test]
    fn output_is_clamped() {
        let (mut mixer, tx) = Mixer::new(Volumes::default());
        for _ in 0..4 {
            tx.send(MixerCommand::PlayEffect(clip(&[[0.9, -0.9]]))).unwrap();
        }
        let mut out = [0.0f32; 2];
        mixer.fill(&mut out, 2);
        assert!((out[0] - 1.0).abs() < f32::EPSILON);
        assert!((out[1] + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn voice_cap_drops_oldest() {
        let (mut mixer, tx) = Mixer::new(Volumes::default());
        for _ in 0..(MAX_EFFECT_VOICES + 5) {
            tx.send(MixerCommand::PlayEffect(clip(&[[0.0, 0.0]; 16]))).unwrap();
        }
        let mut out = [0.0f32; 2];
        mixer.fill(&mut out, 2);
        assert_eq!(mixer.active_effects(), MAX_EFFECT_VOICES);
    }

    #[test]
    fn extra_channels_are_silent() {
        let (mut mixer, tx) = Mixer::new(Volumes::default());
        tx.send(MixerCommand::PlayEffect(clip(&[[0.25, 0.75]]))).unwrap();
        let mut out = [9.0f32; 4];
        mixer.fill(&mut out, 4);
        assert_eq!(out, [0.25, 0.75, 0.0, 0.0]);
    }
}
