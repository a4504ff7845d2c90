//! Completion chime synthesis and playback

use std::f32::consts::PI;

use tracing::debug;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

impl Waveform {
    /// Sample the waveform at `phase` cycles
    fn sample(&self, phase: f32) -> f32 {
        let phase = phase.fract();
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

/// One exponentially decaying tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    pub start_gain: f32,
    pub end_gain: f32,
    pub duration_secs: f32,
}

impl Tone {
    /// Gain at `t` seconds, ramping exponentially from start to end gain
    pub fn gain_at(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.duration_secs {
            return 0.0;
        }
        let ratio = self.end_gain / self.start_gain;
        self.start_gain * ratio.powf(t / self.duration_secs)
    }

    fn sample_at(&self, t: f32) -> f32 {
        self.gain_at(t) * self.waveform.sample(self.frequency_hz * t)
    }
}

/// A set of overlapping tones started together
#[derive(Debug, Clone, PartialEq)]
pub struct Chime {
    pub tones: Vec<Tone>,
}

impl Chime {
    /// C5 sine over half a second layered on a C4 triangle over one second
    pub fn completion() -> Self {
        Self {
            tones: vec![
                Tone {
                    waveform: Waveform::Sine,
                    frequency_hz: 523.25,
                    start_gain: 0.1,
                    end_gain: 0.001,
                    duration_secs: 0.5,
                },
                Tone {
                    waveform: Waveform::Triangle,
                    frequency_hz: 261.63,
                    start_gain: 0.1,
                    end_gain: 0.001,
                    duration_secs: 1.0,
                },
            ],
        }
    }

    /// Length of the longest tone
    pub fn duration_secs(&self) -> f32 {
        self.tones
            .iter()
            .map(|tone| tone.duration_secs)
            .fold(0.0, f32::max)
    }

    /// Mix all tones into mono samples at `sample_rate`
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let len = (self.duration_secs() * sample_rate as f32).ceil() as usize;
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                self.tones.iter().map(|tone| tone.sample_at(t)).sum::<f32>()
            })
            .collect()
    }
}

/// Something that can play a chime without blocking the caller
pub trait ChimePlayer: Send + Sync {
    /// Play the chime; a missing output is silently ignored
    fn play(&self, chime: &Chime);

    /// Check if audio output is available
    fn is_available(&self) -> bool;
}

/// Null chime player (no-op)
pub struct NullChimePlayer;

impl ChimePlayer for NullChimePlayer {
    fn play(&self, _chime: &Chime) {
        debug!("No audio output, skipping completion chime");
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Pick the best player for this build
pub fn default_player(muted: bool) -> std::sync::Arc<dyn ChimePlayer> {
    if muted {
        return std::sync::Arc::new(NullChimePlayer);
    }

    #[cfg(feature = "audio")]
    {
        let player = cpal_player::CpalChimePlayer::new();
        if player.is_available() {
            return std::sync::Arc::new(player);
        }
    }

    std::sync::Arc::new(NullChimePlayer)
}

#[cfg(feature = "audio")]
mod cpal_player {
    use std::{thread, time::Duration};

    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{SampleFormat, StreamConfig};
    use tracing::debug;

    use super::{Chime, ChimePlayer};

    /// Plays chimes on the default output device
    pub struct CpalChimePlayer {
        available: bool,
    }

    impl CpalChimePlayer {
        pub fn new() -> Self {
            Self {
                available: cpal::default_host().default_output_device().is_some(),
            }
        }
    }

    fn play_blocking(device: &cpal::Device, chime: &Chime) -> Result<(), String> {
        let default_config = device
            .default_output_config()
            .map_err(|e| format!("no output config: {}", e))?;
        if default_config.sample_format() != SampleFormat::F32 {
            return Err(format!(
                "unsupported sample format {:?}",
                default_config.sample_format()
            ));
        }

        let config: StreamConfig = default_config.into();
        let channels = usize::from(config.channels.max(1));
        let samples = chime.render(config.sample_rate.0);
        let mut cursor = 0usize;

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let value = samples.get(cursor).copied().unwrap_or(0.0);
                        cursor += 1;
                        for out in frame.iter_mut() {
                            *out = value;
                        }
                    }
                },
                |err| debug!("Chime stream error: {}", err),
                None,
            )
            .map_err(|e| format!("failed to open output stream: {}", e))?;

        stream
            .play()
            .map_err(|e| format!("failed to start output stream: {}", e))?;
        thread::sleep(Duration::from_secs_f32(chime.duration_secs() + 0.1));
        Ok(())
    }

    impl ChimePlayer for CpalChimePlayer {
        fn play(&self, chime: &Chime) {
            let chime = chime.clone();
            thread::spawn(move || {
                let Some(device) = cpal::default_host().default_output_device() else {
                    debug!("No output device, skipping completion chime");
                    return;
                };
                if let Err(e) = play_blocking(&device, &chime) {
                    debug!("Completion chime skipped: {}", e);
                }
            });
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_chime_lasts_one_second() {
        let chime = Chime::completion();
        assert_eq!(chime.tones.len(), 2);
        assert_eq!(chime.duration_secs(), 1.0);
        assert_eq!(chime.render(8000).len(), 8000);
    }

    #[test]
    fn test_gain_decays_exponentially() {
        let tone = Chime::completion().tones[0];
        assert!((tone.gain_at(0.0) - 0.1).abs() < 1e-6);
        assert!((tone.gain_at(0.25) - 0.01).abs() < 1e-4);
        assert_eq!(tone.gain_at(0.5), 0.0);
    }

    #[test]
    fn test_short_tone_is_silent_in_second_half() {
        let chime = Chime::completion();
        let samples = chime.render(8000);
        let peak_late = samples[6000..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let peak_early = samples[..800].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak_early > peak_late);
        assert!(samples.iter().all(|s| s.abs() <= 0.2 + 1e-6));
    }

    #[test]
    fn test_triangle_wave_shape() {
        assert_eq!(Waveform::Triangle.sample(0.0), -1.0);
        assert_eq!(Waveform::Triangle.sample(0.5), 1.0);
        assert_eq!(Waveform::Triangle.sample(0.25), 0.0);
    }

    #[test]
    fn test_null_player_is_unavailable() {
        let player = NullChimePlayer;
        player.play(&Chime::completion());
        assert!(!player.is_available());
        assert!(!default_player(true).is_available());
    }
}
