//! Audio cues
//!
//! The engine only names cues; a sink decides how (or whether) to play them.
//! On the web, effects are synthesized with the Web Audio API and music loops
//! from an audio element.

use thiserror::Error;

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Any ordinary pop
    Pop,
    /// Special bubble popped
    Special,
    /// Combo reached the cue threshold
    Combo,
    LevelUp,
    GameOver,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output is unavailable")]
    Unavailable,
    #[error("failed to start {what}: {reason}")]
    Playback { what: String, reason: String },
}

/// Audio collaborator
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue) -> Result<(), AudioError>;
    fn start_music(&mut self) -> Result<(), AudioError>;
    fn stop_music(&mut self);
    fn set_sound_enabled(&mut self, enabled: bool);
    /// Disabling music also stops it; enabling never starts it
    fn set_music_enabled(&mut self, enabled: bool);
}

/// Silent sink for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) -> Result<(), AudioError> {
        Ok(())
    }

    fn start_music(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_music(&mut self) {}

    fn set_sound_enabled(&mut self, _enabled: bool) {}

    fn set_music_enabled(&mut self, _enabled: bool) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use super::{AudioCue, AudioError, AudioSink};

    const MUSIC_PATH: &str = "assets/sounds/background_music.mp3";
    const MUSIC_VOLUME: f64 = 0.4;
    const EFFECTS_VOLUME: f32 = 0.8;

    fn js_reason(err: wasm_bindgen::JsValue) -> String {
        format!("{:?}", err)
    }

    /// Web Audio sink: synthesized effects, looping music element
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        music: Option<HtmlAudioElement>,
        sound_enabled: bool,
        music_enabled: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - sound effects disabled");
            }
            let music = match HtmlAudioElement::new_with_src(MUSIC_PATH) {
                Ok(el) => {
                    el.set_loop(true);
                    el.set_volume(MUSIC_VOLUME);
                    Some(el)
                }
                Err(e) => {
                    log::warn!("Background music unavailable: {}", js_reason(e));
                    None
                }
            };
            Self {
                ctx,
                music,
                sound_enabled: true,
                music_enabled: true,
            }
        }

        /// Oscillator routed through its own gain node
        fn voice(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Result<(OscillatorNode, GainNode), AudioError> {
            let fail = |reason| AudioError::Playback {
                what: "oscillator".into(),
                reason,
            };
            let osc = ctx.create_oscillator().map_err(|e| fail(js_reason(e)))?;
            let gain = ctx.create_gain().map_err(|e| fail(js_reason(e)))?;
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain)
                .map_err(|e| fail(js_reason(e)))?;
            gain.connect_with_audio_node(&ctx.destination())
                .map_err(|e| fail(js_reason(e)))?;
            Ok((osc, gain))
        }

        /// Play a note sequence: (frequency, start offset, length, level)
        fn notes(
            ctx: &AudioContext,
            osc_type: OscillatorType,
            vol: f32,
            notes: &[(f32, f64, f64, f32)],
        ) -> Result<(), AudioError> {
            for &(freq, offset, len, level) in notes {
                let (osc, gain) = Self::voice(ctx, freq, osc_type)?;
                let t = ctx.current_time() + offset;
                gain.gain().set_value_at_time(vol * level, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + len)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + len + 0.05).ok();
            }
            Ok(())
        }

        /// Pop - short bright blip falling in pitch
        fn play_pop(ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
            let (osc, gain) = Self::voice(ctx, 900.0, OscillatorType::Sine)?;
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency().set_value_at_time(900.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(300.0, t + 0.08)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
            Ok(())
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: AudioCue) -> Result<(), AudioError> {
            if !self.sound_enabled {
                return Ok(());
            }
            let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let vol = EFFECTS_VOLUME;
            match cue {
                AudioCue::Pop => Self::play_pop(ctx, vol),
                AudioCue::Special => Self::notes(
                    ctx,
                    OscillatorType::Sine,
                    vol,
                    &[(600.0, 0.0, 0.15, 0.25), (800.0, 0.08, 0.15, 0.25), (1000.0, 0.16, 0.15, 0.25)],
                ),
                AudioCue::Combo => Self::notes(
                    ctx,
                    OscillatorType::Sine,
                    vol,
                    &[(1200.0, 0.0, 0.3, 0.2), (1800.0, 0.02, 0.3, 0.2), (2400.0, 0.04, 0.3, 0.2)],
                ),
                AudioCue::LevelUp => Self::notes(
                    ctx,
                    OscillatorType::Triangle,
                    vol,
                    &[
                        (400.0, 0.0, 0.4, 0.3),
                        (500.0, 0.1, 0.4, 0.3),
                        (600.0, 0.2, 0.4, 0.3),
                        (800.0, 0.3, 0.4, 0.3),
                    ],
                ),
                AudioCue::GameOver => Self::notes(
                    ctx,
                    OscillatorType::Sine,
                    vol,
                    &[
                        (400.0, 0.0, 0.3, 0.3),
                        (350.0, 0.2, 0.3, 0.3),
                        (300.0, 0.4, 0.3, 0.3),
                        (200.0, 0.6, 0.3, 0.3),
                    ],
                ),
            }
        }

        fn start_music(&mut self) -> Result<(), AudioError> {
            if !self.music_enabled {
                return Ok(());
            }
            let music = self.music.as_ref().ok_or(AudioError::Unavailable)?;
            music.set_current_time(0.0);
            // Autoplay policy may still reject the returned promise; that is logged by the browser
            music.play().map(|_| ()).map_err(|e| AudioError::Playback {
                what: "music".into(),
                reason: js_reason(e),
            })
        }

        fn stop_music(&mut self) {
            if let Some(music) = &self.music {
                let _ = music.pause();
                music.set_current_time(0.0);
            }
        }

        fn set_sound_enabled(&mut self, enabled: bool) {
            self.sound_enabled = enabled;
        }

        fn set_music_enabled(&mut self, enabled: bool) {
            self.music_enabled = enabled;
            if !enabled {
                self.stop_music();
            }
        }
    }
}
