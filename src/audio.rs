//! Audio system using Web Audio API
//!
//! The bounce cue is a procedurally generated glass "ting" - no external
//! files needed. A new bounce cuts the previous ting off and starts over, so
//! a burst of bounces never piles up voices.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::BounceSink;

/// Partials of the ting: (frequency Hz, relative gain)
const TING_PARTIALS: [(f32, f32); 3] = [(2093.0, 1.0), (3136.0, 0.45), (5274.0, 0.2)];
/// Ting decay time in seconds
const TING_DECAY: f64 = 0.35;

/// Bounce cue player
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    /// Oscillators of the ting currently sounding
    voices: Vec<OscillatorNode>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
            voices: Vec::new(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Apply volume/mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Cut off whatever is still ringing
    fn silence(&mut self) {
        for osc in self.voices.drain(..) {
            osc.stop().ok();
        }
    }

    /// Glass ting - bright partials with a fast exponential decay
    fn play_ting(&mut self) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }
        self.silence();

        let Some(ctx) = self.ctx.clone() else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let t = ctx.current_time();
        for (freq, level) in TING_PARTIALS {
            if let Some((osc, gain)) = self.create_osc(&ctx, freq, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * level, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + TING_DECAY)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + TING_DECAY + 0.05).ok();
                self.voices.push(osc);
            }
        }
    }
}

impl BounceSink for AudioManager {
    fn play_bounce(&mut self) {
        self.play_ting();
    }
}
