//! Short synthesized blips for buttons and collecting, no sound files.
//!
//! Every effect is a list of sine tones scheduled on the audio clock, so a
//! multi-note effect needs no timers of its own.

use crate::events::GameEvent;
use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

/// One note of an effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    /// seconds
    pub duration: f64,
    pub volume: f32,
    /// seconds after the effect starts
    pub delay: f64,
}

const fn tone(frequency: f32, duration: f64, volume: f32, delay: f64) -> Tone {
    Tone {
        frequency,
        duration,
        volume,
        delay,
    }
}

const INFO_BUTTON: [Tone; 2] = [tone(700.0, 0.1, 0.1, 0.0), tone(900.0, 0.1, 0.08, 0.1)];
const PAUSE_BUTTON: [Tone; 2] = [tone(500.0, 0.15, 0.1, 0.0), tone(400.0, 0.1, 0.1, 0.15)];
const RESTART_BUTTON: [Tone; 4] = [
    tone(600.0, 0.05, 0.1, 0.0),
    tone(800.0, 0.05, 0.1, 0.05),
    tone(1000.0, 0.05, 0.1, 0.1),
    tone(800.0, 0.05, 0.1, 0.15),
];
const POPUP_CLOSE: [Tone; 1] = [tone(600.0, 0.1, 0.08, 0.0)];
const EAT: [Tone; 1] = [tone(600.0, 0.2, 0.1, 0.0)];
const NOM: [Tone; 3] = [
    tone(800.0, 0.1, 0.15, 0.0),
    tone(900.0, 0.1, 0.15, 0.1),
    tone(850.0, 0.15, 0.15, 0.2),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    InfoButton,
    PauseButton,
    RestartButton,
    PopupClose,
    /// ordinary animal collected
    Eat,
    /// shiny animal collected
    Nom,
}

impl SoundEffect {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::InfoButton => &INFO_BUTTON,
            SoundEffect::PauseButton => &PAUSE_BUTTON,
            SoundEffect::RestartButton => &RESTART_BUTTON,
            SoundEffect::PopupClose => &POPUP_CLOSE,
            SoundEffect::Eat => &EAT,
            SoundEffect::Nom => &NOM,
        }
    }

    /// The effect a simulation event makes, if any
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::Collect { .. } => Some(SoundEffect::Eat),
            GameEvent::RareCollect { .. } => Some(SoundEffect::Nom),
            _ => None,
        }
    }
}

/// Owns the page's `AudioContext`
///
/// Browsers only allow audio after a user gesture, so create this from the
/// first key press or click.
pub struct AudioManager {
    ctx: Option<AudioContext>,
}

impl AudioManager {
    pub fn new() -> Self {
        let ctx = AudioContext::new().ok();
        match &ctx {
            Some(ctx) => {
                if ctx.state() == AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
                log::info!("Audio initialized");
            }
            None => log::warn!("Failed to create AudioContext, audio disabled"),
        }
        AudioManager { ctx }
    }

    pub fn play(&self, effect: SoundEffect) {
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        let start = ctx.current_time();
        for tone in effect.tones() {
            if play_tone(ctx, tone, start + tone.delay).is_none() {
                log::warn!("Could not play {:?} at {} Hz", effect, tone.frequency);
            }
        }
    }

    pub fn play_for_event(&self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}

fn create_osc(ctx: &AudioContext, frequency: f32) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;
    osc.set_type(OscillatorType::Sine);
    osc.frequency().set_value(frequency);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;
    Some((osc, gain))
}

/// Quick attack, exponential decay over the tone's duration
fn play_tone(ctx: &AudioContext, tone: &Tone, at: f64) -> Option<()> {
    let (osc, gain) = create_osc(ctx, tone.frequency)?;
    let envelope = gain.gain();
    envelope.set_value_at_time(0.0, at).ok()?;
    envelope
        .linear_ramp_to_value_at_time(tone.volume, at + 0.01)
        .ok()?;
    envelope
        .exponential_ramp_to_value_at_time(0.001, at + tone.duration)
        .ok()?;
    osc.start_with_when(at).ok()?;
    osc.stop_with_when(at + tone.duration).ok()?;
    Some(())
}
