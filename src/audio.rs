//! Audio system using Web Audio API
//!
//! Procedurally generated cues, no external files. The simulation only
//! reports *when* something happened (via `EventSink`); every sound is
//! decided here.

use glam::IVec2;
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::EventSink;
use crate::sim::notes::PENTATONIC;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player entered a tile; carries the tile's MIDI note
    Step(u8),
    /// Enemy fired
    EnemyShot,
    /// Player hit by a bullet
    Hit,
    /// Player stepped on a trap
    Trapped,
    Won,
    /// Countdown budget ran out
    Lost,
}

pub fn midi_to_hz(note: f32) -> f32 {
    440.0 * 2f32.powf((note - 69.0) / 12.0)
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(enabled: bool) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            muted: !enabled,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers start the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Step(note) => self.play_step(ctx, vol, note),
            SoundEffect::EnemyShot => self.play_kick(ctx, vol),
            SoundEffect::Hit => self.play_splash(ctx, vol),
            SoundEffect::Trapped => self.play_gong(ctx, vol),
            SoundEffect::Won => {
                let note = PENTATONIC[PENTATONIC.len() - 1] + 24;
                self.play_note(ctx, vol * 0.35, note, 2.0);
            }
            SoundEffect::Lost => {
                let note = PENTATONIC[0] - 24;
                self.play_note(ctx, vol * 0.4, note, 4.0);
            }
        }
    }

    // === Sound generators ===

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

    /// Soft sine note with a short attack
    fn play_note(&self, ctx: &AudioContext, peak: f32, note: u8, duration: f64) {
        let Some((osc, gain)) = self.create_osc(ctx, midi_to_hz(note as f32), OscillatorType::Sine)
        else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain().linear_ramp_to_value_at_time(peak, t + 0.1).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + duration).ok();
    }

    /// Step - the tile's note, sometimes doubled two octaves up
    fn play_step(&self, ctx: &AudioContext, vol: f32, note: u8) {
        self.play_note(ctx, vol * 0.3, note, 0.3);
        if note % 2 == 1 {
            self.play_note(ctx, vol * 0.12, note.saturating_add(24), 0.18);
        }
    }

    /// Enemy shot - deep kick drum
    fn play_kick(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 50.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain().linear_ramp_to_value_at_time(vol * 0.9, t + 0.001).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(vol * 0.4, t + 0.02)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.25)
            .ok();
        osc.frequency().set_value_at_time(50.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(30.0, t + 0.05)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(25.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }

    /// Hit - bright splash of falling partials
    fn play_splash(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [800.0, 1200.0, 1600.0, 2000.0].into_iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                continue;
            };
            let start = t + i as f64 * 0.01;

            gain.gain().set_value_at_time(0.0, start).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.3, start + 0.01)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(vol * 0.1, start + 0.1)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.5)
                .ok();
            osc.frequency().set_value_at_time(freq, start).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(freq * 0.3, start + 0.3)
                .ok();

            osc.start_with_when(start).ok();
            osc.stop_with_when(start + 0.5).ok();
        }
    }

    /// Trapped - long metallic gong
    fn play_gong(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        let partials = [(200.0, 0.6), (400.0, 0.4), (600.0, 0.3), (800.0, 0.2)];
        for (i, (freq, level)) in partials.into_iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                continue;
            };
            let start = t + i as f64 * 0.05;
            let peak = vol * level;

            gain.gain().set_value_at_time(0.0, start).ok();
            gain.gain().linear_ramp_to_value_at_time(peak, start + 0.1).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(peak * 0.5, start + 0.5)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 3.0)
                .ok();
            osc.frequency().set_value_at_time(freq, start).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(freq * 0.95, start + 2.0)
                .ok();

            osc.start_with_when(start).ok();
            osc.stop_with_when(start + 3.0).ok();
        }
    }
}

impl EventSink for AudioManager {
    fn on_tile_crossed(&mut self, _tile: IVec2, note: u8) {
        self.play(SoundEffect::Step(note));
    }

    fn on_trapped(&mut self) {
        self.play(SoundEffect::Trapped);
    }

    fn on_won(&mut self) {
        self.play(SoundEffect::Won);
    }

    fn on_shot(&mut self) {
        self.play(SoundEffect::Hit);
    }

    fn on_lost(&mut self) {
        self.play(SoundEffect::Lost);
    }

    fn on_enemy_shoot(&mut self, _enemy_id: u32) {
        self.play(SoundEffect::EnemyShot);
    }
}
