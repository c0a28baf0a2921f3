//! Audio cues via the Web Audio API
//!
//! Every cue is procedurally generated - no sample files. Cues are plain
//! data first: a [`Cue`] expands to a list of [`CueSpec`] layers that can be
//! built and inspected anywhere, and only the [`AudioEngine`] render path
//! touches the browser.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorType};

const MIN_HZ: f32 = 20.0;
const MAX_HZ: f32 = 12000.0;
const MIN_DURATION: f32 = 0.01;
const MAX_DURATION: f32 = 5.0;

/// Source waveform of one layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    /// White noise burst; frequency fields are ignored
    Noise,
}

#[cfg(target_arch = "wasm32")]
impl Waveform {
    fn osc_type(self) -> Option<OscillatorType> {
        match self {
            Waveform::Sine => Some(OscillatorType::Sine),
            Waveform::Square => Some(OscillatorType::Square),
            Waveform::Sawtooth => Some(OscillatorType::Sawtooth),
            Waveform::Triangle => Some(OscillatorType::Triangle),
            Waveform::Noise => None,
        }
    }
}

/// Gain shape over the layer's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainEnvelope {
    /// Immediate attack, exponential decay
    Pluck,
    /// Fade in, then decay
    Swell,
    /// Hold, then quick release
    Flat,
}

/// One renderable layer of a cue.
///
/// All parameters are clamped at construction so a spec is always safe to
/// hand to the audio graph: frequencies stay positive for the exponential
/// ramps, gain stays inside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueSpec {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub duration: f32,
    pub gain: f32,
    pub envelope: GainEnvelope,
    /// Offset from the cue's start, in seconds
    pub delay: f32,
}

impl CueSpec {
    /// A constant tone with a pluck envelope
    pub fn tone(waveform: Waveform, hz: f32, duration: f32, gain: f32) -> Self {
        let hz = hz.clamp(MIN_HZ, MAX_HZ);
        Self {
            waveform,
            start_hz: hz,
            end_hz: hz,
            duration: duration.clamp(MIN_DURATION, MAX_DURATION),
            gain: gain.clamp(0.0, 1.0),
            envelope: GainEnvelope::Pluck,
            delay: 0.0,
        }
    }

    /// A white noise burst with a pluck envelope
    pub fn noise(duration: f32, gain: f32) -> Self {
        Self {
            waveform: Waveform::Noise,
            start_hz: MIN_HZ,
            end_hz: MIN_HZ,
            duration: duration.clamp(MIN_DURATION, MAX_DURATION),
            gain: gain.clamp(0.0, 1.0),
            envelope: GainEnvelope::Pluck,
            delay: 0.0,
        }
    }

    /// Sweep the frequency to `hz` over the layer's duration
    pub fn ramp_to(mut self, hz: f32) -> Self {
        self.end_hz = hz.clamp(MIN_HZ, MAX_HZ);
        self
    }

    pub fn shaped(mut self, envelope: GainEnvelope) -> Self {
        self.envelope = envelope;
        self
    }

    /// Start this layer `secs` after the cue begins
    pub fn delayed(mut self, secs: f32) -> Self {
        self.delay = secs.max(0.0);
        self
    }
}

/// Every sound the night can make
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// CRT warming up
    PowerOn,
    /// Terminal keystroke
    KeyClick,
    /// Memo filed
    PaperSlide,
    /// Seal lands on the contract
    StampThud,
    /// Marker dragged over a line
    RedactStroke,
    /// Folder going through the teeth
    ShredderGrind,
    /// Breaker lever seating
    BreakerClunk,
    /// Two-tone PA chime
    IntercomChime,
    /// Signal loss
    StaticBurst,
    /// Two low thumps
    Heartbeat,
    /// Something heavy against the door
    DoorThud,
    /// Metal dragged through its catch
    BoltScrape,
    /// Long fall in pitch for the stairwell
    Descend,
    /// Almost nothing, right at the ear
    Whisper,
    /// Overtime klaxon
    Alarm,
    /// Morning
    Sunrise,
}

impl Cue {
    /// Used by table-driven tests
    pub const ALL: [Cue; 16] = [
        Cue::PowerOn,
        Cue::KeyClick,
        Cue::PaperSlide,
        Cue::StampThud,
        Cue::RedactStroke,
        Cue::ShredderGrind,
        Cue::BreakerClunk,
        Cue::IntercomChime,
        Cue::StaticBurst,
        Cue::Heartbeat,
        Cue::DoorThud,
        Cue::BoltScrape,
        Cue::Descend,
        Cue::Whisper,
        Cue::Alarm,
        Cue::Sunrise,
    ];

    /// Expand to renderable layers
    pub fn specs(self) -> Vec<CueSpec> {
        use GainEnvelope::*;
        use Waveform::*;
        match self {
            Cue::PowerOn => vec![
                CueSpec::tone(Sawtooth, 50.0, 0.8, 0.3).ramp_to(60.0).shaped(Swell),
                CueSpec::tone(Sine, 1200.0, 0.15, 0.15).ramp_to(2400.0).delayed(0.6),
            ],
            Cue::KeyClick => vec![CueSpec::tone(Square, 2200.0, 0.03, 0.12)],
            Cue::PaperSlide => vec![CueSpec::noise(0.12, 0.08)],
            Cue::StampThud => vec![
                CueSpec::tone(Sine, 150.0, 0.12, 0.5).ramp_to(60.0),
                CueSpec::noise(0.05, 0.1),
            ],
            Cue::RedactStroke => vec![
                CueSpec::noise(0.18, 0.1).shaped(Flat),
                CueSpec::tone(Sawtooth, 90.0, 0.18, 0.12).shaped(Flat),
            ],
            Cue::ShredderGrind => vec![
                CueSpec::tone(Sawtooth, 120.0, 0.6, 0.3).ramp_to(80.0).shaped(Flat),
                CueSpec::tone(Square, 47.0, 0.6, 0.2).shaped(Flat),
                CueSpec::noise(0.6, 0.12).shaped(Flat),
            ],
            Cue::BreakerClunk => vec![
                CueSpec::tone(Sine, 80.0, 0.25, 0.5).ramp_to(40.0),
                CueSpec::tone(Square, 400.0, 0.2, 0.2).ramp_to(200.0),
            ],
            Cue::IntercomChime => vec![
                CueSpec::tone(Sine, 880.0, 0.25, 0.2),
                CueSpec::tone(Sine, 660.0, 0.3, 0.2).delayed(0.3),
            ],
            Cue::StaticBurst => vec![CueSpec::noise(0.35, 0.25)],
            Cue::Heartbeat => vec![
                CueSpec::tone(Sine, 55.0, 0.12, 0.45),
                CueSpec::tone(Sine, 50.0, 0.1, 0.35).delayed(0.28),
            ],
            Cue::DoorThud => vec![
                CueSpec::tone(Sine, 70.0, 0.3, 0.55).ramp_to(35.0),
                CueSpec::noise(0.08, 0.1),
            ],
            Cue::BoltScrape => vec![
                CueSpec::tone(Sawtooth, 140.0, 0.5, 0.22).ramp_to(90.0).shaped(Flat),
                CueSpec::noise(0.5, 0.1).shaped(Flat),
            ],
            Cue::Descend => vec![CueSpec::tone(Sine, 300.0, 0.8, 0.4).ramp_to(20.0)],
            Cue::Whisper => vec![
                CueSpec::noise(0.7, 0.06).shaped(Swell),
                CueSpec::tone(Sine, 210.0, 0.7, 0.05).ramp_to(190.0).shaped(Swell),
            ],
            Cue::Alarm => vec![
                CueSpec::tone(Square, 620.0, 0.18, 0.25).shaped(Flat),
                CueSpec::tone(Square, 620.0, 0.18, 0.25).shaped(Flat).delayed(0.25),
            ],
            Cue::Sunrise => vec![
                CueSpec::tone(Triangle, 400.0, 0.4, 0.3),
                CueSpec::tone(Triangle, 500.0, 0.4, 0.3).delayed(0.1),
                CueSpec::tone(Triangle, 600.0, 0.4, 0.3).delayed(0.2),
                CueSpec::tone(Triangle, 800.0, 0.5, 0.3).delayed(0.3),
            ],
        }
    }
}

/// Renders cues. Construction never fails; a missing or broken
/// `AudioContext` just means silence.
pub struct AudioEngine {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEngine {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        let ctx = {
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            ctx
        };
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume the context (browsers suspend it until a user gesture)
    pub fn resume(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Fire and forget. Playback failures are swallowed; a cue that cannot
    /// sound must never stall the scene that asked for it.
    pub fn play(&self, cue: Cue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        #[cfg(target_arch = "wasm32")]
        {
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for spec in cue.specs() {
                self.render(ctx, &spec, vol);
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        log::trace!("cue {:?} (headless, silent)", cue);
    }

    #[cfg(target_arch = "wasm32")]
    fn render(&self, ctx: &AudioContext, spec: &CueSpec, vol: f32) {
        let Ok(gain) = ctx.create_gain() else { return };
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        let t = ctx.current_time() + spec.delay as f64;
        let end = t + spec.duration as f64;
        let peak = vol * spec.gain;
        let g = gain.gain();
        match spec.envelope {
            GainEnvelope::Pluck => {
                g.set_value_at_time(peak, t).ok();
                g.exponential_ramp_to_value_at_time(0.01, end).ok();
            }
            GainEnvelope::Swell => {
                g.set_value_at_time(0.01, t).ok();
                g.linear_ramp_to_value_at_time(peak, t + spec.duration as f64 * 0.3).ok();
                g.exponential_ramp_to_value_at_time(0.01, end).ok();
            }
            GainEnvelope::Flat => {
                g.set_value_at_time(peak, t).ok();
                g.set_value_at_time(peak, t + spec.duration as f64 * 0.8).ok();
                g.exponential_ramp_to_value_at_time(0.01, end).ok();
            }
        }

        match spec.waveform {
            Waveform::Noise => self.render_noise(ctx, &gain, spec, t),
            _ => self.render_tone(ctx, &gain, spec, t),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn render_tone(&self, ctx: &AudioContext, gain: &GainNode, spec: &CueSpec, t: f64) {
        let Some(osc_type) = spec.waveform.osc_type() else { return };
        let Ok(osc) = ctx.create_oscillator() else { return };

        osc.set_type(osc_type);
        if osc.connect_with_audio_node(gain).is_err() {
            return;
        }
        osc.frequency().set_value_at_time(spec.start_hz, t).ok();
        if spec.end_hz != spec.start_hz {
            osc.frequency()
                .exponential_ramp_to_value_at_time(spec.end_hz, t + spec.duration as f64)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + spec.duration as f64 + 0.05).ok();
    }

    #[cfg(target_arch = "wasm32")]
    fn render_noise(&self, ctx: &AudioContext, gain: &GainNode, spec: &CueSpec, t: f64) {
        let sample_rate = ctx.sample_rate();
        let len = ((spec.duration * sample_rate) as u32).max(1);
        let Ok(buffer) = ctx.create_buffer(1, len, sample_rate) else { return };

        let mut samples = vec![0.0f32; len as usize];
        for s in samples.iter_mut() {
            *s = js_sys::Math::random() as f32 * 2.0 - 1.0;
        }
        if buffer.copy_to_channel(&mut samples, 0).is_err() {
            return;
        }

        let Ok(src) = ctx.create_buffer_source() else { return };
        src.set_buffer(Some(&buffer));
        if src.connect_with_audio_node(gain).is_err() {
            return;
        }
        src.start_with_when(t).ok();
        src.stop_with_when(t + spec.duration as f64).ok();
    }
}
