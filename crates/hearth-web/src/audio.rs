//! Procedural crackling-fire audio: a continuous low rumble plus short
//! noise-burst crackles at randomized intervals.
//!
//! `start` is idempotent; `stop` closes the context and releases the output
//! device. Synthesis uses a deterministic xorshift stream rather than the
//! scene RNG so audio timing never perturbs placement reproducibility.

use web_sys as web;

const RUMBLE_SECONDS: f32 = 2.0;
const RUMBLE_CUTOFF_HZ: f32 = 110.0;
const RUMBLE_GAIN: f32 = 0.35;
const MASTER_GAIN: f32 = 0.5;
// Crackle scheduling window, milliseconds.
const CRACKLE_MIN_MS: f64 = 70.0;
const CRACKLE_MAX_MS: f64 = 350.0;

pub struct CrackleAudio {
    ctx: Option<web::AudioContext>,
    master: Option<web::GainNode>,
    next_crackle_ms: f64,
    seed: u32,
}

impl CrackleAudio {
    pub fn new() -> Self {
        Self {
            ctx: None,
            master: None,
            next_crackle_ms: 0.0,
            seed: 0x1234_ABCD,
        }
    }

    #[inline]
    fn next_unit(&mut self) -> f32 {
        let mut x = self.seed;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.seed = x;
        x as f32 / u32::MAX as f32
    }

    pub fn is_running(&self) -> bool {
        self.ctx.is_some()
    }

    /// Begin the rumble and crackle scheduling. Safe to call repeatedly;
    /// extra calls are ignored.
    pub fn start(&mut self, now_ms: f64) {
        if self.ctx.is_some() {
            return;
        }
        let ctx = match web::AudioContext::new() {
            Ok(c) => c,
            Err(e) => {
                log::error!("AudioContext error: {:?}", e);
                return;
            }
        };
        let master = match web::GainNode::new(&ctx) {
            Ok(g) => g,
            Err(e) => {
                log::error!("master GainNode error: {:?}", e);
                return;
            }
        };
        master.gain().set_value(MASTER_GAIN);
        let _ = master.connect_with_audio_node(&ctx.destination());

        if let Err(e) = self.build_rumble(&ctx, &master) {
            log::error!("rumble init error: {:?}", e);
        }

        self.next_crackle_ms = now_ms + self.crackle_interval();
        self.ctx = Some(ctx);
        self.master = Some(master);
        log::info!("crackle audio started");
    }

    /// Stop playback and release the output device.
    pub fn stop(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
            log::info!("crackle audio stopped");
        }
        self.master = None;
    }

    /// Called once per frame; fires pending crackle bursts.
    pub fn tick(&mut self, now_ms: f64) {
        if self.ctx.is_none() {
            return;
        }
        while now_ms >= self.next_crackle_ms {
            self.spawn_crackle();
            self.next_crackle_ms += self.crackle_interval();
        }
    }

    #[inline]
    fn crackle_interval(&mut self) -> f64 {
        CRACKLE_MIN_MS + self.next_unit() as f64 * (CRACKLE_MAX_MS - CRACKLE_MIN_MS)
    }

    /// Looped filtered-noise bed under the fire.
    fn build_rumble(
        &mut self,
        ctx: &web::AudioContext,
        master: &web::GainNode,
    ) -> Result<(), wasm_bindgen::JsValue> {
        let sr = ctx.sample_rate();
        let len = (sr * RUMBLE_SECONDS) as u32;
        let buffer = ctx.create_buffer(1, len, sr)?;
        let mut samples = vec![0.0_f32; len as usize];
        for s in samples.iter_mut() {
            *s = self.next_unit() * 2.0 - 1.0;
        }
        buffer.copy_to_channel(&mut samples, 0)?;

        let src = web::AudioBufferSourceNode::new(ctx)?;
        src.set_buffer(Some(&buffer));
        src.set_loop(true);

        let lowpass = web::BiquadFilterNode::new(ctx)?;
        lowpass.set_type(web::BiquadFilterType::Lowpass);
        lowpass.frequency().set_value(RUMBLE_CUTOFF_HZ);

        let gain = web::GainNode::new(ctx)?;
        gain.gain().set_value(RUMBLE_GAIN);

        src.connect_with_audio_node(&lowpass)?;
        lowpass.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(master)?;
        src.start()?;
        Ok(())
    }

    /// One short bandpassed noise burst with a baked-in decay envelope.
    fn spawn_crackle(&mut self) {
        let (ctx, master) = match (&self.ctx, &self.master) {
            (Some(c), Some(m)) => (c.clone(), m.clone()),
            _ => return,
        };
        let sr = ctx.sample_rate();
        let seconds = 0.03 + self.next_unit() * 0.06;
        let len = ((sr * seconds) as u32).max(8);
        let buffer = match ctx.create_buffer(1, len, sr) {
            Ok(b) => b,
            Err(_) => return,
        };
        let mut samples = vec![0.0_f32; len as usize];
        let inv = 1.0 / len as f32;
        for (i, s) in samples.iter_mut().enumerate() {
            let n = self.next_unit() * 2.0 - 1.0;
            let decay = 1.0 - i as f32 * inv;
            *s = n * decay * decay;
        }
        if buffer.copy_to_channel(&mut samples, 0).is_err() {
            return;
        }

        let freq = 1400.0 + self.next_unit() * 1800.0;
        let level = 0.15 + self.next_unit() * 0.3;
        let src = match web::AudioBufferSourceNode::new(&ctx) {
            Ok(s) => s,
            Err(_) => return,
        };
        src.set_buffer(Some(&buffer));
        let bandpass = match web::BiquadFilterNode::new(&ctx) {
            Ok(f) => f,
            Err(_) => return,
        };
        bandpass.set_type(web::BiquadFilterType::Bandpass);
        bandpass.frequency().set_value(freq);
        bandpass.q().set_value(0.8);
        let gain = match web::GainNode::new(&ctx) {
            Ok(g) => g,
            Err(_) => return,
        };
        gain.gain().set_value(level);

        let _ = src.connect_with_audio_node(&bandpass);
        let _ = bandpass.connect_with_audio_node(&gain);
        let _ = gain.connect_with_audio_node(&master);
        let _ = src.start();
    }
}

impl Default for CrackleAudio {
    fn default() -> Self {
        Self::new()
    }
}
