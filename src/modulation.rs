//! Modulation strategies which produce voice position and volume from the current time.

use std::sync::Arc;

use crate::{engine::VoiceParameters, noise::NoiseSource, utils::map_range};

// -------------------------------------------------------------------------------------------------

/// Modulation strategy of a [`ModulationDriver`](crate::ModulationDriver).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::FromRepr,
)]
#[repr(u8)]
pub enum ModulationMode {
    /// Organic wandering through the buffer, driven by coherent noise.
    #[default]
    Noise = 0,
    /// Deterministic linear sweep through the buffer, locked to the clock.
    Linear = 1,
}

impl ModulationMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Noise => Self::Linear,
            Self::Linear => Self::Noise,
        }
    }

    /// Short display name for mode switches in UIs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Noise => "Auto",
            Self::Linear => "Linear",
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// A pair of noise samples, taken at decorrelated positions of the noise field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseSample {
    pub x: f64,
    /// Not consumed by any strategy yet.
    pub y: f64,
}

// -------------------------------------------------------------------------------------------------

/// Computes voice parameters for both modulation modes.
#[derive(Clone)]
pub struct Modulator {
    noise: Arc<dyn NoiseSource>,
    noise_time_scale: f64,
    noise_offset: f64,
    volume: f32,
}

impl Modulator {
    /// Divisor which converts clock milliseconds into noise field coordinates.
    pub const DEFAULT_NOISE_TIME_SCALE: f64 = 10000.0;
    /// Offset of the second noise sample, which decorrelates it from the first one.
    pub const DEFAULT_NOISE_OFFSET: f64 = 1000.0;
    /// Constant voice volume of all modes.
    pub const DEFAULT_VOLUME: f32 = 0.5;

    pub fn new(noise: Arc<dyn NoiseSource>) -> Self {
        Self {
            noise,
            noise_time_scale: Self::DEFAULT_NOISE_TIME_SCALE,
            noise_offset: Self::DEFAULT_NOISE_OFFSET,
            volume: Self::DEFAULT_VOLUME,
        }
    }

    pub fn with_noise_time_scale(mut self, time_scale: f64) -> Self {
        debug_assert!(time_scale > 0.0, "Invalid noise time scale");
        self.noise_time_scale = time_scale;
        self
    }

    pub fn with_noise_offset(mut self, offset: f64) -> Self {
        self.noise_offset = offset;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        debug_assert!((0.0..=1.0).contains(&volume), "Invalid volume");
        self.volume = volume;
        self
    }

    /// Sample the noise field at the given time.
    pub fn sample_noise(&self, time_ms: f64) -> NoiseSample {
        let t = time_ms / self.noise_time_scale;
        NoiseSample {
            x: self.noise.sample(t, 0.0),
            y: self.noise.sample(t + self.noise_offset, 0.0),
        }
    }

    /// Map a noise sample to voice parameters.
    pub fn noise_parameters(&self, sample: NoiseSample) -> VoiceParameters {
        let position = map_range(sample.x, -1.0, 1.0, 0.0, 1.0);
        VoiceParameters {
            position: Self::sanitize_position(position),
            volume: self.volume,
        }
    }

    /// Voice parameters of the [`ModulationMode::Noise`] strategy.
    pub fn noise(&self, time_ms: f64) -> VoiceParameters {
        self.noise_parameters(self.sample_noise(time_ms))
    }

    /// Voice parameters of the [`ModulationMode::Linear`] strategy. An empty buffer duration
    /// results in position 0.
    pub fn linear(&self, time_ms: f64, buffer_duration_ms: f64) -> VoiceParameters {
        let position = if buffer_duration_ms > 0.0 && buffer_duration_ms.is_finite() {
            let elapsed = time_ms.rem_euclid(buffer_duration_ms);
            map_range(elapsed, 0.0, buffer_duration_ms, 0.0, 1.0)
        } else {
            0.0
        };
        VoiceParameters {
            position: Self::sanitize_position(position),
            volume: self.volume,
        }
    }

    /// Voice parameters of the given mode.
    pub fn parameters(
        &self,
        mode: ModulationMode,
        time_ms: f64,
        buffer_duration_ms: f64,
    ) -> VoiceParameters {
        match mode {
            ModulationMode::Noise => self.noise(time_ms),
            ModulationMode::Linear => self.linear(time_ms, buffer_duration_ms),
        }
    }

    fn sanitize_position(position: f64) -> f32 {
        if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, 1.0) as f32
        }
    }
}

// -------------------------------------------------------------------------------------------------
