use std::time::Duration;

use crate::{modulation::Modulator, Error};

// -------------------------------------------------------------------------------------------------

/// Options to configure a [`ModulationDriver`](super::ModulationDriver).
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// By default "autoPlay". Name of the single engine voice the driver controls.
    pub voice_id: String,
    /// By default 1.0. Global engine pitch, which gets reasserted with every tick.
    pub pitch: f32,
    /// By default 0.5. Voice volume in range \[0, 1\].
    pub volume: f32,
    /// By default 4ms. Delay between two modulation ticks. When zero, the modulation
    /// thread only yields between ticks.
    pub tick_interval: Duration,
    /// By default 10000. Clock milliseconds per unit in the noise field: larger values
    /// make the noise modulation wander more slowly.
    pub noise_time_scale: f64,
    /// By default 1000. Offset of the second, decorrelated noise sample.
    pub noise_offset: f64,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            voice_id: Self::DEFAULT_VOICE_ID.to_string(),
            pitch: 1.0,
            volume: Modulator::DEFAULT_VOLUME,
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            noise_time_scale: Modulator::DEFAULT_NOISE_TIME_SCALE,
            noise_offset: Modulator::DEFAULT_NOISE_OFFSET,
        }
    }
}

impl DriverOptions {
    pub const DEFAULT_VOICE_ID: &'static str = "autoPlay";
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(4);

    pub fn voice_id<S: Into<String>>(mut self, voice_id: S) -> Self {
        self.voice_id = voice_id.into();
        self
    }

    pub fn pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn noise_time_scale(mut self, time_scale: f64) -> Self {
        self.noise_time_scale = time_scale;
        self
    }

    pub fn noise_offset(mut self, offset: f64) -> Self {
        self.noise_offset = offset;
        self
    }

    /// Validate all parameters. Returns Error::ParameterError on errors.
    pub fn validate(&self) -> Result<(), Error> {
        if self.voice_id.is_empty() {
            return Err(Error::ParameterError(
                "driver options 'voice_id' must not be empty".to_string(),
            ));
        }
        if !(self.pitch > 0.0 && self.pitch.is_finite()) {
            return Err(Error::ParameterError(format!(
                "driver options 'pitch' value is '{}'",
                self.pitch
            )));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(Error::ParameterError(format!(
                "driver options 'volume' value is '{}'",
                self.volume
            )));
        }
        if !(self.noise_time_scale > 0.0 && self.noise_time_scale.is_finite()) {
            return Err(Error::ParameterError(format!(
                "driver options 'noise_time_scale' value is '{}'",
                self.noise_time_scale
            )));
        }
        if !self.noise_offset.is_finite() {
            return Err(Error::ParameterError(format!(
                "driver options 'noise_offset' value is '{}'",
                self.noise_offset
            )));
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
