//! Command interface of the external granular synthesis engine.

mod channel;
pub use channel::{ChannelEngine, EngineMessage};

// -------------------------------------------------------------------------------------------------

/// Engine wide parameters which apply to all voices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalParameters {
    /// Playback speed/pitch multiplier for all grains. 1.0 plays grains unaltered.
    pub pitch: f32,
}

impl Default for GlobalParameters {
    fn default() -> Self {
        Self { pitch: 1.0 }
    }
}

// -------------------------------------------------------------------------------------------------

/// Parameters of a single granular voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceParameters {
    /// Relative grain spawn position in the engine's buffer (0.0 - 1.0).
    pub position: f32,
    /// Voice volume (0.0 - 1.0).
    pub volume: f32,
}

// -------------------------------------------------------------------------------------------------

/// A granular synthesis engine, which is controlled by the modulation driver.
///
/// All commands are fire-and-forget: the driver never inspects results and never retries.
/// Faults must be reported through the engine's own channels. Calls may arrive from the
/// driver's modulation thread, so implementations must be shareable across threads.
///
/// Commands sent from within the driver's `start` and `stop` are issued while the driver
/// holds its lifecycle lock: calling `start` or `stop` from within these callbacks
/// deadlocks. State accessors such as `is_running` or `mode` are fine.
pub trait GranularEngine: Send + Sync {
    /// Set engine wide parameters.
    fn set_global_parameters(&self, parameters: GlobalParameters);

    /// Start a new named voice. Starting an already running voice is up to the engine.
    fn start_voice(&self, voice_id: &str, parameters: VoiceParameters);

    /// Update parameters of a started voice.
    fn update_voice(&self, voice_id: &str, parameters: VoiceParameters);

    /// Stop a named voice. Must be safe to call for voices which are not running.
    fn stop_voice(&self, voice_id: &str);
}
