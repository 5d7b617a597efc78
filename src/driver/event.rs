use std::time::Duration;

use crate::modulation::ModulationMode;

// -------------------------------------------------------------------------------------------------

/// Events from the host application, which a [`ModulationDriver`](super::ModulationDriver)
/// can consume via `handle_event`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// A new buffer starts loading into the engine. Stops the driver.
    BufferLoading,
    /// A new buffer with the given duration became active in the engine.
    BufferChanged { duration: Duration },
    /// Start or stop modulation, e.g. from a play button or key press.
    TogglePlayback,
    /// Switch between the modulation modes.
    ToggleMode,
}

// -------------------------------------------------------------------------------------------------

/// Driver state after an event got handled, e.g. to update UI labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    pub running: bool,
    pub mode: ModulationMode,
}

impl PlaybackState {
    /// Label for a play/stop toggle button.
    pub fn playback_label(&self) -> &'static str {
        if self.running {
            "Stop"
        } else {
            "Play"
        }
    }

    /// Label for a mode switch button.
    pub fn mode_label(&self) -> &'static str {
        self.mode.label()
    }
}
