use crossbeam_channel::{Receiver, Sender, TrySendError};

use super::{GlobalParameters, GranularEngine, VoiceParameters};

// -------------------------------------------------------------------------------------------------

/// Engine commands, as forwarded by the [`ChannelEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    SetGlobalParameters(GlobalParameters),
    StartVoice {
        voice_id: String,
        parameters: VoiceParameters,
    },
    UpdateVoice {
        voice_id: String,
        parameters: VoiceParameters,
    },
    StopVoice {
        voice_id: String,
    },
}

// -------------------------------------------------------------------------------------------------

/// A [`GranularEngine`] which forwards all commands as [`EngineMessage`]s to a channel.
///
/// Use this when the actual synthesis engine lives in some other thread, e.g. an audio
/// thread which drains the receiver at the start of each processed block.
#[derive(Clone)]
pub struct ChannelEngine {
    sender: Sender<EngineMessage>,
}

impl ChannelEngine {
    /// Create a new engine with an unbounded message queue.
    pub fn unbounded() -> (Self, Receiver<EngineMessage>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }

    /// Create a new engine with a bounded message queue. When the queue is full, new
    /// messages get dropped.
    pub fn bounded(capacity: usize) -> (Self, Receiver<EngineMessage>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self { sender }, receiver)
    }

    fn send(&self, message: EngineMessage) {
        match self.sender.try_send(message) {
            Ok(()) => (),
            Err(TrySendError::Full(message)) => {
                log::warn!("Engine message queue is full, dropping message: {message:?}");
            }
            Err(TrySendError::Disconnected(message)) => {
                log::debug!("Engine message receiver is gone, dropping message: {message:?}");
            }
        }
    }
}

impl GranularEngine for ChannelEngine {
    fn set_global_parameters(&self, parameters: GlobalParameters) {
        self.send(EngineMessage::SetGlobalParameters(parameters));
    }

    fn start_voice(&self, voice_id: &str, parameters: VoiceParameters) {
        self.send(EngineMessage::StartVoice {
            voice_id: voice_id.to_string(),
            parameters,
        });
    }

    fn update_voice(&self, voice_id: &str, parameters: VoiceParameters) {
        self.send(EngineMessage::UpdateVoice {
            voice_id: voice_id.to_string(),
            parameters,
        });
    }

    fn stop_voice(&self, voice_id: &str) {
        self.send(EngineMessage::StopVoice {
            voice_id: voice_id.to_string(),
        });
    }
}

// -------------------------------------------------------------------------------------------------
