//! The modulation driver: start/stop lifecycle and the tick loop of a single granular voice.

mod event;
mod options;

pub use event::{HostEvent, PlaybackState};
pub use options::DriverOptions;

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering},
        Arc, Mutex, PoisonError,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::{
    engine::{GlobalParameters, GranularEngine},
    modulation::{ModulationMode, Modulator},
    noise::{NoiseSource, SimplexNoise},
    utils::clock::{Clock, SystemClock},
    Error,
};

// -------------------------------------------------------------------------------------------------

/// State which is shared between the driver and its modulation thread.
struct DriverShared {
    engine: Arc<dyn GranularEngine>,
    clock: Arc<dyn Clock>,
    modulator: Modulator,
    options: DriverOptions,
    running: AtomicBool,
    /// Incremented with every start. A loop only keeps running while its generation is
    /// the current one.
    generation: AtomicU64,
    mode: AtomicU8,
    /// f64 bits of the current buffer duration in milliseconds.
    buffer_duration_ms: AtomicU64,
}

impl DriverShared {
    fn global_parameters(&self) -> GlobalParameters {
        GlobalParameters {
            pitch: self.options.pitch,
        }
    }

    fn mode(&self) -> ModulationMode {
        ModulationMode::from_repr(self.mode.load(Ordering::Acquire)).unwrap_or_default()
    }

    fn buffer_duration_ms(&self) -> f64 {
        f64::from_bits(self.buffer_duration_ms.load(Ordering::Acquire))
    }

    fn is_current(&self, generation: u64) -> bool {
        self.running.load(Ordering::Acquire)
            && self.generation.load(Ordering::Acquire) == generation
    }

    /// Run a single modulation step: reassert global parameters and update the voice.
    fn tick(&self) {
        // the engine's pitch may have been changed by others in the meantime
        self.engine.set_global_parameters(self.global_parameters());

        let parameters = self.modulator.parameters(
            self.mode(),
            self.clock.now_ms(),
            self.buffer_duration_ms(),
        );
        self.engine.update_voice(&self.options.voice_id, parameters);
    }

    /// Tick loop of the modulation thread. Runs until the driver got stopped or restarted.
    fn run(&self, generation: u64, wake: Receiver<()>) {
        let interval = self.options.tick_interval;
        while self.is_current(generation) {
            if interval.is_zero() {
                thread::yield_now();
            } else {
                match wake.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => (),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        // woken up by stop: check state below
                    }
                }
            }
            if !self.is_current(generation) {
                break;
            }
            self.tick();
        }
        log::debug!("Modulation loop #{generation} finished");
    }
}

// -------------------------------------------------------------------------------------------------

/// Handle to a running modulation thread.
struct ModulationThread {
    thread: JoinHandle<()>,
    wake: Sender<()>,
}

impl ModulationThread {
    fn join(self) {
        drop(self.wake);
        if let Err(err) = self.thread.join() {
            log::error!(
                "Modulation thread panicked: {}",
                panic_message::panic_message(&err)
            );
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Continuously modulates position and volume of a single, named granular engine voice.
///
/// Once started, the driver repeatedly computes new voice parameters with the selected
/// [`ModulationMode`] and pushes them to the engine from a dedicated modulation thread:
/// - [`ModulationMode::Noise`]: the position wanders organically through the buffer.
/// - [`ModulationMode::Linear`]: the position sweeps through the buffer, synchronized to
///   the clock. Needs a valid buffer duration, see [`Self::set_buffer_duration`].
///
/// Ticks never overlap. Stopping is observed at the next tick boundary, so one tick that
/// is already in flight may still update the voice after [`Self::stop`] returned.
pub struct ModulationDriver {
    shared: Arc<DriverShared>,
    thread: Mutex<Option<ModulationThread>>,
}

impl ModulationDriver {
    /// Create a new driver with default options, a randomly seeded noise field and the
    /// system clock.
    pub fn new(engine: Arc<dyn GranularEngine>) -> Self {
        Self::create(
            engine,
            DriverOptions::default(),
            Arc::new(SimplexNoise::random()),
            Arc::new(SystemClock::new()),
        )
    }

    /// Create a new driver with the given options, a randomly seeded noise field and the
    /// system clock.
    pub fn with_options(
        engine: Arc<dyn GranularEngine>,
        options: DriverOptions,
    ) -> Result<Self, Error> {
        Self::with_sources(
            engine,
            options,
            Arc::new(SimplexNoise::random()),
            Arc::new(SystemClock::new()),
        )
    }

    /// Create a new driver with custom noise and time sources.
    pub fn with_sources(
        engine: Arc<dyn GranularEngine>,
        options: DriverOptions,
        noise: Arc<dyn NoiseSource>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, Error> {
        options.validate()?;
        Ok(Self::create(engine, options, noise, clock))
    }

    fn create(
        engine: Arc<dyn GranularEngine>,
        options: DriverOptions,
        noise: Arc<dyn NoiseSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let modulator = Modulator::new(noise)
            .with_noise_time_scale(options.noise_time_scale)
            .with_noise_offset(options.noise_offset)
            .with_volume(options.volume);
        let shared = Arc::new(DriverShared {
            engine,
            clock,
            modulator,
            options,
            running: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            mode: AtomicU8::new(ModulationMode::default() as u8),
            buffer_duration_ms: AtomicU64::new(0.0f64.to_bits()),
        });
        Self {
            shared,
            thread: Mutex::new(None),
        }
    }

    /// The driver's options.
    pub fn options(&self) -> &DriverOptions {
        &self.shared.options
    }

    /// True while the modulation loop is active.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Currently selected modulation mode.
    pub fn mode(&self) -> ModulationMode {
        self.shared.mode()
    }

    /// Switch between noise and linear modulation. Takes effect with the next tick.
    /// Returns the new mode.
    pub fn toggle_mode(&self) -> ModulationMode {
        let toggle = |repr: u8| {
            ModulationMode::from_repr(repr)
                .unwrap_or_default()
                .toggled()
        };
        let previous = self
            .shared
            .mode
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |repr| {
                Some(toggle(repr) as u8)
            })
            .unwrap_or_else(|repr| repr);
        let mode = toggle(previous);
        log::debug!("Modulation mode changed to '{mode}'");
        mode
    }

    /// Duration of the current engine buffer in milliseconds.
    pub fn buffer_duration_ms(&self) -> f64 {
        self.shared.buffer_duration_ms()
    }

    /// Set the duration of the buffer which is currently active in the engine, in seconds.
    /// Must be called whenever the engine's buffer changed. Invalid (negative or non finite)
    /// durations are rejected and keep the previous duration.
    pub fn set_buffer_duration(&self, duration_secs: f64) -> Result<(), Error> {
        if !(duration_secs >= 0.0 && duration_secs.is_finite()) {
            return Err(Error::ParameterError(format!(
                "buffer duration must be a non-negative number of seconds, but is '{duration_secs}'"
            )));
        }
        let duration_ms = duration_secs * 1000.0;
        self.shared
            .buffer_duration_ms
            .store(duration_ms.to_bits(), Ordering::Release);
        log::debug!("Buffer duration changed to {duration_ms}ms");
        Ok(())
    }

    /// Start the voice and the modulation loop. Does nothing when already running.
    pub fn start(&self) -> Result<(), Error> {
        let mut worker = self.thread.lock().unwrap_or_else(PoisonError::into_inner);
        if self.shared.running.load(Ordering::Acquire) {
            return Ok(());
        }
        // a previous loop is already stopped: wait until it finished its last tick
        if let Some(previous) = worker.take() {
            previous.join();
        }

        let shared = &self.shared;
        let generation = shared.generation.fetch_add(1, Ordering::AcqRel) + 1;
        shared.running.store(true, Ordering::Release);
        log::info!(
            "Starting modulation of voice '{}' in '{}' mode",
            shared.options.voice_id,
            shared.mode()
        );

        shared.engine.set_global_parameters(shared.global_parameters());
        let sample = shared.modulator.sample_noise(shared.clock.now_ms());
        shared.engine.start_voice(
            &shared.options.voice_id,
            shared.modulator.noise_parameters(sample),
        );

        // first tick runs immediately, all following ones in the modulation thread
        shared.tick();

        let (wake_sender, wake_receiver) = crossbeam_channel::bounded(1);
        let spawn_result = thread::Builder::new()
            .name("granular_autoplay".to_string())
            .spawn({
                let shared = Arc::clone(shared);
                move || shared.run(generation, wake_receiver)
            });
        match spawn_result {
            Ok(handle) => {
                *worker = Some(ModulationThread {
                    thread: handle,
                    wake: wake_sender,
                });
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to spawn modulation thread: {err}");
                shared.engine.stop_voice(&shared.options.voice_id);
                shared.running.store(false, Ordering::Release);
                Err(Error::from(err))
            }
        }
    }

    /// Stop the voice and the modulation loop. Always safe to call: the engine's voice
    /// gets stopped even when the driver is not running.
    pub fn stop(&self) {
        let worker = self.thread.lock().unwrap_or_else(PoisonError::into_inner);
        let shared = &self.shared;
        // cancel the loop first, so ticks can't continue while the engine stops the voice
        let was_running = shared.running.swap(false, Ordering::AcqRel);
        shared.engine.stop_voice(&shared.options.voice_id);
        if was_running {
            log::info!("Stopped modulation of voice '{}'", shared.options.voice_id);
        }
        if let Some(worker) = worker.as_ref() {
            // interrupt the tick delay; a full queue already has a pending wake up
            let _ = worker.wake.try_send(());
        }
    }

    /// Apply an event from the host application and return the resulting state.
    pub fn handle_event(&self, event: HostEvent) -> Result<PlaybackState, Error> {
        match event {
            HostEvent::BufferLoading => self.stop(),
            HostEvent::BufferChanged { duration } => {
                self.set_buffer_duration(duration.as_secs_f64())?
            }
            HostEvent::TogglePlayback => {
                if self.is_running() {
                    self.stop();
                } else {
                    self.start()?;
                }
            }
            HostEvent::ToggleMode => {
                self.toggle_mode();
            }
        }
        Ok(self.playback_state())
    }

    /// Current running state and mode.
    pub fn playback_state(&self) -> PlaybackState {
        PlaybackState {
            running: self.is_running(),
            mode: self.mode(),
        }
    }

    /// Delay between two modulation ticks.
    pub fn tick_interval(&self) -> Duration {
        self.shared.options.tick_interval
    }
}

impl Drop for ModulationDriver {
    fn drop(&mut self) {
        if self.is_running() {
            self.stop();
        }
        let worker = self
            .thread
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            worker.join();
        }
    }
}

// -------------------------------------------------------------------------------------------------
