//! Runs the modulation driver against a channel engine and prints the modulated voice
//! position of a fake granular engine thread.

use std::{sync::Arc, thread, time::Duration};

use granular_autoplay::{
    engine::{ChannelEngine, EngineMessage},
    DriverOptions, Error, HostEvent, ModulationDriver,
};

// -------------------------------------------------------------------------------------------------

/// Duration of the buffer in our fake engine
const BUFFER_DURATION: Duration = Duration::from_secs(4);
/// How long to run each modulation mode
const MODE_DURATION: Duration = Duration::from_secs(3);
/// Print every n-th voice update only
const PRINT_EVERY: usize = 25;

// -------------------------------------------------------------------------------------------------

fn main() -> Result<(), Error> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()
        .expect("Failed to set logger");

    let (engine, messages) = ChannelEngine::bounded(1024);

    // Fake engine thread: consumes commands like an audio thread would
    let engine_thread = thread::spawn(move || {
        let mut update_count = 0;
        for message in messages {
            match message {
                EngineMessage::SetGlobalParameters(_) => (),
                EngineMessage::StartVoice {
                    voice_id,
                    parameters,
                } => println!(
                    "start '{voice_id}' at position {:.3}, volume {:.2}",
                    parameters.position, parameters.volume
                ),
                EngineMessage::UpdateVoice {
                    voice_id,
                    parameters,
                } => {
                    if update_count % PRINT_EVERY == 0 {
                        println!(
                            "update '{voice_id}' {}",
                            position_bar(parameters.position)
                        );
                    }
                    update_count += 1;
                }
                EngineMessage::StopVoice { voice_id } => println!("stop '{voice_id}'"),
            }
        }
        update_count
    });

    let driver = ModulationDriver::with_options(
        Arc::new(engine),
        DriverOptions::default().noise_time_scale(1000.0),
    )?;

    // a buffer got loaded
    driver.handle_event(HostEvent::BufferLoading)?;
    driver.handle_event(HostEvent::BufferChanged {
        duration: BUFFER_DURATION,
    })?;

    // press play
    let state = driver.handle_event(HostEvent::TogglePlayback)?;
    println!("\n=== {} mode ===", state.mode_label());
    thread::sleep(MODE_DURATION);

    // switch modes while running
    let state = driver.handle_event(HostEvent::ToggleMode)?;
    println!("\n=== {} mode ===", state.mode_label());
    thread::sleep(MODE_DURATION);

    // press stop
    let state = driver.handle_event(HostEvent::TogglePlayback)?;
    println!("\nPress '{}' to continue...", state.playback_label());

    // closes the message channel
    drop(driver);
    let update_count = engine_thread.join().expect("Engine thread panicked");
    println!("Received {update_count} voice updates");

    Ok(())
}

fn position_bar(position: f32) -> String {
    const WIDTH: usize = 60;
    let column = (position * (WIDTH - 1) as f32).round() as usize;
    (0..WIDTH)
        .map(|index| if index == column { '|' } else { '.' })
        .collect()
}
