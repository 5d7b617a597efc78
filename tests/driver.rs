use std::{sync::Arc, thread, time::Duration};

use granular_autoplay::{
    engine::{ChannelEngine, EngineMessage, GlobalParameters},
    noise::SimplexNoise,
    utils::clock::ManualClock,
    DriverOptions, ModulationDriver, ModulationMode,
};

// -------------------------------------------------------------------------------------------------

fn is_update(message: &EngineMessage) -> bool {
    matches!(message, EngineMessage::UpdateVoice { .. })
}

fn is_stop(message: &EngineMessage) -> bool {
    matches!(message, EngineMessage::StopVoice { .. })
}

#[test]
fn modulates_until_stopped() {
    let (engine, receiver) = ChannelEngine::unbounded();
    let clock = Arc::new(ManualClock::new(0.0));
    let driver = ModulationDriver::with_sources(
        Arc::new(engine),
        DriverOptions::default().tick_interval(Duration::from_millis(1)),
        Arc::new(SimplexNoise::new(1234)),
        clock.clone(),
    )
    .unwrap();

    driver.start().unwrap();
    for _ in 0..20 {
        clock.advance(250.0);
        thread::sleep(Duration::from_millis(2));
    }
    driver.stop();
    assert!(!driver.is_running());
    drop(driver);

    let messages = receiver.try_iter().collect::<Vec<_>>();
    assert_eq!(
        messages[0],
        EngineMessage::SetGlobalParameters(GlobalParameters { pitch: 1.0 })
    );
    match &messages[1] {
        EngineMessage::StartVoice {
            voice_id,
            parameters,
        } => {
            assert_eq!(voice_id, "autoPlay");
            assert!((0.0..=1.0).contains(&parameters.position));
            assert_eq!(parameters.volume, 0.5);
        }
        other => panic!("expected a voice start, got {other:?}"),
    }

    // every update is preceded by a pitch reassertion. A stop may sneak in between the two
    // in the last, in-flight tick.
    let updates = messages.iter().filter(|m| is_update(m)).count();
    assert!(updates > 1, "expected several ticks, got {updates}");
    for (index, message) in messages.iter().enumerate().filter(|(_, m)| is_update(m)) {
        let previous = messages[..index].iter().rev().find(|m| !is_stop(m));
        assert_eq!(
            previous,
            Some(&EngineMessage::SetGlobalParameters(GlobalParameters {
                pitch: 1.0
            }))
        );
        if let EngineMessage::UpdateVoice { parameters, .. } = message {
            assert!((0.0..=1.0).contains(&parameters.position));
            assert_eq!(parameters.volume, 0.5);
        }
    }

    // at most one in-flight tick may follow the stop
    let stop_index = messages.iter().position(is_stop).unwrap();
    let late_updates = messages[stop_index..].iter().filter(|m| is_update(m)).count();
    assert!(late_updates <= 1);
}

#[test]
fn linear_sweep_follows_clock() {
    let (engine, receiver) = ChannelEngine::unbounded();
    let clock = Arc::new(ManualClock::new(2500.0));
    let driver = ModulationDriver::with_sources(
        Arc::new(engine),
        DriverOptions::default().tick_interval(Duration::from_secs(60)),
        Arc::new(SimplexNoise::new(1)),
        clock,
    )
    .unwrap();

    driver.set_buffer_duration(2.0).unwrap();
    assert_eq!(driver.toggle_mode(), ModulationMode::Linear);
    driver.start().unwrap();
    driver.stop();
    drop(driver);

    let positions = receiver
        .try_iter()
        .filter_map(|message| match message {
            EngineMessage::UpdateVoice { parameters, .. } => Some(parameters.position),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(positions, vec![0.25]);
}

#[test]
fn concurrent_start_and_stop() {
    let (engine, receiver) = ChannelEngine::unbounded();
    let driver = Arc::new(
        ModulationDriver::with_options(
            Arc::new(engine),
            DriverOptions::default().tick_interval(Duration::ZERO),
        )
        .unwrap(),
    );

    let handles = (0..4)
        .map(|index| {
            let driver = Arc::clone(&driver);
            thread::spawn(move || {
                for _ in 0..25 {
                    if index % 2 == 0 {
                        driver.start().unwrap();
                    } else {
                        driver.stop();
                    }
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }
    driver.stop();
    assert!(!driver.is_running());
    drop(driver);

    // every start is matched by at least one following stop
    let mut started = false;
    for message in receiver.try_iter() {
        match message {
            EngineMessage::StartVoice { .. } => {
                assert!(!started, "voice started twice without stopping");
                started = true;
            }
            EngineMessage::StopVoice { .. } => started = false,
            _ => (),
        }
    }
    assert!(!started);
}
