#![doc = include_str!("../README.md")]

// private mods (will be partly re-exported)
mod driver;
mod error;
mod modulation;

// public, flat re-exports
pub use error::Error;

pub use driver::{DriverOptions, HostEvent, ModulationDriver, PlaybackState};

pub use modulation::{ModulationMode, Modulator, NoiseSample};

// public mods
pub mod engine;
pub mod noise;
pub mod utils;
