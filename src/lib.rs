mod microcontroller_src;
mod utils;

#[cfg(not(target_os = "espidf"))]
pub mod characterization;
pub mod config;
pub mod gpio;
pub mod sampler;
pub mod serial;
pub mod simulation;
pub mod voltage;

#[cfg(target_os = "espidf")]
pub use microcontroller_src::Microcontroller;
pub use microcontroller_src::peripherals;
pub use utils::sampler_error;
