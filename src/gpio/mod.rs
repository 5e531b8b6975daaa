mod analog_source;
#[cfg(target_os = "espidf")]
mod analog_in;

pub use analog_source::*;
#[cfg(target_os = "espidf")]
pub use analog_in::*;
