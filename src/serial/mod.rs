mod serial_operations;
#[cfg(target_os = "espidf")]
mod uart;

pub use serial_operations::*;
#[cfg(target_os = "espidf")]
pub use uart::*;
