pub mod sampler_error;
#[cfg(target_os = "espidf")]
pub(crate) mod error_text_parser;
