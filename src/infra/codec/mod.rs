//! Binary-to-text codecs applied to CAN payloads.
pub mod base64;
pub mod traits;
