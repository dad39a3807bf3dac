//! Adapters between the engine and the outside world: CSV attempt input,
//! JSON configuration input, and CSV / text / JSON matrix output.

pub mod csv;
pub mod json;
pub mod text;
