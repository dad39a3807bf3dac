//! Domain model: attempts, the dimension catalog, declared configuration and
//! the resolved capability matrix, plus the Record Store ports.

pub mod attempt;
pub mod capability;
pub mod catalog;
pub mod config;
pub mod ports;
