//! Application layer containing the reconciliation pipeline.
//!
//! Each stage is a pure function over the domain model: `evidence` groups
//! attempts, `inference` reads a bucket, `manual` reads the declared
//! configuration, `fusion` combines the two, `matrix` assembles the sections
//! and `summary` tallies them. `ReconciliationEngine` hosts the pipeline on top
//! of the Record Store ports.

pub mod engine;
pub mod evidence;
pub mod fusion;
pub mod inference;
pub mod manual;
pub mod matrix;
pub mod summary;
