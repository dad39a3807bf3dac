//! Reconciles crowdsourced payment-terminal attempts with the terminal's
//! declared configuration into one supported / unsupported / unknown verdict
//! per capability, flagging contradictions for review.
//!
//! The pipeline lives in [`application`]; [`application::matrix::reconcile`]
//! is the pure entry point.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;

pub use application::engine::ReconciliationEngine;
pub use application::matrix::reconcile;
