//! Member portal core for a lending cooperative.
//!
//! The crate prices loans with a fixed member/non-member rate policy, computes level monthly
//! payments, drives the loan application form through its submission states, and exposes the
//! whole flow over an axum router.

pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;
pub mod workflows;
