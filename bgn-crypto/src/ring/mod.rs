//! # Ring Crypto Module
//!
//! Provides the [`Ring`] struct for the prime field F_p and the
//! [`QuadraticExtension`] F_{p²} the pairing engine maps into.

pub mod math;
pub mod quadratic;

pub use math::Ring;
pub use quadratic::{Fp2, QuadraticExtension};
