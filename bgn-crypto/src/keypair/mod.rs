//! # Keypair Module
//!
//! Key generation parameters, the [`PublicKey`] / [`SecretKey`] pair and the
//! generator that produces them.

pub mod keys;
pub mod params;

pub use keys::{PublicKey, SecretKey, generate_keypair};
pub use params::{KeyGenParams, PolyEncodingParams};
