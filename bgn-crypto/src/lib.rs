pub mod ciphertext;
pub mod codec;
pub mod decrypt;
pub mod errors;
pub mod keypair;
pub mod pairing;
pub mod poly;
pub mod preset;
pub mod ring;

pub use ciphertext::{Ciphertext, Level};
pub use decrypt::compute_decryption_preprocessing;
pub use errors::BgnError;
pub use keypair::{KeyGenParams, PolyEncodingParams, PublicKey, SecretKey, generate_keypair};
pub use poly::PolyCiphertext;
