//! Binary wire formats for public keys and ciphertexts.
//!
//! Group elements travel as opaque bytes that only mean something inside the
//! pairing that produced them, so every decoder rebuilds (or borrows) that
//! pairing before touching element bytes. Secret keys have no wire format.

use crate::ciphertext::{Ciphertext, Level};
use crate::errors::BgnError;
use crate::keypair::{PolyEncodingParams, PublicKey};
use crate::pairing::{Group, Pairing};
use crate::poly::PolyCiphertext;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct PublicKeyWire {
    g: Vec<u8>,
    p: Vec<u8>,
    q: Vec<u8>,
    n: BigUint,
    message_space: u64,
    pairing_params: String,
    deterministic: bool,
    poly: PolyEncodingParams,
}

#[derive(Debug, Serialize, Deserialize)]
struct CiphertextWire {
    bytes: Vec<u8>,
    level: Level,
}

#[derive(Debug, Serialize, Deserialize)]
struct PolyCiphertextWire {
    coefficients: Vec<Vec<u8>>,
    degree: u64,
    scale_factor: u32,
    level: Level,
}

fn check_not_empty(data: &[u8]) -> Result<(), BgnError> {
    if data.is_empty() {
        return Err(BgnError::EmptyInput);
    }
    Ok(())
}

impl PublicKey {
    pub fn to_bytes(&self) -> Result<Vec<u8>, BgnError> {
        let curve = self.pairing.curve();
        let wire = PublicKeyWire {
            g: curve.to_bytes(&self.g),
            p: curve.to_bytes(&self.p),
            q: curve.to_bytes(&self.q),
            n: self.n.clone(),
            message_space: self.message_space,
            pairing_params: self.pairing.descriptor(),
            deterministic: self.deterministic,
            poly: self.poly.clone(),
        };

        Ok(bincode::serialize(&wire)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, BgnError> {
        check_not_empty(data)?;
        let wire: PublicKeyWire = bincode::deserialize(data)?;

        let pairing = Pairing::from_descriptor(&wire.pairing_params)?;
        if *pairing.params().group_order() != wire.n {
            return Err(BgnError::InvalidParameters(
                "Modulus does not match the pairing descriptor".to_string(),
            ));
        }
        wire.poly.check_message_space(wire.message_space)?;
        // both secret primes exceed 2M in any key this crate generates
        let floor = BigUint::from(wire.message_space) << 1u32;
        if wire.n <= &floor * &floor {
            return Err(BgnError::MessageSpaceTooLarge {
                message_space: wire.message_space,
            });
        }

        let g1 = pairing.g1();
        let g = pairing.curve().from_bytes(&wire.g)?;
        let p = g1.from_bytes(&wire.p)?;
        let q = g1.from_bytes(&wire.q)?;
        if g1.is_identity(&p) || g1.is_identity(&q) {
            return Err(BgnError::InvalidElement(
                "Generators must not be the identity".to_string(),
            ));
        }

        let public_key = PublicKey::assemble(
            pairing,
            g,
            p,
            q,
            wire.n,
            wire.message_space,
            wire.deterministic,
            wire.poly,
        );
        public_key.compute_encoding_table()?;

        Ok(public_key)
    }

    fn element_bytes(&self, ct: &Ciphertext) -> Vec<u8> {
        match ct {
            Ciphertext::L1(c) => self.pairing.g1().to_bytes(c),
            Ciphertext::L2(c) => self.pairing.gt().to_bytes(c),
        }
    }

    fn element_from_bytes(&self, bytes: &[u8], level: Level) -> Result<Ciphertext, BgnError> {
        match level {
            Level::L1 => Ok(Ciphertext::L1(self.pairing.g1().from_bytes(bytes)?)),
            Level::L2 => Ok(Ciphertext::L2(self.pairing.gt().from_bytes(bytes)?)),
        }
    }

    pub fn ciphertext_from_bytes(&self, data: &[u8]) -> Result<Ciphertext, BgnError> {
        check_not_empty(data)?;
        let wire: CiphertextWire = bincode::deserialize(data)?;

        self.element_from_bytes(&wire.bytes, wire.level)
    }

    pub fn poly_ciphertext_from_bytes(&self, data: &[u8]) -> Result<PolyCiphertext, BgnError> {
        check_not_empty(data)?;
        let wire: PolyCiphertextWire = bincode::deserialize(data)?;

        if wire.degree.checked_add(1) != Some(wire.coefficients.len() as u64) {
            return Err(BgnError::InvalidParameters(format!(
                "Degree {} does not match {} coefficients",
                wire.degree,
                wire.coefficients.len()
            )));
        }

        let coefficients = wire
            .coefficients
            .iter()
            .map(|bytes| self.element_from_bytes(bytes, wire.level))
            .collect::<Result<Vec<_>, _>>()?;

        PolyCiphertext::try_new(coefficients, wire.scale_factor)
    }
}

impl Ciphertext {
    /// Encodes the ciphertext for the pairing of `pk`.
    pub fn to_bytes(&self, pk: &PublicKey) -> Result<Vec<u8>, BgnError> {
        let wire = CiphertextWire {
            bytes: pk.element_bytes(self),
            level: self.level(),
        };

        Ok(bincode::serialize(&wire)?)
    }
}

impl PolyCiphertext {
    pub fn to_bytes(&self, pk: &PublicKey) -> Result<Vec<u8>, BgnError> {
        let wire = PolyCiphertextWire {
            coefficients: self.coefficients().iter().map(|c| pk.element_bytes(c)).collect(),
            degree: self.degree() as u64,
            scale_factor: self.scale_factor(),
            level: self.level(),
        };

        Ok(bincode::serialize(&wire)?)
    }
}
