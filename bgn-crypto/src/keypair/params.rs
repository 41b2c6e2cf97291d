use crate::errors::BgnError;
use crate::poly::encoding::fixed_point_scale;

use serde::{Deserialize, Serialize};

/// Largest poly base a key may use. The public key holds a table of
/// `poly_base` group elements.
pub const MAX_POLY_BASE: u32 = 1 << 16;

/// Parameters used for encoding a message as a polynomial of per-digit ciphertexts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyEncodingParams {
    /// Base of the digit expansion; every coefficient encrypts one digit.
    pub poly_base: u32,
    /// Base of the fixed-point scale factor.
    pub fp_scale_base: u32,
    /// Largest tolerated error between a value and its fixed-point encoding.
    pub fp_precision: f64,
}

impl Default for PolyEncodingParams {
    fn default() -> Self {
        Self {
            poly_base: 3,
            fp_scale_base: 3,
            fp_precision: 0.0001,
        }
    }
}

impl PolyEncodingParams {
    pub fn try_with(
        poly_base: u32,
        fp_scale_base: u32,
        fp_precision: f64,
    ) -> Result<Self, BgnError> {
        let params = Self {
            poly_base,
            fp_scale_base,
            fp_precision,
        };
        params.validate()?;

        Ok(params)
    }

    pub fn validate(&self) -> Result<(), BgnError> {
        if !(2..=MAX_POLY_BASE).contains(&self.poly_base) {
            return Err(BgnError::InvalidParameters(format!(
                "Poly base must lie in [2, {}], got {}",
                MAX_POLY_BASE, self.poly_base
            )));
        }

        if self.fp_scale_base < 2 {
            return Err(BgnError::InvalidParameters(
                "Fixed point scale base must be >= 2".to_string(),
            ));
        }

        if !(self.fp_precision > 0.0 && self.fp_precision < 1.0) {
            return Err(BgnError::InvalidParameters(format!(
                "Fixed point precision must lie in (0, 1), got {}",
                self.fp_precision
            )));
        }
        fixed_point_scale(self.fp_scale_base, self.fp_precision)?;

        Ok(())
    }

    /// Validates the parameters together with the message space they encrypt
    /// into: every fresh digit must be decryptable.
    pub fn check_message_space(&self, message_space: u64) -> Result<(), BgnError> {
        if message_space == 0 {
            return Err(BgnError::InvalidParameters(
                "Message space must be > 0".to_string(),
            ));
        }

        self.validate()?;

        if u64::from(self.poly_base - 1) > message_space {
            return Err(BgnError::InvalidParameters(format!(
                "Every digit of base {} must fit in message space {}",
                self.poly_base, message_space
            )));
        }

        Ok(())
    }

    /// How many fresh encodings can be summed coefficient-wise before a
    /// coefficient may leave the message space.
    ///
    /// Each fresh digit has magnitude at most `poly_base − 1`, and no carries
    /// happen under encryption, so the sum of `k` encodings stays decryptable
    /// while `k·(poly_base − 1) ≤ message_space`. This is a contract on the
    /// caller and is not checked at runtime.
    pub fn max_safe_additions(&self, message_space: u64) -> u64 {
        message_space / u64::from(self.poly_base.saturating_sub(1).max(1))
    }
}

/// Everything key generation needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyGenParams {
    /// Size of `n = q1·q2` in bits, split evenly between the two primes.
    pub key_bits: usize,
    /// Largest plaintext magnitude decryption will search for.
    pub message_space: u64,
    pub poly: PolyEncodingParams,
    /// Skip re-blinding after homomorphic operations. This leaks equality of
    /// combined ciphertexts and must only be used when that is acceptable.
    pub deterministic: bool,
}

impl KeyGenParams {
    /// Creates a new KeyGenParams instance with the given parameters.
    pub fn try_with(
        key_bits: usize,
        message_space: u64,
        poly_base: u32,
        fp_scale_base: u32,
        fp_precision: f64,
        deterministic: bool,
    ) -> Result<Self, BgnError> {
        let params = Self {
            key_bits,
            message_space,
            poly: PolyEncodingParams {
                poly_base,
                fp_scale_base,
                fp_precision,
            },
            deterministic,
        };
        params.validate()?;

        Ok(params)
    }

    pub fn validate(&self) -> Result<(), BgnError> {
        if self.key_bits < 16 || self.key_bits % 2 != 0 {
            return Err(BgnError::InvalidKeySize(self.key_bits));
        }

        self.poly.check_message_space(self.message_space)
    }
}
