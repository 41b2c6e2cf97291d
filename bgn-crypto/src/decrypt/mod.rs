//! # Decrypt Module
//!
//! Decryption strips the blinding factor by raising to `q1`, then recovers the
//! plaintext as a bounded discrete logarithm. Negative plaintexts land outside
//! the table and are recovered by decrypting the negated ciphertext.

pub mod dlog;

use crate::ciphertext::Ciphertext;
use crate::errors::BgnError;
use crate::keypair::{PublicKey, SecretKey};
use crate::pairing::{G1Element, Group, GtElement};

use dlog::DlogTable;

use num_bigint::BigInt;
use tracing::{debug, trace};

/// Discrete-log tables for both ciphertext levels, built once per key.
#[derive(Debug, Clone)]
pub struct DecryptionTables {
    /// `P^q1`
    l1: DlogTable<G1Element>,
    /// `e(P, P)^q1`
    l2: DlogTable<GtElement>,
    bound: u64,
}

impl DecryptionTables {
    pub fn bound(&self) -> u64 {
        self.bound
    }
}

impl SecretKey {
    /// Builds the per-level decryption tables for `pk`'s message space.
    ///
    /// Must run before the first [`SecretKey::decrypt`], and again whenever the
    /// message space changes.
    pub fn setup_decryption(&mut self, pk: &PublicKey) -> Result<(), BgnError> {
        let g1 = pk.pairing.g1();
        let gt = pk.pairing.gt();
        let bound = pk.message_space;

        let l1_base = g1.pow_uint(&pk.p, &self.key);
        let l2_base = gt.pow_uint(&pk.paired_generator()?, &self.key);

        self.tables = Some(DecryptionTables {
            l1: DlogTable::build(&g1, &l1_base, bound),
            l2: DlogTable::build(&gt, &l2_base, bound),
            bound,
        });

        debug!(message_space = bound, "built decryption tables");

        Ok(())
    }

    fn tables(&self, pk: &PublicKey) -> Result<&DecryptionTables, BgnError> {
        let tables = self.tables.as_ref().ok_or(BgnError::TablesNotPrecomputed)?;
        if tables.bound != pk.message_space {
            return Err(BgnError::StaleTables {
                built: tables.bound,
                expected: pk.message_space,
            });
        }
        Ok(tables)
    }

    /// Decrypts `ct`, returning a plaintext in `[-M, M]`.
    ///
    /// # Example
    ///
    /// ```
    /// # use bgn_crypto::{KeyGenParams, compute_decryption_preprocessing, generate_keypair};
    /// # use num_bigint::BigInt;
    /// let params = KeyGenParams::try_with(32, 100, 3, 3, 0.0001, false).unwrap();
    /// let (pk, mut sk) = generate_keypair(&params).unwrap();
    /// compute_decryption_preprocessing(&pk, &mut sk).unwrap();
    ///
    /// let a = pk.encrypt(&BigInt::from(6)).unwrap();
    /// let b = pk.encrypt(&BigInt::from(-7)).unwrap();
    /// assert_eq!(sk.decrypt(&pk.add(&a, &b).unwrap(), &pk).unwrap(), BigInt::from(-1));
    /// assert_eq!(sk.decrypt(&pk.mult(&a, &b).unwrap(), &pk).unwrap(), BigInt::from(-42));
    /// ```
    pub fn decrypt(&self, ct: &Ciphertext, pk: &PublicKey) -> Result<BigInt, BgnError> {
        let tables = self.tables(pk)?;

        if let Some(x) = self.recover(ct, pk, tables) {
            return Ok(BigInt::from(x));
        }

        trace!(level = ?ct.level(), "no match in table, retrying on the negated ciphertext");
        let negated = pk.neg(ct)?;
        if let Some(x) = self.recover(&negated, pk, tables) {
            return Ok(-BigInt::from(x));
        }

        Err(BgnError::DecryptionFailed(format!(
            "Plaintext is outside [-{}, {}] or the ciphertext is corrupted",
            tables.bound, tables.bound
        )))
    }

    /// Like [`SecretKey::decrypt`], but any failure decrypts to zero.
    ///
    /// A zero result is then indistinguishable from a failure. Prefer
    /// [`SecretKey::decrypt`] unless that is acceptable.
    pub fn decrypt_fail_safe(&self, ct: &Ciphertext, pk: &PublicKey) -> BigInt {
        self.decrypt(ct, pk).unwrap_or_default()
    }

    fn recover(&self, ct: &Ciphertext, pk: &PublicKey, tables: &DecryptionTables) -> Option<u64> {
        match ct {
            Ciphertext::L1(c) => {
                let g1 = pk.pairing.g1();
                let stripped = g1.pow_uint(c, &self.key);
                if g1.is_identity(&stripped) {
                    return Some(0);
                }
                tables.l1.solve(&g1, &stripped)
            }
            Ciphertext::L2(c) => {
                let gt = pk.pairing.gt();
                let stripped = gt.pow_uint(c, &self.key);
                if gt.is_identity(&stripped) {
                    return Some(0);
                }
                tables.l2.solve(&gt, &stripped)
            }
        }
    }
}

/// Free-function form of [`SecretKey::setup_decryption`].
pub fn compute_decryption_preprocessing(pk: &PublicKey, sk: &mut SecretKey) -> Result<(), BgnError> {
    sk.setup_decryption(pk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::{KeyGenParams, generate_keypair};

    fn keypair(message_space: u64) -> (PublicKey, SecretKey) {
        let params = KeyGenParams::try_with(64, message_space, 3, 3, 0.0001, false).unwrap();
        let (pk, mut sk) = generate_keypair(&params).unwrap();
        compute_decryption_preprocessing(&pk, &mut sk).unwrap();
        (pk, sk)
    }

    #[test]
    fn test_decrypt_needs_tables() -> Result<(), BgnError> {
        let params = KeyGenParams::try_with(64, 100, 3, 3, 0.0001, false)?;
        let (pk, sk) = generate_keypair(&params)?;
        let ct = pk.encrypt(&BigInt::from(1))?;

        assert!(matches!(sk.decrypt(&ct, &pk), Err(BgnError::TablesNotPrecomputed)));
        Ok(())
    }

    #[test]
    fn test_stale_tables_are_rejected() -> Result<(), BgnError> {
        let (mut pk, sk) = keypair(100);
        let ct = pk.encrypt(&BigInt::from(1))?;
        pk.message_space = 200;

        assert!(matches!(
            sk.decrypt(&ct, &pk),
            Err(BgnError::StaleTables { built: 100, expected: 200 })
        ));
        Ok(())
    }

    #[test]
    fn test_round_trip_across_message_space() -> Result<(), BgnError> {
        let (pk, sk) = keypair(100);
        for x in [-100, -57, -1, 0, 1, 42, 99, 100] {
            let x = BigInt::from(x);
            assert_eq!(sk.decrypt(&pk.encrypt(&x)?, &pk)?, x);
            assert_eq!(sk.decrypt(&pk.encrypt_deterministic(&x)?, &pk)?, x);
        }
        Ok(())
    }

    #[test]
    fn test_level2_decryption() -> Result<(), BgnError> {
        let (pk, sk) = keypair(100);
        let a = pk.encrypt(&BigInt::from(-6))?;
        let b = pk.encrypt(&BigInt::from(8))?;

        assert_eq!(sk.decrypt(&pk.mult(&a, &b)?, &pk)?, BigInt::from(-48));
        assert_eq!(sk.decrypt(&pk.to_level2(&b)?, &pk)?, BigInt::from(8));
        assert_eq!(sk.decrypt(&pk.encrypt_zero(crate::ciphertext::Level::L2)?, &pk)?, BigInt::from(0));
        Ok(())
    }

    #[test]
    fn test_out_of_range_result_fails() -> Result<(), BgnError> {
        let (pk, sk) = keypair(100);
        let a = pk.encrypt(&BigInt::from(60))?;
        let b = pk.encrypt(&BigInt::from(70))?;
        let sum = pk.add(&a, &b)?;

        assert!(matches!(sk.decrypt(&sum, &pk), Err(BgnError::DecryptionFailed(_))));
        assert_eq!(sk.decrypt_fail_safe(&sum, &pk), BigInt::from(0));
        Ok(())
    }
}
