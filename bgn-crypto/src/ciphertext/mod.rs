//! # Ciphertext Module
//!
//! Ciphertexts and the homomorphic algebra over them. A level-1 ciphertext is
//! `P^x · Q^r` in `G1`; one pairing moves it to level 2 in `GT`, after which
//! it can still be added to and scaled but never multiplied again.

use crate::errors::BgnError;
use crate::keypair::PublicKey;
use crate::pairing::random::random_below;
use crate::pairing::{G1Element, Group, GtElement};

use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, Zero};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Element of the base group `G1`.
    L1,
    /// Element of the target group, reached after one pairing.
    L2,
}

/// A BGN ciphertext. Carries no reference to the key that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ciphertext {
    L1(G1Element),
    L2(GtElement),
}

impl Ciphertext {
    pub fn level(&self) -> Level {
        match self {
            Ciphertext::L1(_) => Level::L1,
            Ciphertext::L2(_) => Level::L2,
        }
    }
}

impl PublicKey {
    fn check_range(&self, x: &BigInt) -> Result<(), BgnError> {
        if x.abs() > BigInt::from(self.message_space) {
            return Err(BgnError::MessageOutOfRange {
                value: x.clone(),
                bound: self.message_space,
            });
        }
        Ok(())
    }

    /// Encrypts `x` with fresh randomness: `C = P^x · Q^r`.
    ///
    /// # Example
    ///
    /// ```
    /// # use bgn_crypto::{KeyGenParams, generate_keypair};
    /// # use num_bigint::BigInt;
    /// let params = KeyGenParams::try_with(32, 100, 3, 3, 0.0001, false).unwrap();
    /// let (pk, _) = generate_keypair(&params).unwrap();
    ///
    /// let ct = pk.encrypt(&BigInt::from(42)).unwrap();
    /// assert_ne!(ct, pk.encrypt(&BigInt::from(42)).unwrap());
    /// assert!(pk.encrypt(&BigInt::from(101)).is_err());
    /// ```
    pub fn encrypt(&self, x: &BigInt) -> Result<Ciphertext, BgnError> {
        let r = random_below(&self.n)?;
        self.encrypt_with_randomness(x, &r)
    }

    /// `C = P^x`, with no blinding.
    ///
    /// Equal plaintexts give byte-identical ciphertexts, so this must not be
    /// used for values that need to stay secret.
    pub fn encrypt_deterministic(&self, x: &BigInt) -> Result<Ciphertext, BgnError> {
        self.encrypt_with_randomness(x, &BigUint::zero())
    }

    pub fn encrypt_with_randomness(&self, x: &BigInt, r: &BigUint) -> Result<Ciphertext, BgnError> {
        self.check_range(x)?;

        let g1 = self.pairing.g1();
        let message = g1.pow(&self.p, x);
        let blinding = g1.pow_uint(&self.q, r);

        Ok(Ciphertext::L1(g1.mul(&message, &blinding)))
    }

    /// A freshly blinded encryption of zero at `level`.
    pub fn encrypt_zero(&self, level: Level) -> Result<Ciphertext, BgnError> {
        let r = random_below(&self.n)?;
        match level {
            Level::L1 => Ok(Ciphertext::L1(self.pairing.g1().pow_uint(&self.q, &r))),
            Level::L2 => {
                let base = self.paired_blinding()?;
                Ok(Ciphertext::L2(self.pairing.gt().pow_uint(&base, &r)))
            }
        }
    }

    /// Lifts a level-1 ciphertext to level 2 by pairing it with `P`, the
    /// deterministic encryption of one. Level-2 input is returned unchanged.
    pub fn to_level2(&self, ct: &Ciphertext) -> Result<Ciphertext, BgnError> {
        Ok(Ciphertext::L2(self.level2_element(ct)?))
    }

    fn level2_element(&self, ct: &Ciphertext) -> Result<GtElement, BgnError> {
        match ct {
            Ciphertext::L1(c) => self.pairing.pair(c, &self.p),
            Ciphertext::L2(c) => Ok(c.clone()),
        }
    }

    /// Multiplies in a fresh encryption of zero, regardless of the key's
    /// determinism flag.
    pub fn rerandomize(&self, ct: &Ciphertext) -> Result<Ciphertext, BgnError> {
        let zero = self.encrypt_zero(ct.level())?;
        Ok(match (ct, zero) {
            (Ciphertext::L1(c), Ciphertext::L1(z)) => Ciphertext::L1(self.pairing.g1().mul(c, &z)),
            (Ciphertext::L2(c), Ciphertext::L2(z)) => Ciphertext::L2(self.pairing.gt().mul(c, &z)),
            _ => {
                return Err(BgnError::InternalError(
                    "Blinding factor level does not match the ciphertext".to_string(),
                ));
            }
        })
    }

    pub(crate) fn blind(&self, ct: Ciphertext) -> Result<Ciphertext, BgnError> {
        if self.deterministic {
            return Ok(ct);
        }
        self.rerandomize(&ct)
    }

    fn combine(&self, a: &Ciphertext, b: &Ciphertext, subtract: bool) -> Result<Ciphertext, BgnError> {
        let combined = match (a, b) {
            (Ciphertext::L1(x), Ciphertext::L1(y)) => {
                let g1 = self.pairing.g1();
                Ciphertext::L1(if subtract { g1.div(x, y) } else { g1.mul(x, y) })
            }
            // any level-2 operand promotes the other one
            _ => {
                let gt = self.pairing.gt();
                let x = self.level2_element(a)?;
                let y = self.level2_element(b)?;
                Ciphertext::L2(if subtract { gt.div(&x, &y) } else { gt.mul(&x, &y) })
            }
        };

        self.blind(combined)
    }

    /// Homomorphic addition. Mixed levels yield a level-2 ciphertext.
    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext, BgnError> {
        self.combine(a, b, false)
    }

    /// Homomorphic subtraction. Mixed levels yield a level-2 ciphertext.
    pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext, BgnError> {
        self.combine(a, b, true)
    }

    pub fn neg(&self, ct: &Ciphertext) -> Result<Ciphertext, BgnError> {
        let zero = self.encrypt_deterministic(&BigInt::zero())?;
        self.sub(&zero, ct)
    }

    /// Multiplies the plaintext by a public integer, at the ciphertext's level.
    pub fn mult_const(&self, ct: &Ciphertext, constant: &BigInt) -> Result<Ciphertext, BgnError> {
        let scaled = match ct {
            Ciphertext::L1(c) => Ciphertext::L1(self.pairing.g1().pow(c, constant)),
            Ciphertext::L2(c) => Ciphertext::L2(self.pairing.gt().pow(c, constant)),
        };

        self.blind(scaled)
    }

    /// The single multiplication the scheme supports: pairs two level-1
    /// ciphertexts into a level-2 one.
    pub fn mult(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext, BgnError> {
        let (Ciphertext::L1(x), Ciphertext::L1(y)) = (a, b) else {
            return Err(BgnError::LevelViolation(format!(
                "Mult needs two level-1 ciphertexts, got {:?} and {:?}",
                a.level(),
                b.level()
            )));
        };

        self.blind(Ciphertext::L2(self.pairing.pair(x, y)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::{KeyGenParams, generate_keypair};

    fn public_key(deterministic: bool) -> PublicKey {
        let params = KeyGenParams::try_with(64, 100, 3, 3, 0.0001, deterministic).unwrap();
        generate_keypair(&params).unwrap().0
    }

    #[test]
    fn test_encrypt_rejects_out_of_range() {
        let pk = public_key(false);
        assert!(pk.encrypt(&BigInt::from(100)).is_ok());
        assert!(pk.encrypt(&BigInt::from(-100)).is_ok());
        assert!(matches!(
            pk.encrypt(&BigInt::from(101)),
            Err(BgnError::MessageOutOfRange { bound: 100, .. })
        ));
    }

    #[test]
    fn test_deterministic_encryption_is_plain_power() -> Result<(), BgnError> {
        let pk = public_key(false);
        let g1 = pk.pairing().g1();
        let ct = pk.encrypt_deterministic(&BigInt::from(9))?;
        assert_eq!(ct, Ciphertext::L1(g1.pow(pk.generator(), &BigInt::from(9))));
        assert_eq!(ct, pk.encrypt_deterministic(&BigInt::from(9))?);
        assert_eq!(
            pk.encrypt_deterministic(&BigInt::from(1))?,
            Ciphertext::L1(pk.generator().clone())
        );
        Ok(())
    }

    #[test]
    fn test_levels_of_combined_ciphertexts() -> Result<(), BgnError> {
        let pk = public_key(false);
        let a = pk.encrypt(&BigInt::from(2))?;
        let b = pk.encrypt(&BigInt::from(3))?;
        let product = pk.mult(&a, &b)?;

        assert_eq!(pk.add(&a, &b)?.level(), Level::L1);
        assert_eq!(product.level(), Level::L2);
        assert_eq!(pk.add(&a, &product)?.level(), Level::L2);
        assert_eq!(pk.sub(&product, &b)?.level(), Level::L2);
        assert_eq!(pk.mult_const(&product, &BigInt::from(4))?.level(), Level::L2);
        assert_eq!(pk.to_level2(&a)?.level(), Level::L2);
        assert_eq!(pk.encrypt_zero(Level::L2)?.level(), Level::L2);
        Ok(())
    }

    #[test]
    fn test_mult_rejects_level2_operand() -> Result<(), BgnError> {
        let pk = public_key(false);
        let a = pk.encrypt(&BigInt::from(2))?;
        let product = pk.mult(&a, &a)?;

        assert!(matches!(pk.mult(&product, &a), Err(BgnError::LevelViolation(_))));
        assert!(matches!(pk.mult(&a, &product), Err(BgnError::LevelViolation(_))));
        Ok(())
    }

    #[test]
    fn test_deterministic_key_skips_blinding() -> Result<(), BgnError> {
        let pk = public_key(true);
        let a = pk.encrypt_deterministic(&BigInt::from(4))?;
        let b = pk.encrypt_deterministic(&BigInt::from(5))?;

        assert_eq!(pk.add(&a, &b)?, pk.encrypt_deterministic(&BigInt::from(9))?);
        assert_eq!(pk.mult(&a, &b)?, pk.mult(&a, &b)?);
        assert_ne!(pk.rerandomize(&a)?, a);
        Ok(())
    }

    #[test]
    fn test_randomized_key_blinds_results() -> Result<(), BgnError> {
        let pk = public_key(false);
        let a = pk.encrypt_deterministic(&BigInt::from(4))?;
        let b = pk.encrypt_deterministic(&BigInt::from(5))?;

        assert_ne!(pk.add(&a, &b)?, pk.encrypt_deterministic(&BigInt::from(9))?);
        assert_ne!(pk.encrypt(&BigInt::from(4))?, pk.encrypt(&BigInt::from(4))?);
        Ok(())
    }
}
