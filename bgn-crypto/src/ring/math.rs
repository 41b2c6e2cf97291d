//! Implementation of prime field ops using modular arithmetic.

use crate::errors::BgnError;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Represents the prime field F_p using modular arithmetic.
///
/// Every method expects its inputs already reduced into `[0, modulus)` unless
/// stated otherwise, and always returns reduced values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ring {
    modulus: BigUint,
}

impl Ring {
    /// Create a new Ring with the given modulus.
    ///
    /// The modulus must be greater than 1.
    pub fn try_with(modulus: BigUint) -> Result<Self, BgnError> {
        if modulus <= BigUint::one() {
            return Err(BgnError::InvalidModulus(format!(
                "Modulus must be greater than 1, got {}",
                modulus
            )));
        }

        Ok(Ring { modulus })
    }

    /// Returns the modulus of the ring.
    ///
    /// # Example
    ///
    /// ```
    /// # use bgn_crypto::ring::Ring;
    /// # use num_bigint::{BigInt, BigUint};
    /// let ring = Ring::try_with(BigUint::from(13u32)).unwrap();
    /// assert_eq!(ring.modulus(), &BigUint::from(13u32));
    /// ```
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Number of bytes needed to hold any reduced element.
    pub fn byte_len(&self) -> usize {
        self.modulus.bits().div_ceil(8) as usize
    }

    /// Normalizes a signed value to be within the range `[0, modulus - 1]`.
    ///
    /// Handles negative values correctly by adding the modulus.
    ///
    /// # Example
    ///
    /// ```
    /// # use bgn_crypto::ring::Ring;
    /// # use num_bigint::{BigInt, BigUint};
    /// let ring = Ring::try_with(BigUint::from(10u32)).unwrap();
    /// assert_eq!(ring.normalize(&BigInt::from(15)), BigUint::from(5u32));
    /// assert_eq!(ring.normalize(&BigInt::from(-3)), BigUint::from(7u32));
    /// assert_eq!(ring.normalize(&BigInt::from(10)), BigUint::from(0u32));
    /// ```
    pub fn normalize(&self, value: &BigInt) -> BigUint {
        let m = BigInt::from_biguint(Sign::Plus, self.modulus.clone());
        let rem = value.mod_floor(&m);
        // mod_floor with a positive modulus is never negative
        rem.magnitude().clone()
    }

    /// Reduces an unsigned value of arbitrary size.
    pub fn reduce(&self, value: &BigUint) -> BigUint {
        value % &self.modulus
    }

    /// Computes `(a + b) mod modulus`.
    ///
    /// # Example
    ///
    /// ```
    /// # use bgn_crypto::ring::Ring;
    /// # use num_bigint::{BigInt, BigUint};
    /// let ring = Ring::try_with(BigUint::from(10u32)).unwrap();
    /// assert_eq!(ring.add(&BigUint::from(7u32), &BigUint::from(5u32)), BigUint::from(2u32));
    /// ```
    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let sum = a + b;
        if sum >= self.modulus {
            sum - &self.modulus
        } else {
            sum
        }
    }

    /// Computes `(a - b) mod modulus`.
    ///
    /// # Example
    ///
    /// ```
    /// # use bgn_crypto::ring::Ring;
    /// # use num_bigint::{BigInt, BigUint};
    /// let ring = Ring::try_with(BigUint::from(10u32)).unwrap();
    /// assert_eq!(ring.sub(&BigUint::from(2u32), &BigUint::from(5u32)), BigUint::from(7u32));
    /// ```
    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        if a >= b {
            a - b
        } else {
            &self.modulus - (b - a)
        }
    }

    /// Computes `(a * b) mod modulus`.
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    pub fn square(&self, a: &BigUint) -> BigUint {
        self.mul(a, a)
    }

    /// Computes the additive inverse `-a mod modulus`.
    pub fn neg(&self, a: &BigUint) -> BigUint {
        if a.is_zero() {
            return BigUint::zero();
        }

        &self.modulus - a
    }

    /// Computes `a^e mod modulus`.
    pub fn pow(&self, a: &BigUint, e: &BigUint) -> BigUint {
        a.modpow(e, &self.modulus)
    }

    /// Computes the modular multiplicative inverse `a^-1 mod modulus`.
    ///
    /// # Example
    ///
    /// ```
    /// # use bgn_crypto::ring::Ring;
    /// # use num_bigint::{BigInt, BigUint};
    /// let ring = Ring::try_with(BigUint::from(11u32)).unwrap();
    /// assert_eq!(ring.inv(&BigUint::from(3u32)).unwrap(), BigUint::from(4u32));
    /// assert!(ring.inv(&BigUint::from(0u32)).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `BgnError::NoInverse` if `gcd(a, modulus) != 1`, including `a == 0`.
    pub fn inv(&self, a: &BigUint) -> Result<BigUint, BgnError> {
        if a.is_zero() {
            return Err(BgnError::NoInverse(format!(
                "Cannot invert 0 in mod {}",
                self.modulus
            )));
        }

        a.modinv(&self.modulus).ok_or_else(|| {
            BgnError::NoInverse(format!(
                "Modular inverse does not exist for {} mod {}",
                a, self.modulus
            ))
        })
    }

    /// Euler's criterion. Zero counts as a square.
    pub fn is_square(&self, a: &BigUint) -> bool {
        if a.is_zero() {
            return true;
        }
        let exp = (&self.modulus - BigUint::one()) >> 1;
        self.pow(a, &exp).is_one()
    }

    /// Square root for moduli `p ≡ 3 (mod 4)`, computed as `a^((p+1)/4)`.
    ///
    /// Returns `None` when `a` is not a quadratic residue.
    ///
    /// # Example
    ///
    /// ```
    /// # use bgn_crypto::ring::Ring;
    /// # use num_bigint::{BigInt, BigUint};
    /// let ring = Ring::try_with(BigUint::from(11u32)).unwrap();
    /// let root = ring.sqrt(&BigUint::from(5u32)).unwrap();
    /// assert_eq!(ring.square(&root), BigUint::from(5u32));
    /// assert_eq!(ring.sqrt(&BigUint::from(2u32)), None);
    /// ```
    pub fn sqrt(&self, a: &BigUint) -> Option<BigUint> {
        let exp = (&self.modulus + BigUint::one()) >> 2;
        let root = self.pow(a, &exp);
        if self.square(&root) == *a {
            Some(root)
        } else {
            None
        }
    }

    /// Fixed-width big-endian encoding of a reduced element.
    pub fn to_bytes(&self, a: &BigUint) -> Vec<u8> {
        let width = self.byte_len();
        let raw = a.to_bytes_be();
        let mut out = vec![0u8; width - raw.len().min(width)];
        out.extend_from_slice(&raw[raw.len().saturating_sub(width)..]);
        out
    }

    /// Decodes a fixed-width element, rejecting unreduced values.
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<BigUint, BgnError> {
        if bytes.len() != self.byte_len() {
            return Err(BgnError::InvalidElement(format!(
                "Field element must be {} bytes, got {}",
                self.byte_len(),
                bytes.len()
            )));
        }
        let value = BigUint::from_bytes_be(bytes);
        if value >= self.modulus {
            return Err(BgnError::InvalidElement(
                "Field element is not reduced".to_string(),
            ));
        }

        Ok(value)
    }
}
