//! Quadratic extension F_p[i] / (i² + 1), valid whenever p ≡ 3 (mod 4).

use crate::errors::BgnError;

use super::Ring;

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// An element `c0 + c1·i` of F_{p²}.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fp2 {
    pub c0: BigUint,
    pub c1: BigUint,
}

impl Fp2 {
    pub fn one() -> Self {
        Fp2 {
            c0: BigUint::one(),
            c1: BigUint::zero(),
        }
    }

    pub fn is_one(&self) -> bool {
        self.c0.is_one() && self.c1.is_zero()
    }

    pub fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero()
    }
}

/// Arithmetic over F_{p²}, parameterised by the base field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadraticExtension {
    base: Ring,
}

impl QuadraticExtension {
    pub fn new(base: Ring) -> Self {
        QuadraticExtension { base }
    }

    pub fn base(&self) -> &Ring {
        &self.base
    }

    pub fn mul(&self, a: &Fp2, b: &Fp2) -> Fp2 {
        let f = &self.base;
        // (a0 + a1 i)(b0 + b1 i) = (a0 b0 - a1 b1) + (a0 b1 + a1 b0) i
        let a0b0 = f.mul(&a.c0, &b.c0);
        let a1b1 = f.mul(&a.c1, &b.c1);
        let a0b1 = f.mul(&a.c0, &b.c1);
        let a1b0 = f.mul(&a.c1, &b.c0);

        Fp2 {
            c0: f.sub(&a0b0, &a1b1),
            c1: f.add(&a0b1, &a1b0),
        }
    }

    pub fn square(&self, a: &Fp2) -> Fp2 {
        let f = &self.base;
        // (a0 + a1)(a0 - a1) + 2 a0 a1 i
        let sum = f.add(&a.c0, &a.c1);
        let diff = f.sub(&a.c0, &a.c1);
        let cross = f.mul(&a.c0, &a.c1);

        Fp2 {
            c0: f.mul(&sum, &diff),
            c1: f.add(&cross, &cross),
        }
    }

    /// Conjugation, which is also the p-power Frobenius map.
    pub fn conj(&self, a: &Fp2) -> Fp2 {
        Fp2 {
            c0: a.c0.clone(),
            c1: self.base.neg(&a.c1),
        }
    }

    pub fn inv(&self, a: &Fp2) -> Result<Fp2, BgnError> {
        let f = &self.base;
        let norm = f.add(&f.square(&a.c0), &f.square(&a.c1));
        let norm_inv = f.inv(&norm)?;

        Ok(Fp2 {
            c0: f.mul(&a.c0, &norm_inv),
            c1: f.mul(&f.neg(&a.c1), &norm_inv),
        })
    }

    /// Square-and-multiply, most significant bit first.
    pub fn pow(&self, a: &Fp2, e: &BigUint) -> Fp2 {
        let mut acc = Fp2::one();
        for i in (0..e.bits()).rev() {
            acc = self.square(&acc);
            if e.bit(i) {
                acc = self.mul(&acc, a);
            }
        }
        acc
    }

    pub fn to_bytes(&self, a: &Fp2) -> Vec<u8> {
        let mut out = self.base.to_bytes(&a.c0);
        out.extend(self.base.to_bytes(&a.c1));
        out
    }

    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Fp2, BgnError> {
        let width = self.base.byte_len();
        if bytes.len() != 2 * width {
            return Err(BgnError::InvalidElement(format!(
                "Extension element must be {} bytes, got {}",
                2 * width,
                bytes.len()
            )));
        }
        let (lo, hi) = bytes.split_at(width);

        Ok(Fp2 {
            c0: self.base.from_bytes(lo)?,
            c1: self.base.from_bytes(hi)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext() -> QuadraticExtension {
        QuadraticExtension::new(Ring::try_with(BigUint::from(1_000_003u64)).unwrap())
    }

    fn elem(c0: u64, c1: u64) -> Fp2 {
        Fp2 {
            c0: BigUint::from(c0),
            c1: BigUint::from(c1),
        }
    }

    #[test]
    fn test_i_squared_is_minus_one() {
        let ext = ext();
        let i = elem(0, 1);
        assert_eq!(ext.square(&i), elem(1_000_002, 0));
    }

    #[test]
    fn test_square_matches_mul() {
        let ext = ext();
        let a = elem(12_345, 678_901);
        assert_eq!(ext.square(&a), ext.mul(&a, &a));
    }

    #[test]
    fn test_inverse() -> Result<(), BgnError> {
        let ext = ext();
        let a = elem(42, 99_999);
        assert!(ext.mul(&a, &ext.inv(&a)?).is_one());
        assert!(ext.inv(&elem(0, 0)).is_err());
        Ok(())
    }

    #[test]
    fn test_frobenius_is_conjugation() {
        let ext = ext();
        let a = elem(7, 3);
        let p = ext.base().modulus().clone();
        assert_eq!(ext.pow(&a, &p), ext.conj(&a));
    }

    #[test]
    fn test_bytes_round_trip() -> Result<(), BgnError> {
        let ext = ext();
        let a = elem(1, 1_000_002);
        let bytes = ext.to_bytes(&a);
        assert_eq!(bytes.len(), 6);
        assert_eq!(ext.from_bytes(&bytes)?, a);
        assert!(ext.from_bytes(&bytes[1..]).is_err());
        Ok(())
    }
}
