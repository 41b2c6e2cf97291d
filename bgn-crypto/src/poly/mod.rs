//! # Poly Module
//!
//! Packs a value into several ciphertexts: the value is scaled to an integer
//! by a power of the fixed-point base, expanded into signed digits of the
//! poly base, and every digit is encrypted on its own. Arithmetic acts on
//! coefficients and never carries, so coefficients may drift outside
//! `(-base, base)`; they are recombined exactly after decryption as long as
//! each stays within the message space (see
//! [`PolyEncodingParams::max_safe_additions`](crate::keypair::PolyEncodingParams::max_safe_additions)).

pub mod encoding;

use crate::ciphertext::{Ciphertext, Level};
use crate::errors::BgnError;
use crate::keypair::{PublicKey, SecretKey};
use crate::pairing::random::random_below;
use crate::pairing::Group;

use encoding::{from_digits, from_fixed_point, to_digits, to_fixed_point};

use itertools::{EitherOrBoth, Itertools};
use num_bigint::BigInt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyCiphertext {
    /// Least significant digit first.
    coefficients: Vec<Ciphertext>,
    degree: usize,
    /// Power of the fixed-point base the plaintext was scaled by.
    scale_factor: u32,
    level: Level,
}

impl PolyCiphertext {
    pub fn try_new(coefficients: Vec<Ciphertext>, scale_factor: u32) -> Result<Self, BgnError> {
        let Some(first) = coefficients.first() else {
            return Err(BgnError::EmptyInput);
        };
        let level = first.level();
        if coefficients.iter().any(|c| c.level() != level) {
            return Err(BgnError::LevelViolation(
                "Poly coefficients must share one level".to_string(),
            ));
        }

        Ok(Self {
            degree: coefficients.len() - 1,
            coefficients,
            scale_factor,
            level,
        })
    }

    pub fn coefficients(&self) -> &[Ciphertext] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn scale_factor(&self) -> u32 {
        self.scale_factor
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl PublicKey {
    /// Encrypts a real value as a fixed-point poly ciphertext.
    pub fn encrypt_poly(&self, value: f64) -> Result<PolyCiphertext, BgnError> {
        let (scaled, scale_factor) =
            to_fixed_point(value, self.poly.fp_scale_base, self.poly.fp_precision)?;
        self.encrypt_poly_scaled(&scaled, scale_factor)
    }

    pub fn encrypt_poly_int(&self, value: &BigInt) -> Result<PolyCiphertext, BgnError> {
        self.encrypt_poly_scaled(value, 0)
    }

    fn encrypt_poly_scaled(&self, value: &BigInt, scale_factor: u32) -> Result<PolyCiphertext, BgnError> {
        let g1 = self.pairing.g1();
        let coefficients = to_digits(value, self.poly.poly_base)
            .into_iter()
            .map(|digit| {
                let message = self.encode_digit(digit)?;
                let r = random_below(&self.n)?;
                Ok(Ciphertext::L1(g1.mul(&message, &g1.pow_uint(&self.q, &r))))
            })
            .collect::<Result<Vec<_>, BgnError>>()?;

        PolyCiphertext::try_new(coefficients, scale_factor)
    }

    fn at_level(&self, ct: &Ciphertext, level: Level) -> Result<Ciphertext, BgnError> {
        match (ct.level(), level) {
            (Level::L1, Level::L2) => self.to_level2(ct),
            _ => Ok(ct.clone()),
        }
    }

    /// Raises the scale of `poly` to `scale_factor`.
    ///
    /// When both bases agree this prepends encrypted zero digits, which keeps
    /// every coefficient as small as it was. Otherwise each coefficient is
    /// multiplied by `fp_scale_base^Δ` and must still fit the message space.
    fn rescale(&self, poly: &PolyCiphertext, scale_factor: u32) -> Result<PolyCiphertext, BgnError> {
        if poly.scale_factor >= scale_factor {
            return Ok(poly.clone());
        }
        let shift = scale_factor - poly.scale_factor;

        let coefficients = if self.poly.fp_scale_base == self.poly.poly_base {
            let zero = self.at_level(&self.encrypt_deterministic(&BigInt::ZERO)?, poly.level)?;
            let mut shifted = (0..shift)
                .map(|_| self.blind(zero.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            shifted.extend(poly.coefficients.iter().cloned());
            shifted
        } else {
            let factor = BigInt::from(self.poly.fp_scale_base).pow(shift);
            poly.coefficients
                .iter()
                .map(|c| self.mult_const(c, &factor))
                .collect::<Result<Vec<_>, _>>()?
        };

        PolyCiphertext::try_new(coefficients, scale_factor)
    }

    fn poly_combine(
        &self,
        a: &PolyCiphertext,
        b: &PolyCiphertext,
        subtract: bool,
    ) -> Result<PolyCiphertext, BgnError> {
        let scale_factor = a.scale_factor.max(b.scale_factor);
        let a = self.rescale(a, scale_factor)?;
        let b = self.rescale(b, scale_factor)?;
        let level = if a.level == Level::L2 || b.level == Level::L2 {
            Level::L2
        } else {
            Level::L1
        };

        let coefficients = a
            .coefficients
            .iter()
            .zip_longest(b.coefficients.iter())
            .map(|pair| match pair {
                EitherOrBoth::Both(x, y) if subtract => self.sub(x, y),
                EitherOrBoth::Both(x, y) => self.add(x, y),
                EitherOrBoth::Left(x) => self.blind(self.at_level(x, level)?),
                EitherOrBoth::Right(y) if subtract => self.at_level(&self.neg(y)?, level),
                EitherOrBoth::Right(y) => self.blind(self.at_level(y, level)?),
            })
            .collect::<Result<Vec<_>, _>>()?;

        PolyCiphertext::try_new(coefficients, scale_factor)
    }

    /// Coefficient-wise addition, after aligning scale factors. No carries.
    pub fn poly_add(&self, a: &PolyCiphertext, b: &PolyCiphertext) -> Result<PolyCiphertext, BgnError> {
        self.poly_combine(a, b, false)
    }

    pub fn poly_sub(&self, a: &PolyCiphertext, b: &PolyCiphertext) -> Result<PolyCiphertext, BgnError> {
        self.poly_combine(a, b, true)
    }

    pub fn poly_neg(&self, poly: &PolyCiphertext) -> Result<PolyCiphertext, BgnError> {
        let coefficients = poly
            .coefficients
            .iter()
            .map(|c| self.neg(c))
            .collect::<Result<Vec<_>, _>>()?;

        PolyCiphertext::try_new(coefficients, poly.scale_factor)
    }

    pub fn poly_mult_const(&self, poly: &PolyCiphertext, constant: &BigInt) -> Result<PolyCiphertext, BgnError> {
        let coefficients = poly
            .coefficients
            .iter()
            .map(|c| self.mult_const(c, constant))
            .collect::<Result<Vec<_>, _>>()?;

        PolyCiphertext::try_new(coefficients, poly.scale_factor)
    }

    /// Product of two level-1 polys: coefficients convolve, degrees and
    /// scale factors add, and the result is level 2.
    pub fn poly_mult(&self, a: &PolyCiphertext, b: &PolyCiphertext) -> Result<PolyCiphertext, BgnError> {
        if a.level != Level::L1 || b.level != Level::L1 {
            return Err(BgnError::LevelViolation(format!(
                "Poly mult needs two level-1 operands, got {:?} and {:?}",
                a.level, b.level
            )));
        }

        let gt = self.pairing.gt();
        let mut products = vec![gt.identity(); a.degree + b.degree + 1];
        for (i, x) in a.coefficients.iter().enumerate() {
            for (j, y) in b.coefficients.iter().enumerate() {
                let (Ciphertext::L1(x), Ciphertext::L1(y)) = (x, y) else {
                    return Err(BgnError::LevelViolation(
                        "Poly coefficient is not level 1".to_string(),
                    ));
                };
                products[i + j] = gt.mul(&products[i + j], &self.pairing.pair(x, y)?);
            }
        }

        let coefficients = products
            .into_iter()
            .map(|product| self.blind(Ciphertext::L2(product)))
            .collect::<Result<Vec<_>, _>>()?;

        PolyCiphertext::try_new(coefficients, a.scale_factor + b.scale_factor)
    }
}

impl SecretKey {
    /// Plaintexts of each coefficient, least significant first.
    pub fn decrypt_poly_coefficients(&self, poly: &PolyCiphertext, pk: &PublicKey) -> Result<Vec<BigInt>, BgnError> {
        poly.coefficients
            .iter()
            .map(|c| self.decrypt(c, pk))
            .collect()
    }

    pub fn decrypt_poly(&self, poly: &PolyCiphertext, pk: &PublicKey) -> Result<f64, BgnError> {
        let coefficients = self.decrypt_poly_coefficients(poly, pk)?;
        let scaled = from_digits(&coefficients, self.poly_base);

        Ok(from_fixed_point(&scaled, pk.poly.fp_scale_base, poly.scale_factor))
    }
}
