//! Affine arithmetic on `E: y² = x³ + x` over F_p.

use crate::errors::BgnError;
use crate::ring::Ring;

use super::random::random_below;

use num_bigint::BigUint;
use num_traits::{One, Zero};

const IDENTITY_BYTE: u8 = 0xff;

/// A point of `E(F_p)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum G1Element {
    Identity,
    Affine { x: BigUint, y: BigUint },
}

impl G1Element {
    pub fn is_identity(&self) -> bool {
        matches!(self, G1Element::Identity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curve {
    field: Ring,
}

impl Curve {
    pub fn new(field: Ring) -> Self {
        Curve { field }
    }

    pub fn field(&self) -> &Ring {
        &self.field
    }

    /// `x³ + x`
    fn rhs(&self, x: &BigUint) -> BigUint {
        let f = &self.field;
        f.add(&f.mul(&f.square(x), x), x)
    }

    pub fn is_on_curve(&self, point: &G1Element) -> bool {
        match point {
            G1Element::Identity => true,
            G1Element::Affine { x, y } => {
                x < self.field.modulus()
                    && y < self.field.modulus()
                    && self.field.square(y) == self.rhs(x)
            }
        }
    }

    pub fn neg(&self, point: &G1Element) -> G1Element {
        match point {
            G1Element::Identity => G1Element::Identity,
            G1Element::Affine { x, y } => G1Element::Affine {
                x: x.clone(),
                y: self.field.neg(y),
            },
        }
    }

    /// Tangent slope `(3x² + 1) / 2y`, `None` for a vertical tangent.
    pub(crate) fn tangent_slope(&self, x: &BigUint, y: &BigUint) -> Option<BigUint> {
        let f = &self.field;
        let num = f.add(&f.mul(&BigUint::from(3u32), &f.square(x)), &BigUint::one());
        let den = f.add(y, y);
        f.inv(&den).ok().map(|inv| f.mul(&num, &inv))
    }

    /// Chord slope through two points with distinct x, `None` otherwise.
    pub(crate) fn chord_slope(
        &self,
        x1: &BigUint,
        y1: &BigUint,
        x2: &BigUint,
        y2: &BigUint,
    ) -> Option<BigUint> {
        let f = &self.field;
        f.inv(&f.sub(x2, x1))
            .ok()
            .map(|inv| f.mul(&f.sub(y2, y1), &inv))
    }

    fn third_point(&self, slope: &BigUint, x1: &BigUint, y1: &BigUint, x2: &BigUint) -> G1Element {
        let f = &self.field;
        let x3 = f.sub(&f.sub(&f.square(slope), x1), x2);
        let y3 = f.sub(&f.mul(slope, &f.sub(x1, &x3)), y1);
        G1Element::Affine { x: x3, y: y3 }
    }

    pub fn double(&self, point: &G1Element) -> G1Element {
        let G1Element::Affine { x, y } = point else {
            return G1Element::Identity;
        };
        match self.tangent_slope(x, y) {
            Some(slope) => self.third_point(&slope, x, y, x),
            None => G1Element::Identity,
        }
    }

    pub fn add(&self, a: &G1Element, b: &G1Element) -> G1Element {
        match (a, b) {
            (G1Element::Identity, _) => b.clone(),
            (_, G1Element::Identity) => a.clone(),
            (G1Element::Affine { x: x1, y: y1 }, G1Element::Affine { x: x2, y: y2 }) => {
                if x1 == x2 {
                    if y1 == y2 {
                        return self.double(a);
                    }
                    return G1Element::Identity;
                }
                match self.chord_slope(x1, y1, x2, y2) {
                    Some(slope) => self.third_point(&slope, x1, y1, x2),
                    None => G1Element::Identity,
                }
            }
        }
    }

    /// Double-and-add with an unreduced scalar.
    pub fn scalar_mul(&self, point: &G1Element, k: &BigUint) -> G1Element {
        let mut acc = G1Element::Identity;
        for i in (0..k.bits()).rev() {
            acc = self.double(&acc);
            if k.bit(i) {
                acc = self.add(&acc, point);
            }
        }
        acc
    }

    /// Samples a uniformly random affine point of the full group `E(F_p)`.
    pub fn random_point(&self) -> Result<G1Element, BgnError> {
        let f = &self.field;
        loop {
            let x = random_below(f.modulus())?;
            let Some(y) = f.sqrt(&self.rhs(&x)) else {
                continue;
            };
            let flip = random_below(&BigUint::from(2u32))?;
            let y = if flip.is_zero() { y } else { f.neg(&y) };
            return Ok(G1Element::Affine { x, y });
        }
    }

    /// Fixed-width `x || y` encoding. The identity is all `0xff`, which can never
    /// be a reduced coordinate.
    pub fn to_bytes(&self, point: &G1Element) -> Vec<u8> {
        match point {
            G1Element::Identity => vec![IDENTITY_BYTE; 2 * self.field.byte_len()],
            G1Element::Affine { x, y } => {
                let mut out = self.field.to_bytes(x);
                out.extend(self.field.to_bytes(y));
                out
            }
        }
    }

    pub fn from_bytes(&self, bytes: &[u8]) -> Result<G1Element, BgnError> {
        let width = self.field.byte_len();
        if bytes.len() != 2 * width {
            return Err(BgnError::InvalidElement(format!(
                "Curve point must be {} bytes, got {}",
                2 * width,
                bytes.len()
            )));
        }
        if bytes.iter().all(|&b| b == IDENTITY_BYTE) {
            return Ok(G1Element::Identity);
        }

        let (xb, yb) = bytes.split_at(width);
        let point = G1Element::Affine {
            x: self.field.from_bytes(xb)?,
            y: self.field.from_bytes(yb)?,
        };
        if !self.is_on_curve(&point) {
            return Err(BgnError::InvalidElement(
                "Point is not on the curve".to_string(),
            ));
        }

        Ok(point)
    }
}
