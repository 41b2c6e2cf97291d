//! # Pairing Module
//!
//! A composite-order symmetric pairing in the style of PBC's "type A1" curves:
//! `e: G1 × G1 → GT`, where `G1` is the order-`n` subgroup of `E(F_p)` for the
//! supersingular curve `y² = x³ + x`, and `GT` is the order-`n` subgroup of
//! F_{p²}^*. The pairing is the reduced Tate pairing composed with the
//! distortion map `(x, y) ↦ (−x, i·y)`.

pub mod curve;
pub mod group;
pub mod params;
pub mod random;

pub use curve::{Curve, G1Element};
pub use group::{G1, Group, Gt, GtElement};
pub use params::TypeA1Params;

use crate::errors::BgnError;
use crate::ring::{Fp2, QuadraticExtension, Ring};

use num_bigint::BigUint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    params: TypeA1Params,
    curve: Curve,
    extension: QuadraticExtension,
}

impl Pairing {
    pub fn new(params: TypeA1Params) -> Result<Self, BgnError> {
        let field = Ring::try_with(params.field_order().clone())?;

        Ok(Pairing {
            params,
            curve: Curve::new(field.clone()),
            extension: QuadraticExtension::new(field),
        })
    }

    /// Rebuilds a pairing from its descriptor string.
    pub fn from_descriptor(descriptor: &str) -> Result<Self, BgnError> {
        Pairing::new(TypeA1Params::from_descriptor(descriptor)?)
    }

    pub fn descriptor(&self) -> String {
        self.params.descriptor()
    }

    pub fn params(&self) -> &TypeA1Params {
        &self.params
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn extension(&self) -> &QuadraticExtension {
        &self.extension
    }

    pub fn g1(&self) -> G1<'_> {
        G1 { pairing: self }
    }

    pub fn gt(&self) -> Gt<'_> {
        Gt { pairing: self }
    }

    /// A uniformly random point of the whole curve group, of order dividing `l·n`.
    pub fn random_point(&self) -> Result<G1Element, BgnError> {
        self.curve.random_point()
    }

    /// A uniformly random element of the order-`n` subgroup.
    pub fn random_g1(&self) -> Result<G1Element, BgnError> {
        let point = self.curve.random_point()?;
        Ok(self.curve.scalar_mul(&point, self.params.cofactor()))
    }

    /// Evaluates `e(a, b)`.
    pub fn pair(&self, a: &G1Element, b: &G1Element) -> Result<GtElement, BgnError> {
        let (G1Element::Affine { x: xp, y: yp }, G1Element::Affine { x: xq, y: yq }) = (a, b)
        else {
            return Ok(GtElement::one());
        };

        let f = self.miller_loop(xp, yp, xq, yq);
        self.final_exponentiation(&f)
    }

    /// Computes `f_{n,P}` at `φ(Q) = (−x_Q, i·y_Q)`.
    ///
    /// Vertical lines and every other factor in F_p are dropped: they are
    /// killed by the `(p − 1)` part of the final exponentiation.
    fn miller_loop(&self, xp: &BigUint, yp: &BigUint, xq: &BigUint, yq: &BigUint) -> Fp2 {
        let n = self.params.group_order();
        let base = G1Element::Affine {
            x: xp.clone(),
            y: yp.clone(),
        };

        let mut f = Fp2::one();
        let mut t = base.clone();

        for i in (0..n.bits().saturating_sub(1)).rev() {
            f = self.extension.square(&f);
            if let G1Element::Affine { x, y } = &t {
                if let Some(slope) = self.curve.tangent_slope(x, y) {
                    f = self.extension.mul(&f, &self.line_value(&slope, x, y, xq, yq));
                }
            }
            t = self.curve.double(&t);

            if n.bit(i) {
                if let G1Element::Affine { x, y } = &t {
                    let slope = if x == xp && y == yp {
                        self.curve.tangent_slope(x, y)
                    } else {
                        self.curve.chord_slope(x, y, xp, yp)
                    };
                    if let Some(slope) = slope {
                        f = self.extension.mul(&f, &self.line_value(&slope, x, y, xq, yq));
                    }
                }
                t = self.curve.add(&t, &base);
            }
        }

        f
    }

    /// Line through `(x, y)` with the given slope, evaluated at `φ(Q)`:
    /// `i·y_Q − y − λ(−x_Q − x) = (λ(x_Q + x) − y) + y_Q·i`.
    fn line_value(&self, slope: &BigUint, x: &BigUint, y: &BigUint, xq: &BigUint, yq: &BigUint) -> Fp2 {
        let field = self.extension.base();
        Fp2 {
            c0: field.sub(&field.mul(slope, &field.add(xq, x)), y),
            c1: yq.clone(),
        }
    }

    /// `f^((p² − 1)/n) = (f^(p − 1))^l`, with `f^(p − 1) = conj(f) / f`.
    fn final_exponentiation(&self, f: &Fp2) -> Result<GtElement, BgnError> {
        let ext = &self.extension;
        let unitary = ext.mul(&ext.conj(f), &ext.inv(f)?);
        Ok(GtElement(ext.pow(&unitary, self.params.cofactor())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use num_bigint::BigInt;

    fn pairing() -> Pairing {
        // 10007 · 10009
        let params = TypeA1Params::generate(&BigUint::from(100_160_063u64)).unwrap();
        Pairing::new(params).unwrap()
    }

    fn generator(pairing: &Pairing) -> G1Element {
        let q1 = BigUint::from(10_007u32);
        let q2 = BigUint::from(10_009u32);
        loop {
            let g = pairing.random_g1().unwrap();
            let g1 = pairing.g1();
            if !g1.is_identity(&g1.pow_uint(&g, &q1)) && !g1.is_identity(&g1.pow_uint(&g, &q2)) {
                return g;
            }
        }
    }

    #[test]
    fn test_random_g1_lands_in_subgroup() -> Result<(), BgnError> {
        let pairing = pairing();
        for _ in 0..5 {
            assert!(pairing.g1().in_subgroup(&pairing.random_g1()?));
        }
        Ok(())
    }

    #[test]
    fn test_pairing_is_bilinear() -> Result<(), BgnError> {
        let pairing = pairing();
        let (g1, gt) = (pairing.g1(), pairing.gt());
        let p = generator(&pairing);
        let a = BigInt::from(1234);
        let b = BigInt::from(-77);

        let lhs = pairing.pair(&g1.pow(&p, &a), &g1.pow(&p, &b))?;
        let rhs = gt.pow(&pairing.pair(&p, &p)?, &(&a * &b));
        assert_eq!(lhs, rhs);
        Ok(())
    }

    #[test]
    fn test_pairing_is_non_degenerate() -> Result<(), BgnError> {
        let pairing = pairing();
        let gt = pairing.gt();
        let p = generator(&pairing);
        let e = pairing.pair(&p, &p)?;

        assert!(!gt.is_identity(&e));
        assert!(!gt.is_identity(&gt.pow_uint(&e, &BigUint::from(10_007u32))));
        assert!(!gt.is_identity(&gt.pow_uint(&e, &BigUint::from(10_009u32))));
        assert!(gt.in_subgroup(&e));
        Ok(())
    }

    #[test]
    fn test_identity_pairs_to_one() -> Result<(), BgnError> {
        let pairing = pairing();
        let p = generator(&pairing);
        assert!(pairing.gt().is_identity(&pairing.pair(&G1Element::Identity, &p)?));
        Ok(())
    }

    #[test]
    fn test_descriptor_rebuilds_same_pairing() -> Result<(), BgnError> {
        let pairing = pairing();
        let rebuilt = Pairing::from_descriptor(&pairing.descriptor())?;
        assert_eq!(rebuilt, pairing);
        assert!(Pairing::from_descriptor("type a1\n").is_err());
        Ok(())
    }

    #[test]
    fn test_element_bytes_reject_foreign_subgroup() -> Result<(), BgnError> {
        let pairing = pairing();
        let g1 = pairing.g1();
        let p = generator(&pairing);
        assert_eq!(g1.from_bytes(&g1.to_bytes(&p))?, p);

        // A full-group point that is not annihilated by n.
        let outside = loop {
            let candidate = pairing.random_point()?;
            if !g1.in_subgroup(&candidate) {
                break candidate;
            }
        };
        assert!(g1.from_bytes(&g1.to_bytes(&outside)).is_err());

        let gt = pairing.gt();
        let e = pairing.pair(&p, &p)?;
        assert_eq!(gt.from_bytes(&gt.to_bytes(&e))?, e);
        Ok(())
    }
}
