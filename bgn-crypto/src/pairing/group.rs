//! Multiplicative-notation group handles over the pairing's source and target groups.

use crate::errors::BgnError;
use crate::ring::Fp2;

use super::Pairing;
use super::curve::G1Element;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;

use std::fmt::Debug;
use std::hash::Hash;

/// An element of the target group, the order-`n` subgroup of F_{p²}^*.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GtElement(pub(crate) Fp2);

impl GtElement {
    pub fn one() -> Self {
        GtElement(Fp2::one())
    }
}

/// Group operations written multiplicatively, as the scheme is.
///
/// Exponents passed to [`Group::pow`] are reduced modulo the subgroup order, so
/// elements are expected to live in the order-`n` subgroup.
pub trait Group {
    type Element: Clone + Debug + Eq + Hash;

    fn order(&self) -> &BigUint;

    fn identity(&self) -> Self::Element;

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    fn inverse(&self, a: &Self::Element) -> Self::Element;

    fn to_bytes(&self, a: &Self::Element) -> Vec<u8>;

    /// Decodes an element, rejecting anything outside the order-`n` subgroup.
    fn from_bytes(&self, bytes: &[u8]) -> Result<Self::Element, BgnError>;

    fn square(&self, a: &Self::Element) -> Self::Element {
        self.mul(a, a)
    }

    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul(a, &self.inverse(b))
    }

    fn is_identity(&self, a: &Self::Element) -> bool {
        *a == self.identity()
    }

    fn pow_uint(&self, a: &Self::Element, e: &BigUint) -> Self::Element {
        let mut acc = self.identity();
        for i in (0..e.bits()).rev() {
            acc = self.square(&acc);
            if e.bit(i) {
                acc = self.mul(&acc, a);
            }
        }
        acc
    }

    fn pow(&self, a: &Self::Element, e: &BigInt) -> Self::Element {
        let order = BigInt::from(self.order().clone());
        let reduced = e.mod_floor(&order);
        self.pow_uint(a, reduced.magnitude())
    }

    fn in_subgroup(&self, a: &Self::Element) -> bool {
        self.is_identity(&self.pow_uint(a, self.order()))
    }
}

/// Handle on the source group `G1 ⊂ E(F_p)`.
#[derive(Debug, Clone, Copy)]
pub struct G1<'a> {
    pub(crate) pairing: &'a Pairing,
}

impl Group for G1<'_> {
    type Element = G1Element;

    fn order(&self) -> &BigUint {
        self.pairing.params().group_order()
    }

    fn identity(&self) -> G1Element {
        G1Element::Identity
    }

    fn mul(&self, a: &G1Element, b: &G1Element) -> G1Element {
        self.pairing.curve().add(a, b)
    }

    fn inverse(&self, a: &G1Element) -> G1Element {
        self.pairing.curve().neg(a)
    }

    fn square(&self, a: &G1Element) -> G1Element {
        self.pairing.curve().double(a)
    }

    fn is_identity(&self, a: &G1Element) -> bool {
        a.is_identity()
    }

    fn pow_uint(&self, a: &G1Element, e: &BigUint) -> G1Element {
        self.pairing.curve().scalar_mul(a, e)
    }

    fn to_bytes(&self, a: &G1Element) -> Vec<u8> {
        self.pairing.curve().to_bytes(a)
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<G1Element, BgnError> {
        let point = self.pairing.curve().from_bytes(bytes)?;
        if !self.in_subgroup(&point) {
            return Err(BgnError::InvalidElement(
                "Point is outside the order-n subgroup".to_string(),
            ));
        }
        Ok(point)
    }
}

/// Handle on the target group `GT ⊂ F_{p²}^*`.
#[derive(Debug, Clone, Copy)]
pub struct Gt<'a> {
    pub(crate) pairing: &'a Pairing,
}

impl Group for Gt<'_> {
    type Element = GtElement;

    fn order(&self) -> &BigUint {
        self.pairing.params().group_order()
    }

    fn identity(&self) -> GtElement {
        GtElement::one()
    }

    fn mul(&self, a: &GtElement, b: &GtElement) -> GtElement {
        GtElement(self.pairing.extension().mul(&a.0, &b.0))
    }

    /// Elements of order dividing `p + 1` have norm 1, so the inverse is the conjugate.
    fn inverse(&self, a: &GtElement) -> GtElement {
        GtElement(self.pairing.extension().conj(&a.0))
    }

    fn square(&self, a: &GtElement) -> GtElement {
        GtElement(self.pairing.extension().square(&a.0))
    }

    fn is_identity(&self, a: &GtElement) -> bool {
        a.0.is_one()
    }

    fn to_bytes(&self, a: &GtElement) -> Vec<u8> {
        self.pairing.extension().to_bytes(&a.0)
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<GtElement, BgnError> {
        let value = GtElement(self.pairing.extension().from_bytes(bytes)?);
        if value.0.is_zero() || !self.in_subgroup(&value) {
            return Err(BgnError::InvalidElement(
                "Element is outside the order-n target subgroup".to_string(),
            ));
        }
        Ok(value)
    }
}
