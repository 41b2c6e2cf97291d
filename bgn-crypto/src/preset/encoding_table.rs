use crate::pairing::{G1, G1Element, Group};

/// Precomputed `P^d` for every digit `d` in `0..poly_base`.
///
/// Poly encryption looks digits up here instead of exponentiating per
/// coefficient. Negative digits map to the inverse of the positive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingTable {
    digits: Vec<G1Element>,
}

impl EncodingTable {
    pub fn build(g1: &G1<'_>, generator: &G1Element, poly_base: u32) -> Self {
        let mut digits = Vec::with_capacity(poly_base as usize);
        let mut current = g1.identity();
        for _ in 0..poly_base {
            digits.push(current.clone());
            current = g1.mul(&current, generator);
        }

        Self { digits }
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Element for a signed digit, `None` if `|digit|` is outside the table.
    pub fn lookup(&self, g1: &G1<'_>, digit: i64) -> Option<G1Element> {
        let entry = self.digits.get(usize::try_from(digit.unsigned_abs()).ok()?)?;
        if digit < 0 {
            Some(g1.inverse(entry))
        } else {
            Some(entry.clone())
        }
    }
}
