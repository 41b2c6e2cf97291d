//! Type A1 curve parameters: the supersingular curve `y² = x³ + x` over F_p
//! whose group order `p + 1 = l·n` contains a subgroup of composite order `n`.

use crate::errors::BgnError;

use super::random::probably_prime;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive};

use tracing::debug;

/// Cofactor candidates tried before parameter generation gives up.
const MAX_COFACTOR_STEPS: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeA1Params {
    p: BigUint,
    n: BigUint,
    l: BigUint,
}

impl TypeA1Params {
    /// Builds parameters for a group of order `n` by searching the smallest
    /// cofactor `l ∈ {4, 8, 12, …}` with `gcd(l, n) = 1` and `l·n − 1` prime.
    pub fn generate(n: &BigUint) -> Result<Self, BgnError> {
        if n.is_even() || *n <= BigUint::one() {
            return Err(BgnError::InvalidParameters(format!(
                "Group order must be odd and > 1, got {}",
                n
            )));
        }

        let mut l = BigUint::from(4u32);
        for _ in 0..MAX_COFACTOR_STEPS {
            if l.gcd(n).is_one() {
                let p = &l * n - BigUint::one();
                if probably_prime(&p) {
                    debug!(cofactor = %l, field_bits = p.bits(), "found type a1 parameters");
                    return Ok(TypeA1Params { p, n: n.clone(), l });
                }
            }
            l += 4u32;
        }

        Err(BgnError::InvalidParameters(format!(
            "No prime field found for group order {}",
            n
        )))
    }

    /// Field characteristic.
    pub fn field_order(&self) -> &BigUint {
        &self.p
    }

    /// Order of the pairing subgroup.
    pub fn group_order(&self) -> &BigUint {
        &self.n
    }

    /// Curve cofactor `l`, with `#E(F_p) = l·n`.
    pub fn cofactor(&self) -> &BigUint {
        &self.l
    }

    /// Descriptor string in the PBC text layout.
    pub fn descriptor(&self) -> String {
        format!("type a1\np {}\nn {}\nl {}\n", self.p, self.n, self.l)
    }

    /// Parses and validates a descriptor produced by [`TypeA1Params::descriptor`].
    pub fn from_descriptor(descriptor: &str) -> Result<Self, BgnError> {
        let mut kind = None;
        let mut p = None;
        let mut n = None;
        let mut l = None;

        for line in descriptor.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some((key, value)) = line.split_once(char::is_whitespace) else {
                return Err(BgnError::InvalidDescriptor(format!(
                    "Line '{}' is not a key/value pair",
                    line
                )));
            };
            let value = value.trim();
            let slot = match key {
                "type" => {
                    kind = Some(value.to_string());
                    continue;
                }
                "p" => &mut p,
                "n" => &mut n,
                "l" => &mut l,
                other => {
                    return Err(BgnError::InvalidDescriptor(format!(
                        "Unknown key '{}'",
                        other
                    )));
                }
            };
            let parsed = value.parse::<BigUint>().map_err(|e| {
                BgnError::InvalidDescriptor(format!("Value of '{}' is not an integer: {}", key, e))
            })?;
            *slot = Some(parsed);
        }

        match kind.as_deref() {
            Some("a1") => {}
            Some(other) => {
                return Err(BgnError::InvalidDescriptor(format!(
                    "Unsupported pairing type '{}'",
                    other
                )));
            }
            None => {
                return Err(BgnError::InvalidDescriptor(
                    "Missing pairing type".to_string(),
                ));
            }
        }

        let missing = |name: &str| BgnError::InvalidDescriptor(format!("Missing field '{}'", name));
        let p = p.ok_or_else(|| missing("p"))?;
        let n = n.ok_or_else(|| missing("n"))?;
        let l = l.ok_or_else(|| missing("l"))?;

        if n.is_even() || n <= BigUint::one() {
            return Err(BgnError::InvalidDescriptor(
                "Group order must be odd and > 1".to_string(),
            ));
        }
        if (&l % 4u32).to_u32() != Some(0) || l.bits() == 0 {
            return Err(BgnError::InvalidDescriptor(
                "Cofactor must be a positive multiple of 4".to_string(),
            ));
        }
        if &l * &n != &p + BigUint::one() {
            return Err(BgnError::InvalidDescriptor(
                "Parameters violate p = l·n − 1".to_string(),
            ));
        }
        if !l.gcd(&n).is_one() {
            return Err(BgnError::InvalidDescriptor(
                "Cofactor and group order must be coprime".to_string(),
            ));
        }
        if !probably_prime(&p) {
            return Err(BgnError::InvalidDescriptor(
                "Field order is not prime".to_string(),
            ));
        }

        Ok(TypeA1Params { p, n, l })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_small_order() -> Result<(), BgnError> {
        // 10007 · 10009
        let n = BigUint::from(100_160_063u64);
        let params = TypeA1Params::generate(&n)?;

        assert_eq!(params.group_order(), &n);
        assert_eq!(
            params.cofactor() * &n,
            params.field_order() + BigUint::one()
        );
        assert_eq!((params.field_order() % 4u32).to_u32(), Some(3));
        assert!(probably_prime(params.field_order()));
        Ok(())
    }

    #[test]
    fn test_generate_rejects_even_order() {
        assert!(TypeA1Params::generate(&BigUint::from(100u32)).is_err());
    }

    #[test]
    fn test_descriptor_round_trip() -> Result<(), BgnError> {
        let params = TypeA1Params::generate(&BigUint::from(100_160_063u64))?;
        let parsed = TypeA1Params::from_descriptor(&params.descriptor())?;
        assert_eq!(parsed, params);
        Ok(())
    }

    #[test]
    fn test_descriptor_rejects_malformed_input() {
        assert!(TypeA1Params::from_descriptor("").is_err());
        assert!(TypeA1Params::from_descriptor("type a\np 11\nn 3\nl 4\n").is_err());
        assert!(TypeA1Params::from_descriptor("type a1\np 11\nn 3\n").is_err());
        assert!(TypeA1Params::from_descriptor("type a1\np eleven\nn 3\nl 4\n").is_err());
        // 4·3 − 1 = 11, but 13 is claimed
        assert!(TypeA1Params::from_descriptor("type a1\np 13\nn 3\nl 4\n").is_err());
        assert!(TypeA1Params::from_descriptor("type a1\np 11\nn 3\nl 4\n").is_ok());
    }

    #[test]
    fn test_descriptor_rejects_unsound_parameters() {
        // 4·7 − 1 = 27 is not a field
        assert!(matches!(
            TypeA1Params::from_descriptor("type a1\np 27\nn 7\nl 4\n"),
            Err(BgnError::InvalidDescriptor(_))
        ));
        // 12·9 − 1 = 107 is prime, but 3 divides both l and n
        assert!(matches!(
            TypeA1Params::from_descriptor("type a1\np 107\nn 9\nl 12\n"),
            Err(BgnError::InvalidDescriptor(_))
        ));
    }
}
