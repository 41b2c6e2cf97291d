//! Cryptographically secure sampling backed by the operating system RNG.

use crate::errors::BgnError;

use num_bigint::BigUint;
use num_prime::PrimalityTestConfig;
use num_prime::nt_funcs::is_prime;
use num_traits::{One, Zero};

use rand::TryRngCore;
use rand::rngs::OsRng;

/// Upper bound on candidates tried before prime generation gives up.
const MAX_PRIME_ATTEMPTS: usize = 1_000_000;

fn fill(buf: &mut [u8]) -> Result<(), BgnError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| BgnError::Randomness(e.to_string()))
}

/// Samples uniformly from `[0, bound)` by rejection.
pub fn random_below(bound: &BigUint) -> Result<BigUint, BgnError> {
    if bound.is_zero() {
        return Err(BgnError::InvalidParameters(
            "Cannot sample below a zero bound".to_string(),
        ));
    }

    let bits = bound.bits();
    let len = bits.div_ceil(8) as usize;
    let excess = len * 8 - bits as usize;
    let mut buf = vec![0u8; len];

    loop {
        fill(&mut buf)?;
        buf[0] &= 0xff >> excess;
        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

/// Samples a random prime of exactly `bits` bits.
pub fn random_prime(bits: usize) -> Result<BigUint, BgnError> {
    if bits < 2 {
        return Err(BgnError::PrimeGeneration(format!(
            "Cannot generate a {}-bit prime",
            bits
        )));
    }

    let len = bits.div_ceil(8);
    let excess = len * 8 - bits;
    let mut buf = vec![0u8; len];

    for _ in 0..MAX_PRIME_ATTEMPTS {
        fill(&mut buf)?;
        buf[0] &= 0xff >> excess;
        // force the top bit so the prime has exactly `bits` bits, and make it odd
        let mut candidate = BigUint::from_bytes_be(&buf);
        candidate |= BigUint::one() << (bits - 1);
        candidate |= BigUint::one();

        if is_prime(&candidate, Some(PrimalityTestConfig::default())).probably() {
            return Ok(candidate);
        }
    }

    Err(BgnError::PrimeGeneration(format!(
        "No {}-bit prime found after {} candidates",
        bits, MAX_PRIME_ATTEMPTS
    )))
}

/// Probabilistic primality check shared with parameter generation.
pub fn probably_prime(candidate: &BigUint) -> bool {
    is_prime(candidate, Some(PrimalityTestConfig::default())).probably()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_below_stays_in_range() -> Result<(), BgnError> {
        let bound = BigUint::from(1000u32);
        for _ in 0..200 {
            assert!(random_below(&bound)? < bound);
        }
        assert!(random_below(&BigUint::zero()).is_err());
        assert!(random_below(&BigUint::one())?.is_zero());
        Ok(())
    }

    #[test]
    fn test_random_below_is_not_constant() -> Result<(), BgnError> {
        let bound = BigUint::one() << 128;
        let a = random_below(&bound)?;
        let b = random_below(&bound)?;
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn test_random_prime_has_exact_bit_length() -> Result<(), BgnError> {
        for bits in [8usize, 17, 32, 64] {
            let p = random_prime(bits)?;
            assert_eq!(p.bits(), bits as u64);
            assert!(probably_prime(&p));
        }
        assert!(random_prime(1).is_err());
        Ok(())
    }
}
