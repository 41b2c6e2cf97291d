use crate::decrypt::DecryptionTables;
use crate::errors::BgnError;
use crate::keypair::params::{KeyGenParams, PolyEncodingParams};
use crate::pairing::random::{random_below, random_prime};
use crate::pairing::{G1Element, Group, GtElement, Pairing, TypeA1Params};
use crate::preset::encoding_table::EncodingTable;

use num_bigint::BigUint;

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

/// Attempts at drawing a generator before key generation gives up.
const MAX_GENERATOR_ATTEMPTS: usize = 1_000;

/// Attempts at drawing two primes above `2M` before key generation gives up.
const MAX_PRIME_TUPLE_ATTEMPTS: usize = 1_000;

/// Values derived from the key lazily and shared by every caller.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scratch {
    encoding_table: Option<EncodingTable>,
    /// `e(P, P)`
    paired_generator: Option<GtElement>,
    /// `e(Q, Q)`
    paired_blinding: Option<GtElement>,
}

/// The BGN public key, used for encryption and for homomorphic operations on ciphertexts.
#[derive(Debug)]
pub struct PublicKey {
    pub(crate) pairing: Pairing,
    /// Full-group generator `P` was projected from.
    pub(crate) g: G1Element,
    /// Generator of the order-`n` subgroup.
    pub(crate) p: G1Element,
    /// Blinding generator, of order `q1`.
    pub(crate) q: G1Element,
    pub(crate) n: BigUint,
    pub(crate) message_space: u64,
    pub(crate) deterministic: bool,
    pub(crate) poly: PolyEncodingParams,
    /// Guards the per-key memo of pairing-engine results.
    scratch: Mutex<Scratch>,
}

/// The decrypting party's key. Never serialized.
#[derive(Clone)]
pub struct SecretKey {
    /// The secret prime `q1`, used as decryption exponent.
    pub(crate) key: BigUint,
    /// Exponent used to derive the blinding generator at setup.
    pub(crate) r: BigUint,
    pub(crate) poly_base: u32,
    pub(crate) tables: Option<DecryptionTables>,
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("key", &"<redacted>")
            .field("poly_base", &self.poly_base)
            .field("tables_ready", &self.tables.is_some())
            .finish()
    }
}

impl Clone for PublicKey {
    fn clone(&self) -> Self {
        // A poisoned memo only loses cached values.
        let scratch = self.scratch.lock().map(|s| s.clone()).unwrap_or_default();

        Self {
            pairing: self.pairing.clone(),
            g: self.g.clone(),
            p: self.p.clone(),
            q: self.q.clone(),
            n: self.n.clone(),
            message_space: self.message_space,
            deterministic: self.deterministic,
            poly: self.poly.clone(),
            scratch: Mutex::new(scratch),
        }
    }
}

impl PublicKey {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        pairing: Pairing,
        g: G1Element,
        p: G1Element,
        q: G1Element,
        n: BigUint,
        message_space: u64,
        deterministic: bool,
        poly: PolyEncodingParams,
    ) -> Self {
        Self {
            pairing,
            g,
            p,
            q,
            n,
            message_space,
            deterministic,
            poly,
            scratch: Mutex::new(Scratch::default()),
        }
    }

    pub fn pairing(&self) -> &Pairing {
        &self.pairing
    }

    /// Order of the message group, `n = q1·q2`.
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    pub fn message_space(&self) -> u64 {
        self.message_space
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    pub fn poly_params(&self) -> &PolyEncodingParams {
        &self.poly
    }

    pub fn generator(&self) -> &G1Element {
        &self.p
    }

    pub fn blinding_generator(&self) -> &G1Element {
        &self.q
    }

    fn scratch(&self) -> Result<MutexGuard<'_, Scratch>, BgnError> {
        self.scratch.lock().map_err(|_| BgnError::LockPoisoned)
    }

    /// `e(P, P)`, computed once per key.
    pub(crate) fn paired_generator(&self) -> Result<GtElement, BgnError> {
        let mut scratch = self.scratch()?;
        if let Some(value) = &scratch.paired_generator {
            return Ok(value.clone());
        }
        let value = self.pairing.pair(&self.p, &self.p)?;
        scratch.paired_generator = Some(value.clone());

        Ok(value)
    }

    /// `e(Q, Q)`, the level-2 blinding base, computed once per key.
    pub(crate) fn paired_blinding(&self) -> Result<GtElement, BgnError> {
        let mut scratch = self.scratch()?;
        if let Some(value) = &scratch.paired_blinding {
            return Ok(value.clone());
        }
        let value = self.pairing.pair(&self.q, &self.q)?;
        scratch.paired_blinding = Some(value.clone());

        Ok(value)
    }

    /// `P^digit` from the encoding table, building the table on first use.
    pub(crate) fn encode_digit(&self, digit: i64) -> Result<G1Element, BgnError> {
        let g1 = self.pairing.g1();
        let mut scratch = self.scratch()?;
        let table = scratch
            .encoding_table
            .get_or_insert_with(|| EncodingTable::build(&g1, &self.p, self.poly.poly_base));

        table.lookup(&g1, digit).ok_or_else(|| {
            BgnError::InvalidParameters(format!(
                "Digit {} is outside the encoding table of base {}",
                digit, self.poly.poly_base
            ))
        })
    }

    pub(crate) fn compute_encoding_table(&self) -> Result<(), BgnError> {
        self.encode_digit(0).map(|_| ())
    }
}

impl SecretKey {
    pub fn poly_base(&self) -> u32 {
        self.poly_base
    }

    /// The exponent `R` with `Q = P^(R·q2)`.
    pub fn blinding_exponent(&self) -> &BigUint {
        &self.r
    }

    /// Whether [`SecretKey::setup_decryption`] has run.
    pub fn is_ready(&self) -> bool {
        self.tables.is_some()
    }
}

/// Creates a new public/secret key pair.
pub fn generate_keypair(params: &KeyGenParams) -> Result<(PublicKey, SecretKey), BgnError> {
    params.validate()?;

    let (q1, q2) = new_prime_tuple(params.key_bits, params.message_space)?;

    // compute the product of the primes
    let n = &q1 * &q2;
    let pairing = Pairing::new(TypeA1Params::generate(&n)?)?;
    let g1 = pairing.g1();

    // project a full-group point onto the order-n subgroup
    let l = pairing.params().cofactor().clone();
    let (g, p) = find_generator(&pairing, &q1, &q2, &(l * 4u32))?;

    // Q = P^(R·q2) has order q1, so raising to q1 strips it
    let (r, q) = loop {
        let r = random_below(&n)?;
        let q = g1.pow_uint(&g1.pow_uint(&p, &r), &q2);
        if !g1.is_identity(&q) {
            break (r, q);
        }
    };

    let public_key = PublicKey::assemble(
        pairing,
        g,
        p,
        q,
        n,
        params.message_space,
        params.deterministic,
        params.poly.clone(),
    );
    public_key.compute_encoding_table()?;

    let secret_key = SecretKey {
        key: q1,
        r,
        poly_base: params.poly.poly_base,
        tables: None,
    };

    debug!(
        key_bits = params.key_bits,
        message_space = params.message_space,
        deterministic = params.deterministic,
        "generated BGN key pair"
    );

    Ok((public_key, secret_key))
}

/// Two distinct primes of `key_bits / 2` bits, both above `2M` so that a
/// negative plaintext never collides with a positive one after the blinding
/// is stripped.
fn new_prime_tuple(key_bits: usize, message_space: u64) -> Result<(BigUint, BigUint), BgnError> {
    let half = key_bits / 2;
    let floor = BigUint::from(message_space) << 1u32;
    if floor.bits() > half as u64 {
        return Err(BgnError::MessageSpaceTooLarge { message_space });
    }

    for _ in 0..MAX_PRIME_TUPLE_ATTEMPTS {
        let q1 = random_prime(half)?;
        let q2 = random_prime(half)?;
        if q1 != q2 && q1 > floor && q2 > floor {
            return Ok((q1, q2));
        }
    }

    Err(BgnError::MessageSpaceTooLarge { message_space })
}

/// Draws full-group points until one projects (by `projector`) onto a
/// generator of the whole order-`n` subgroup, i.e. neither `P^q1` nor `P^q2`
/// is the identity.
fn find_generator(
    pairing: &Pairing,
    q1: &BigUint,
    q2: &BigUint,
    projector: &BigUint,
) -> Result<(G1Element, G1Element), BgnError> {
    let g1 = pairing.g1();
    for _ in 0..MAX_GENERATOR_ATTEMPTS {
        let g = pairing.random_point()?;
        let p = g1.pow_uint(&g, projector);
        if g1.is_identity(&g1.pow_uint(&p, q1)) || g1.is_identity(&g1.pow_uint(&p, q2)) {
            continue;
        }
        return Ok((g, p));
    }

    Err(BgnError::InternalError(
        "Could not find a generator of the order-n subgroup".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use num_bigint::BigInt;
    use num_traits::Zero;

    fn keypair(bits: usize, message_space: u64) -> (PublicKey, SecretKey) {
        let params = KeyGenParams::try_with(bits, message_space, 3, 3, 0.0001, false).unwrap();
        generate_keypair(&params).unwrap()
    }

    #[test]
    fn test_generated_key_structure() {
        let (pk, sk) = keypair(64, 100);
        let g1 = pk.pairing().g1();

        assert!(matches!(pk.modulus().bits(), 63 | 64));
        assert!(pk.modulus() % &sk.key == BigUint::zero());
        assert!(g1.in_subgroup(pk.generator()));
        // the blinding generator dies under the secret exponent
        assert!(g1.is_identity(&g1.pow_uint(pk.blinding_generator(), &sk.key)));
        assert!(!g1.is_identity(&g1.pow_uint(pk.generator(), &sk.key)));
        assert!(!sk.is_ready());
    }

    #[test]
    fn test_smallest_key_size() {
        for _ in 0..10 {
            let (pk, sk) = keypair(16, 100);
            let cofactor = pk.modulus() / &sk.key;
            // both primes clear 2M, so -x and n - x never meet in [0, M]
            assert!(sk.key > BigUint::from(200u32));
            assert!(cofactor > BigUint::from(200u32));
            assert!(!pk.generator().is_identity());
        }
    }

    #[test]
    fn test_message_space_needs_twice_its_size() {
        // 2·128 does not fit in 8 bits
        let params = KeyGenParams::try_with(16, 128, 3, 3, 0.0001, false).unwrap();
        assert!(matches!(
            generate_keypair(&params),
            Err(BgnError::MessageSpaceTooLarge { message_space: 128 })
        ));
    }

    #[test]
    fn test_blinding_exponent_derives_blinding_generator() {
        let (pk, sk) = keypair(32, 100);
        let g1 = pk.pairing().g1();
        let q2 = pk.modulus() / &sk.key;

        let blinding = g1.pow_uint(&g1.pow_uint(pk.generator(), sk.blinding_exponent()), &q2);
        assert_eq!(&blinding, pk.blinding_generator());
    }

    #[test]
    fn test_message_space_above_prime_is_rejected() {
        // 8-bit primes are below 256
        let params = KeyGenParams::try_with(16, 1_000, 3, 3, 0.0001, false).unwrap();
        assert!(matches!(
            generate_keypair(&params),
            Err(BgnError::MessageSpaceTooLarge { message_space: 1_000 })
        ));
    }

    #[test]
    fn test_paired_values_are_memoized() -> Result<(), BgnError> {
        let (pk, _) = keypair(32, 100);
        let first = pk.paired_blinding()?;
        assert_eq!(pk.paired_blinding()?, first);
        assert_eq!(pk.clone().paired_blinding()?, first);

        let gt = pk.pairing().gt();
        assert!(!gt.is_identity(&pk.paired_generator()?));
        Ok(())
    }

    #[test]
    fn test_encode_digit_uses_generator() -> Result<(), BgnError> {
        let (pk, _) = keypair(32, 100);
        let g1 = pk.pairing().g1();
        assert_eq!(pk.encode_digit(2)?, g1.pow(pk.generator(), &BigInt::from(2)));
        assert_eq!(pk.encode_digit(-1)?, g1.inverse(pk.generator()));
        assert_eq!(pk.encode_digit(0)?, G1Element::Identity);
        assert!(pk.encode_digit(3).is_err());
        Ok(())
    }
}
