use bgn_crypto::errors::BgnError;
use bgn_crypto::{KeyGenParams, compute_decryption_preprocessing, generate_keypair};

use num_bigint::BigInt;
use rand::Rng;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("info"))
            .unwrap();
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_line_number(false)
            .with_file(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    });
}

const MAX_BID: i64 = 1_000;

/// Two bidders submit encrypted bids; the auctioneer only learns the sign of
/// their difference.
#[test]
fn showcase_sealed_bid_auction() -> Result<(), BgnError> {
    init_tracing();

    let params = KeyGenParams::try_with(64, MAX_BID as u64, 3, 3, 0.0001, false)?;
    let (pk, mut sk) = generate_keypair(&params)?;
    compute_decryption_preprocessing(&pk, &mut sk)?;

    let mut rng = rand::rng();
    for _ in 0..20 {
        let bids: [i64; 2] = [rng.random_range(0..MAX_BID), rng.random_range(0..MAX_BID)];

        let sealed = [
            pk.encrypt(&BigInt::from(bids[0]))?,
            pk.encrypt(&BigInt::from(bids[1]))?,
        ];
        let margin = sk.decrypt(&pk.sub(&sealed[0], &sealed[1])?, &pk)?;

        dbg!(&bids, &margin);

        let expected = bids[0].cmp(&bids[1]);
        let actual = margin.cmp(&BigInt::from(0));
        assert_eq!(expected, actual);
    }

    Ok(())
}

/// Independent key pairs run side by side with no shared state.
#[test]
fn showcase_pairwise_keys() -> Result<(), BgnError> {
    init_tracing();

    let params = KeyGenParams::try_with(64, 10_000, 3, 3, 0.0001, false)?;
    let mut parties = Vec::new();
    for _ in 0..2 {
        let (pk, mut sk) = generate_keypair(&params)?;
        compute_decryption_preprocessing(&pk, &mut sk)?;
        parties.push((pk, sk));
    }

    for (pk, sk) in &parties {
        let bid = pk.encrypt(&BigInt::from(73))?;
        let premium = pk.encrypt(&BigInt::from(-12))?;
        let total = pk.mult(&bid, &premium)?;
        assert_eq!(sk.decrypt(&total, pk)?, BigInt::from(-876));
    }

    Ok(())
}
