use bgn_crypto::{KeyGenParams, compute_decryption_preprocessing, generate_keypair};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use num_bigint::BigInt;

fn bench_happy_flow(c: &mut Criterion) {
    // 1) one‐time setup
    let params =
        KeyGenParams::try_with(128, 10_000, 3, 3, 0.0001, false).expect("build key params");
    let (pk, mut sk) = generate_keypair(&params).expect("generate key pair");
    compute_decryption_preprocessing(&pk, &mut sk).expect("build decryption tables");

    let a = BigInt::from(77);
    let b = BigInt::from(-45);

    c.bench_function("encrypt_add_decrypt", |bench| {
        bench.iter(|| {
            // 2) encrypt
            let ca = pk.encrypt(&a).expect("encrypt");
            let cb = pk.encrypt(&b).expect("encrypt");

            // 3) combine and decrypt
            let sum = pk.add(&ca, &cb).expect("add");
            black_box(sk.decrypt(&sum, &pk).expect("decrypt"));
        })
    });

    c.bench_function("mult_decrypt", |bench| {
        let ca = pk.encrypt(&a).expect("encrypt");
        let cb = pk.encrypt(&b).expect("encrypt");
        bench.iter(|| {
            let product = pk.mult(&ca, &cb).expect("mult");
            black_box(sk.decrypt(&product, &pk).expect("decrypt"));
        })
    });

    c.bench_function("encrypt_poly", |bench| {
        bench.iter(|| black_box(pk.encrypt_poly(3.14159).expect("encrypt poly")))
    });
}

criterion_group!(benches, bench_happy_flow);
criterion_main!(benches);
