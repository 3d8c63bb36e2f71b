use std::hint::black_box;
use std::time::{Duration, Instant};

use bcrypt_codec::constant_time_eq;

const SAMPLES: usize = 201;
const ITERATIONS: usize = 20_000;

fn median_time(a: &[u8], b: &[u8]) -> Duration {
    let mut samples: Vec<Duration> = (0..SAMPLES)
        .map(|_| {
            let start = Instant::now();
            for _ in 0..ITERATIONS {
                black_box(constant_time_eq(black_box(a), black_box(b)));
            }
            start.elapsed()
        })
        .collect();
    samples.sort();
    samples[SAMPLES / 2]
}

#[test]
#[ignore = "timing sensitive; run with --ignored on an idle machine"]
fn test_comparison_time_independent_of_difference_position() {
    let digest = [0x5au8; 23];
    let mut first = digest;
    first[0] ^= 0xff;
    let mut last = digest;
    last[22] ^= 0xff;

    // Warm up caches and frequency scaling.
    median_time(&digest, &first);

    let early = median_time(&digest, &first).as_nanos() as f64;
    let late = median_time(&digest, &last).as_nanos() as f64;
    let ratio = early / late;
    assert!(
        (0.8..1.25).contains(&ratio),
        "first-byte mismatch took {early}ns, last-byte mismatch took {late}ns"
    );
}
