//! Forward-backward results against enumeration of every codeword


use test_utils::{enumerate_posteriors, random_llrs, seeded_rng, Combine, Enumerated};
use turbo_siso::{siso, MaxStarKind, SisoOutput, Trellis};

fn assert_matches(label: &str, output: &SisoOutput, reference: &Enumerated, tolerance: f64) {
    let data = output.data_llr.iter().zip(&reference.data_llr);
    let coded = output.coded_llr.iter().zip(&reference.coded_llr);

    for (i, (&got, expected)) in data.chain(coded).enumerate() {
        match expected {
            Some(expected) => {
                let error = (got as f64 - expected).abs();
                assert!(
                    error <= tolerance * expected.abs().max(1.0),
                    "{}: LLR {} is {}, enumeration gives {}",
                    label,
                    i,
                    got,
                    expected
                );
            }
            // Bit fixed by the code: only one class of codewords exists
            None => assert!(got.abs() > 1.0e3, "{}: LLR {} of a fixed bit is {}", label, i, got),
        }
    }
}

fn check(generators: &[usize], info_len: usize, seed: u64, kind: MaxStarKind, combine: Combine) {
    let trellis = Trellis::rsc(generators).unwrap();
    let mut rng = seeded_rng(seed);
    let stages = info_len + trellis.memory();
    let channel = random_llrs(&mut rng, trellis.symbol_width() * stages, 2.0);
    let apriori = random_llrs(&mut rng, info_len, 1.0);

    let output = siso(&trellis, &channel, &apriori, kind).unwrap();
    let reference = enumerate_posteriors(&trellis, &channel, &apriori, combine);

    let label = format!("{:?} LL={} seed={} {}", generators, info_len, seed, kind);
    assert_matches(&label, &output, &reference, 1.0e-3);
}

#[test]
fn test_exact_matches_enumeration_rate_half() {
    for seed in 0..5 {
        check(&[0o7, 0o5], 6, seed, MaxStarKind::Exact, Combine::LogSumExp);
    }
}

#[test]
fn test_exact_matches_enumeration_lte_constituent() {
    for seed in 10..13 {
        check(&[0o13, 0o15], 7, seed, MaxStarKind::Exact, Combine::LogSumExp);
    }
}

#[test]
fn test_exact_matches_enumeration_rate_third() {
    check(&[0o13, 0o15, 0o17], 5, 42, MaxStarKind::Exact, Combine::LogSumExp);
}

#[test]
fn test_max_log_matches_best_codeword() {
    for seed in 20..25 {
        check(&[0o7, 0o5], 6, seed, MaxStarKind::Max, Combine::Max);
    }
    check(&[0o13, 0o15], 6, 99, MaxStarKind::Max, Combine::Max);
}

#[test]
fn test_single_bit_block() {
    check(&[0o7, 0o5], 1, 7, MaxStarKind::Exact, Combine::LogSumExp);
}
