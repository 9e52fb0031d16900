//! Benchmark of the max-star operators and batch decoding
//!
//! Times single-block decoding for every operator, then compares sequential
//! and parallel decoding of a batch of blocks.

use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use std::time::Instant;
use turbo_siso::{decode_blocks, Correlation, MaxStarKind, SisoConfig, SisoDecoder, SisoInput, Trellis};

const INFO_LEN: usize = 6144;
const REPEATS: usize = 20;
const BATCH: usize = 64;

/// Noisy channel LLRs around the all-zero codeword
fn channel_llrs(rng: &mut StdRng, len: usize, es_n0_db: f32) -> Vec<f32> {
    let variance = 1.0 / (2.0 * 10f32.powf(es_n0_db / 10.0));
    let noise = Normal::new(0.0f32, variance.sqrt()).expect("valid noise deviation");
    (0..len)
        .map(|_| 2.0 * (-1.0 + noise.sample(&mut *rng)) / variance)
        .collect()
}

fn main() {
    turbo_siso::tracing_init::init_tracing();

    println!("\n=== SISO Decode Benchmark ===\n");

    let mut rng = StdRng::seed_from_u64(42);
    let test_trellises = vec![
        ("(7,5) K=3", vec![0o7, 0o5]),
        ("LTE (13,15) K=4", vec![0o13, 0o15]),
        ("(23,35) K=5", vec![0o23, 0o35]),
    ];

    for (name, generators) in &test_trellises {
        let trellis = Trellis::rsc(generators).expect("valid generators");
        let channel = channel_llrs(&mut rng, trellis.symbol_width() * (INFO_LEN + trellis.memory()), 0.0);
        let apriori = vec![0.0f32; INFO_LEN];

        println!("Trellis: {} ({} states), {} data bits", name, trellis.num_states(), INFO_LEN);

        for kind in MaxStarKind::ALL {
            let config = SisoConfig { max_star: kind, ..SisoConfig::default() };
            let mut decoder = SisoDecoder::new(&trellis, config);
            let mut output = Default::default();
            decoder.decode_into(&channel, &apriori, &mut output).expect("decode failed");

            let start = Instant::now();
            for _ in 0..REPEATS {
                decoder.decode_into(&channel, &apriori, &mut output).expect("decode failed");
            }
            let elapsed = start.elapsed();
            let per_block = elapsed / REPEATS as u32;

            println!(
                "  {:<8} {:>10.2?} per block, {:>7.2} Mbit/s",
                kind.name(),
                per_block,
                INFO_LEN as f64 / per_block.as_secs_f64() / 1.0e6
            );
        }
        println!();
    }

    println!("Batch: {} blocks of {} bits, LTE trellis, table operator", BATCH, INFO_LEN);
    let trellis = Trellis::rsc(&[0o13, 0o15]).expect("valid generators");
    let channels: Vec<Vec<f32>> = (0..BATCH)
        .map(|_| channel_llrs(&mut rng, 2 * (INFO_LEN + 3), 1.0))
        .collect();
    let apriori = vec![0.0f32; INFO_LEN];
    let inputs: Vec<SisoInput> = channels
        .iter()
        .map(|channel| SisoInput { channel_llr: channel, apriori_llr: &apriori })
        .collect();
    let config = SisoConfig { max_star: MaxStarKind::Table, ..SisoConfig::default() };

    let start = Instant::now();
    let mut decoder = SisoDecoder::new(&trellis, config);
    for input in &inputs {
        decoder.decode(input.channel_llr, input.apriori_llr).expect("decode failed");
    }
    let sequential = start.elapsed();

    let start = Instant::now();
    let results = decode_blocks(&trellis, &Correlation, &config, &inputs);
    let parallel = start.elapsed();
    let failures = results.iter().filter(|r| r.is_err()).count();

    println!("  Sequential: {:.2?}", sequential);
    println!("  Parallel:   {:.2?} ({} failures)", parallel, failures);
    println!("  Speedup:    {:.2}x", sequential.as_secs_f64() / parallel.as_secs_f64());

    println!("\n=== CPU Information ===");
    println!("Rayon thread pool size: {}", rayon::current_num_threads());
}
