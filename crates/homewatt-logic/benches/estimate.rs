//! Criterion benchmarks for the assessment pipeline.
//!
//! Benchmarks:
//!   - estimate_consumption on an empty and a fully answered questionnaire
//!   - detect_inefficiencies + generate_actions (all ten causes firing)
//!   - questionnaire decoding from form-style JSON
//!
//! Run with: cargo bench -p homewatt-logic --bench estimate

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use homewatt_logic::estimator::estimate_consumption;
use homewatt_logic::profile::{Profile, Region};
use homewatt_logic::recommendations::{generate_actions, optimize};
use homewatt_logic::reference::ReferenceData;
use homewatt_logic::rules::detect_inefficiencies;
use homewatt_logic::usage::UsageAnswers;

const WASTEFUL_USAGE: &str = r#"{
    "electricity": {
        "acUsage": "8", "acStarRating": "2", "acAge": "12",
        "geyserUsage": 45, "geyserStarRating": 1, "geyserAge": 10,
        "refrigeratorType": "double", "refrigeratorStarRating": 2, "refrigeratorAge": 15,
        "washingMachineType": "front-load", "washingMachineCycles": 6,
        "lightingType": "tube", "lightingDuration": 8,
        "fanCount": 4, "fanDuration": 12
    },
    "water": {
        "bathing": "shower", "showerFlowRate": "high", "bathFrequency": 2,
        "toiletFlushType": "single", "toiletFlushes": 6, "washingClothes": 7,
        "pumpUsage": 30, "gardening": "yes", "gardenSize": "large", "waterLeakage": "yes"
    }
}"#;

fn wasteful() -> UsageAnswers {
    serde_json::from_str(WASTEFUL_USAGE).expect("bench usage parses")
}

// ---------------------------------------------------------------------------
// Benchmark: estimate_consumption
// ---------------------------------------------------------------------------

fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_consumption");
    let reference = ReferenceData::default();
    let profile = Profile::new(Region::Mumbai, 2);
    let empty = UsageAnswers::default();
    let full = wasteful();

    group.bench_function("empty_questionnaire", |b| {
        b.iter(|| black_box(estimate_consumption(&reference, black_box(&profile), black_box(&empty))));
    });

    group.bench_function("full_questionnaire", |b| {
        b.iter(|| black_box(estimate_consumption(&reference, black_box(&profile), black_box(&full))));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: rules and advice
// ---------------------------------------------------------------------------

fn bench_recommendations(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommendations");
    let reference = ReferenceData::default();
    let profile = Profile::new(Region::Mumbai, 2);
    let usage = wasteful();
    let inefficiencies = detect_inefficiencies(&reference, &profile, &usage);

    group.bench_function("detect_inefficiencies", |b| {
        b.iter(|| black_box(detect_inefficiencies(&reference, &profile, black_box(&usage))));
    });

    group.bench_function("generate_actions", |b| {
        b.iter(|| black_box(generate_actions(&reference, black_box(&inefficiencies))));
    });

    group.bench_function("optimize", |b| {
        b.iter(|| black_box(optimize(&reference, &profile, black_box(&usage))));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: decoding
// ---------------------------------------------------------------------------

fn bench_decode(c: &mut Criterion) {
    c.bench_function("decode_usage_answers", |b| {
        b.iter(|| {
            let usage: UsageAnswers = serde_json::from_str(black_box(WASTEFUL_USAGE)).unwrap();
            black_box(usage)
        });
    });
}

criterion_group!(benches, bench_estimate, bench_recommendations, bench_decode);
criterion_main!(benches);
