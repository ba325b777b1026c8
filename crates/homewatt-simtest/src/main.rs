//! HomeWatt Headless Harness
//!
//! Validates the reference tables and the assessment pipeline without a
//! server. Runs entirely in-process — no HTTP, no storage, no UI.
//!
//! Usage:
//!   cargo run -p homewatt-simtest
//!   cargo run -p homewatt-simtest -- --verbose
//!   cargo run -p homewatt-simtest -- --reference data/reference.json
//!   cargo run -p homewatt-simtest -- --request household.json

use std::path::{Path, PathBuf};

use homewatt_logic::efficiency::{EfficiencyTier, TierBands};
use homewatt_logic::estimator::{consumption_breakdown, estimate_consumption, ConsumptionResult};
use homewatt_logic::profile::Profile;
use homewatt_logic::progress::ProgressLog;
use homewatt_logic::recommendations::{generate_actions, plan_actions, OptimizationAction};
use homewatt_logic::reference::ReferenceData;
use homewatt_logic::rules::{detect_inefficiencies, Cause, CauseTag, Finding, Inefficiency};
use homewatt_logic::usage::UsageAnswers;
use serde::{Deserialize, Serialize};

// ── Bundled data (same JSON the tests use) ──────────────────────────────
const REFERENCE_JSON: &str = include_str!("../../../data/reference.json");
const SAMPLES_JSON: &str = include_str!("../../../data/sample_households.json");

#[derive(Debug, Deserialize)]
struct Sample {
    name: String,
    profile: Profile,
    usage: UsageAnswers,
    expect_causes: Vec<String>,
    expect_electricity_total: f64,
    expect_water_total: f64,
}

// ── Request mode ────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Request {
    profile: Profile,
    usage: UsageAnswers,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Response {
    consumption: ConsumptionResult,
    inefficiencies: Vec<Inefficiency>,
    optimization_actions: Vec<OptimizationAction>,
}

// ── Command line ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Args {
    verbose: bool,
    reference: Option<PathBuf>,
    request: Option<PathBuf>,
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = argv.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" | "-v" => args.verbose = true,
            "--reference" => {
                let path = iter.next().ok_or("--reference needs a path")?;
                args.reference = Some(PathBuf::from(path));
            }
            "--request" => {
                let path = iter.next().ok_or("--request needs a path")?;
                args.request = Some(PathBuf::from(path));
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(args)
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: homewatt-simtest [--verbose] [--reference <path>] [--request <path>]");
            std::process::exit(2);
        }
    };

    let reference = match &args.reference {
        Some(path) => match ReferenceData::load(path) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            log::info!("Using built-in reference data");
            ReferenceData::default()
        }
    };

    if let Some(path) = &args.request {
        if let Err(e) = answer_request(&reference, path) {
            eprintln!("Failed to answer {}: {}", path.display(), e);
            std::process::exit(1);
        }
        return;
    }

    let verbose = args.verbose;
    println!("=== HomeWatt Harness ===\n");

    let mut results = Vec::new();

    // 1. Reference data
    results.extend(validate_reference_data(&reference, verbose));

    // 2. Sample households (pinned to the bundled tables)
    results.extend(validate_sample_households(verbose));

    // 3. Efficiency tier boundaries
    results.extend(validate_tier_boundaries(&reference, verbose));

    // 4. Rules and advice
    results.extend(validate_recommendations(&reference, verbose));

    // 5. Estimator properties
    results.extend(validate_estimator_properties(&reference, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn answer_request(reference: &ReferenceData, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    let request: Request = serde_json::from_str(&json)?;
    log::info!("Answering request from {}", path.display());
    let response = respond(reference, &request);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn respond(reference: &ReferenceData, request: &Request) -> Response {
    let consumption = estimate_consumption(reference, &request.profile, &request.usage);
    let inefficiencies = detect_inefficiencies(reference, &request.profile, &request.usage);
    let optimization_actions = generate_actions(reference, &inefficiencies);
    log::info!(
        "{:?} household of {}: {} kWh, {} L/day, {} actions",
        request.profile.region,
        request.profile.residents,
        consumption.electricity.total,
        consumption.water.total,
        optimization_actions.len()
    );
    Response {
        consumption,
        inefficiencies,
        optimization_actions,
    }
}

fn load_samples() -> Result<Vec<Sample>, serde_json::Error> {
    serde_json::from_str(SAMPLES_JSON)
}

// ── 1. Reference Data ───────────────────────────────────────────────────

fn validate_reference_data(reference: &ReferenceData, verbose: bool) -> Vec<TestResult> {
    println!("--- Reference Data ---");
    let mut results = Vec::new();

    let problems = reference.validate();
    results.push(TestResult {
        name: "reference_valid".into(),
        passed: problems.is_empty(),
        detail: if problems.is_empty() {
            "no problems found".into()
        } else {
            problems.join("; ")
        },
    });

    match ReferenceData::from_json_str(REFERENCE_JSON) {
        Ok(bundled) => {
            results.push(TestResult {
                name: "bundled_matches_defaults".into(),
                passed: bundled == ReferenceData::default(),
                detail: "data/reference.json agrees with built-in tables".into(),
            });
        }
        Err(e) => {
            results.push(TestResult {
                name: "bundled_parse".into(),
                passed: false,
                detail: format!("data/reference.json: {}", e),
            });
        }
    }

    let bands = &reference.bands;
    results.push(TestResult {
        name: "bands_ascending".into(),
        passed: bands.electricity.is_ascending() && bands.water.is_ascending(),
        detail: format!(
            "electricity {}/{}/{}, water {}/{}/{}",
            bands.electricity.efficient,
            bands.electricity.moderate,
            bands.electricity.inefficient,
            bands.water.efficient,
            bands.water.moderate,
            bands.water.inefficient
        ),
    });

    if verbose {
        println!(
            "  age factor {}/yr, leak factor {}",
            reference.age_factor_per_year, reference.water_usage.leakage_factor
        );
    }

    results
}

// ── 2. Sample Households ────────────────────────────────────────────────

fn validate_sample_households(verbose: bool) -> Vec<TestResult> {
    println!("--- Sample Households ---");
    let mut results = Vec::new();

    let samples = match load_samples() {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "samples_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let reference = ReferenceData::default();
    for s in &samples {
        let r = estimate_consumption(&reference, &s.profile, &s.usage);
        if verbose {
            println!(
                "  {}: {} kWh ({}), {} L/day ({})",
                s.name, r.electricity.total, r.electricity.efficiency, r.water.total, r.water.efficiency
            );
        }

        results.push(TestResult {
            name: format!("{}_totals", s.name),
            passed: r.electricity.total == s.expect_electricity_total
                && r.water.total == s.expect_water_total,
            detail: format!(
                "electricity {} (expected {}), water {} (expected {})",
                r.electricity.total,
                s.expect_electricity_total,
                r.water.total,
                s.expect_water_total
            ),
        });

        let found: Vec<String> = detect_inefficiencies(&reference, &s.profile, &s.usage)
            .iter()
            .map(|i| i.cause.as_str().to_string())
            .collect();
        results.push(TestResult {
            name: format!("{}_causes", s.name),
            passed: found == s.expect_causes,
            detail: format!("[{}]", found.join(", ")),
        });
    }

    results
}

// ── 3. Tier Boundaries ──────────────────────────────────────────────────

fn validate_tier_boundaries(reference: &ReferenceData, verbose: bool) -> Vec<TestResult> {
    println!("--- Efficiency Tiers ---");
    let mut results = Vec::new();

    for (utility, bands) in [
        ("electricity", &reference.bands.electricity),
        ("water", &reference.bands.water),
    ] {
        let mismatches = boundary_mismatches(bands);
        if verbose {
            println!(
                "  {}: {} → {}, {} → {}",
                utility,
                bands.efficient,
                bands.classify(bands.efficient),
                bands.efficient + 0.01,
                bands.classify(bands.efficient + 0.01)
            );
        }
        results.push(TestResult {
            name: format!("{}_tier_boundaries", utility),
            passed: mismatches.is_empty(),
            detail: if mismatches.is_empty() {
                "bounds inclusive, next cent moves up a tier".into()
            } else {
                mismatches.join("; ")
            },
        });
    }

    results
}

fn boundary_mismatches(bands: &TierBands) -> Vec<String> {
    let cases = [
        (0.0, EfficiencyTier::Efficient),
        (bands.efficient, EfficiencyTier::Efficient),
        (bands.efficient + 0.01, EfficiencyTier::Moderate),
        (bands.moderate, EfficiencyTier::Moderate),
        (bands.moderate + 0.01, EfficiencyTier::Inefficient),
        (bands.inefficient, EfficiencyTier::Inefficient),
        (bands.inefficient + 0.01, EfficiencyTier::HighlyInefficient),
    ];
    cases
        .iter()
        .filter(|(value, tier)| bands.classify(*value) != *tier)
        .map(|(value, tier)| format!("{} classified {}, expected {}", value, bands.classify(*value), tier))
        .collect()
}

// ── 4. Rules & Advice ───────────────────────────────────────────────────

fn validate_recommendations(reference: &ReferenceData, verbose: bool) -> Vec<TestResult> {
    println!("--- Rules & Advice ---");
    let mut results = Vec::new();

    // Every cause produces an action with its evidence filled in
    let findings = [
        Finding::AcAge { age: Some(14.0.into()) },
        Finding::AcRating { rating: Some(2.0.into()) },
        Finding::GeyserAge { age: Some(9.0.into()) },
        Finding::GeyserRating { rating: Some(1.0.into()) },
        Finding::RefrigeratorAge { age: Some(12.0.into()) },
        Finding::RefrigeratorRating { rating: Some(2.0.into()) },
        Finding::LightingType { kind: Some("CFL".into()) },
        Finding::ShowerFlow,
        Finding::ToiletFlush,
        Finding::GardeningWatering { size: Some("large".into()) },
    ];
    let covered: Vec<Cause> = findings.iter().map(Finding::cause).collect();
    let uncovered: Vec<&str> = Cause::all()
        .iter()
        .filter(|c| !covered.contains(c))
        .map(|c| c.tag())
        .collect();
    results.push(TestResult {
        name: "every_cause_has_template".into(),
        passed: uncovered.is_empty(),
        detail: if uncovered.is_empty() {
            format!("{} causes covered", Cause::all().len())
        } else {
            format!("missing: {}", uncovered.join(", "))
        },
    });

    let inefficiencies: Vec<Inefficiency> = findings.iter().cloned().map(Inefficiency::from).collect();
    let actions = generate_actions(reference, &inefficiencies);
    let unfilled: Vec<&str> = actions
        .iter()
        .filter(|a| a.action.contains('{'))
        .map(|a| a.issue.as_str())
        .collect();
    results.push(TestResult {
        name: "placeholders_filled".into(),
        passed: actions.len() == findings.len() && unfilled.is_empty(),
        detail: if unfilled.is_empty() {
            format!("{} actions generated", actions.len())
        } else {
            format!("unfilled placeholders in: {}", unfilled.join(", "))
        },
    });

    if verbose {
        for a in &actions {
            println!("  [{:?}/{:?}] {}: {} ({})", a.severity, a.effort, a.issue, a.action, a.savings);
        }
    }

    // Severity on every action matches the rule that raised it
    let severity_ok = inefficiencies
        .iter()
        .zip(&actions)
        .all(|(i, a)| i.severity == a.severity);
    results.push(TestResult {
        name: "action_severity_matches_rule".into(),
        passed: severity_ok,
        detail: "action severity equals inefficiency severity".into(),
    });

    // Unrecognised causes are skipped, not fatal
    let mut with_unknown = inefficiencies.clone();
    with_unknown.insert(
        1,
        Inefficiency {
            cause: CauseTag::Unrecognized("SOLAR_PANEL".into()),
            severity: homewatt_logic::rules::Severity::Low,
            data: Default::default(),
        },
    );
    let kept = generate_actions(reference, &with_unknown).len();
    results.push(TestResult {
        name: "unknown_cause_dropped".into(),
        passed: kept == actions.len(),
        detail: format!("{} inputs → {} actions", with_unknown.len(), kept),
    });

    let plan = plan_actions(reference, &inefficiencies);
    results.push(TestResult {
        name: "plan_partitions_actions".into(),
        passed: plan.electricity.len() + plan.water.len() == actions.len(),
        detail: format!(
            "{} electricity, {} water",
            plan.electricity.len(),
            plan.water.len()
        ),
    });

    results
}

// ── 5. Estimator Properties ─────────────────────────────────────────────

fn validate_estimator_properties(reference: &ReferenceData, verbose: bool) -> Vec<TestResult> {
    println!("--- Estimator Properties ---");
    let mut results = Vec::new();

    let samples = match load_samples() {
        Ok(s) => s,
        Err(_) => return results,
    };

    // Same input, same output
    let nondeterministic: Vec<&str> = samples
        .iter()
        .filter(|s| {
            estimate_consumption(reference, &s.profile, &s.usage)
                != estimate_consumption(reference, &s.profile, &s.usage)
        })
        .map(|s| s.name.as_str())
        .collect();
    results.push(TestResult {
        name: "deterministic".into(),
        passed: nondeterministic.is_empty(),
        detail: format!("{} households re-estimated", samples.len()),
    });

    // Non-negative figures everywhere
    let negative: Vec<&str> = samples
        .iter()
        .filter(|s| {
            let r = estimate_consumption(reference, &s.profile, &s.usage);
            [r.electricity.total, r.electricity.cost, r.water.total, r.water.cost]
                .iter()
                .any(|v| *v < 0.0)
        })
        .map(|s| s.name.as_str())
        .collect();
    results.push(TestResult {
        name: "non_negative".into(),
        passed: negative.is_empty(),
        detail: if negative.is_empty() {
            "all totals and costs ≥ 0".into()
        } else {
            negative.join(", ")
        },
    });

    // A reported leak scales the whole water figure
    let mut worst_ratio_error: f64 = 0.0;
    for s in &samples {
        let mut dry = s.usage.clone();
        dry.water.water_leakage = Some("no".into());
        let mut leaky = s.usage.clone();
        leaky.water.water_leakage = Some("yes".into());
        let dry_total = consumption_breakdown(reference, &s.profile, &dry).water.total();
        let leaky_total = consumption_breakdown(reference, &s.profile, &leaky).water.total();
        let expected = dry_total * reference.water_usage.leakage_factor;
        worst_ratio_error = worst_ratio_error.max((leaky_total - expected).abs());
    }
    results.push(TestResult {
        name: "leak_scales_total".into(),
        passed: worst_ratio_error < 1e-6,
        detail: format!("max deviation {:.2e} L/day", worst_ratio_error),
    });

    // Progress against an unchanged baseline is zero
    let mut log = ProgressLog::default();
    if let Some(s) = samples.first() {
        log.record(estimate_consumption(reference, &s.profile, &s.usage));
    }
    let zero_progress = log
        .report()
        .map(|p| p.electricity.improvement == 0.0 && p.water.improvement == 0.0)
        .unwrap_or(false);
    results.push(TestResult {
        name: "baseline_only_progress".into(),
        passed: zero_progress,
        detail: "baseline compared with itself shows no change".into(),
    });

    if verbose {
        let profile = Profile::default();
        let r = estimate_consumption(reference, &profile, &UsageAnswers::default());
        println!(
            "  empty questionnaire: {} kWh, {} L/day",
            r.electricity.total, r.water.total
        );
    }

    results
}
