//! Pure household consumption logic for HomeWatt.
//!
//! This crate contains the whole calculation core, independent of any HTTP
//! layer, storage, or UI. Functions take plain data (a [`profile::Profile`],
//! [`usage::UsageAnswers`] and an immutable [`reference::ReferenceData`]) and
//! return plain, serializable results. Nothing here fails on bad answers:
//! unanswered or malformed fields fall back to documented defaults.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`efficiency`] | Four-tier per-person efficiency bands |
//! | [`estimator`] | Monthly electricity / daily water totals, per-person figures, cost |
//! | [`lenient`] | Permissive decoding of form answers |
//! | [`profile`] | Region and resident count |
//! | [`progress`] | Baseline vs. current assessment comparison |
//! | [`recommendations`] | Advice templates, savings estimates, action generation |
//! | [`records`] | Stored profile/usage records and the annotated usage log |
//! | [`reference`] | Appliance ratings, water figures, multipliers; loading and validation |
//! | [`rules`] | Threshold rules that flag inefficiencies |
//! | [`tariffs`] | Regional electricity and water prices |
//! | [`usage`] | Questionnaire answers and their typed views |
//!
//! # Example
//!
//! ```
//! use homewatt_logic::estimator::estimate_consumption;
//! use homewatt_logic::profile::{Profile, Region};
//! use homewatt_logic::recommendations::optimize;
//! use homewatt_logic::reference::ReferenceData;
//! use homewatt_logic::usage::UsageAnswers;
//!
//! let reference = ReferenceData::default();
//! let profile = Profile::new(Region::Delhi, 2);
//! let mut usage = UsageAnswers::default();
//! usage.electricity.ac_usage = Some(4.0);
//! usage.water.toilet_flush_type = Some("single".into());
//!
//! let consumption = estimate_consumption(&reference, &profile, &usage);
//! assert_eq!(consumption.electricity.total, 210.0);
//!
//! let report = optimize(&reference, &profile, &usage);
//! assert_eq!(report.optimization_actions[0].issue, "Inefficient Toilet Flush");
//! ```

pub mod efficiency;
pub mod estimator;
pub mod lenient;
pub mod profile;
pub mod progress;
pub mod recommendations;
pub mod records;
pub mod reference;
pub mod rules;
pub mod tariffs;
pub mod usage;
