// src/watch/mod.rs

//! Polling change detection.
//!
//! This module is responsible for:
//! - Resolving extension / glob rules into [`WatchRules`].
//! - Deciding per entry whether it is watched, skipped or pruned
//!   ([`filter`]).
//! - Walking the tree each cycle and reducing modification times to a single
//!   "something changed" answer ([`scanner`], [`detector`]).
//!
//! It knows nothing about processes; it only answers whether the pipeline
//! should run again.

pub mod detector;
pub mod filter;
pub mod path_utils;
pub mod rules;
pub mod scanner;

pub use detector::ChangeDetector;
pub use filter::{FilterStage, Verdict};
pub use rules::WatchRules;
pub use scanner::{scan, ScanOutcome, ScanState};
