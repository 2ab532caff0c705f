//! Test Module
//!
//! Cross-module test suite for the fitness coach core.
//!
//! ## Test Categories
//! - `alignment_tests`: feature alignment for both column naming conventions
//! - `loader_tests`: artifact codecs, fallback order and load failures
//! - `predictor_tests`: strict feature modes, estimators and label decoding
//! - `recommender_tests`: report assembly with partial and total model failure
//! - `integration_tests`: the shipped sample models end to end

mod fixtures;

pub mod loader_tests;
pub mod predictor_tests;
