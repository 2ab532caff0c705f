//! Fitness Coach core.
//!
//! Collects a user's profile, derives BMI, aligns the profile to the feature
//! layout of two pre-trained classifiers (diet plan and gym plan) and renders
//! their predictions next to rule-based advice.

pub mod advice;
pub mod config;
pub mod engine;
pub mod error;
pub mod form;
pub mod fs_manager;
pub mod interactive;
pub mod models;
pub mod preflight;
pub mod recommender;
pub mod report;

#[cfg(test)]
mod tests;

pub use error::AppError;
