//! Feedback Hub - Conversational feedback and rating collector.
//!
//! This crate walks each user through a short dialog (category → item →
//! free-text feedback or a 1-5 score), persists the result, and exposes
//! an aggregated report to administrators.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
