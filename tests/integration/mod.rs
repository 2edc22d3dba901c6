//! Integration test suite for the mathreel pipeline.
//!
//! These tests exercise the full path from request to delivered video using a
//! queue-backed mock model client and a stub render script standing in for
//! manim. No network calls, no real renders; safe for CI.
//!
//! # Test Categories
//!
//! - `pipeline`: single-reel end-to-end tests (generation, persistence, render)
//! - `batch_isolation`: per-task failure isolation and ledger ordering

mod fixtures;

mod batch_isolation;
mod pipeline;
