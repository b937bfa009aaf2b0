//! Test fixtures for collection-planner.
//!
//! Provides realistic Penang bin sites with coordinates and fill levels.

#![allow(dead_code)]

pub mod penang_bins;

pub use penang_bins::*;
