//! Hook Config Merge Library
//!
//! Folds configuration fragments shipped by hook packages into a host
//! application's configuration tree, honoring per-fragment `_dontMerge` and
//! `_delete` directives.

pub mod brand;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod hook;
pub mod logging;
