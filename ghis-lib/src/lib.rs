#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for ghis
//!
//! This library consolidates all functionality for the ghis tool, which
//! reconstructs how many GitHub issues were open at every moment and charts
//! the counts per category.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`fetch`]: GitHub REST API and export readers producing issue tables
//! - [`dataset`]: The issue, label and milestone tables
//! - [`series`]: Event extraction and running-count series building
//! - [`reports`]: Chart rendering in multiple formats

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod dataset;
#[cfg(not(any(debug_assertions, test)))]
mod dataset;

#[cfg(any(debug_assertions, test))]
pub mod fetch;
#[cfg(not(any(debug_assertions, test)))]
mod fetch;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

#[cfg(any(debug_assertions, test))]
pub mod series;
#[cfg(not(any(debug_assertions, test)))]
mod series;

pub use crate::commands::{Host, run};
