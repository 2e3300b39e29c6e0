#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for get-documents
//!
//! This library holds the functionality of the `get-documents` tool, which exports the
//! documents of a document-extraction project into a spreadsheet, one row per document.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`documents`]: API client and the per-project fetch loop
//! - [`flatten`]: Nested entity trees to flat column/value records
//! - [`export`]: Table assembly and the xlsx/CSV writers

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod commands;
pub mod documents;
pub mod export;
pub mod flatten;

pub use crate::commands::{Host, run};
