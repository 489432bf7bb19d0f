//! # Translation Output
//!
//! Turns per-key translation artifacts into one localized string table per
//! target locale.

pub mod string_table;

pub use string_table::StringTable;
