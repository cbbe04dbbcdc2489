//! Core data structures for the unicorn companies analysis.
//!
//! This module defines the polars frame helpers the loader and the
//! missing-data strategies share, and the typed company records the
//! normalizer derives from the frame.

pub mod domain;
pub mod frame;

pub use domain::{columns, CompanyRecord, Dataset};
pub use frame::{text_frame, Cell};
