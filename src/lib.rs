//! # tap-asana
//!
//! A Singer tap that extracts tasks and stories (comments) from the Asana
//! API and emits them as newline-delimited Singer messages on stdout.
//!
//! This library provides:
//! - Config and state loading with last-line-wins checkpoint parsing
//! - A paginated Asana client behind the [`asana::TaskSource`] trait
//! - A Singer message writer (SCHEMA / RECORD / STATE) over any sink
//! - The sequential extraction engine and checkpoint computation
//!
//! ## Data Flow
//! 1. Load config (`access_token`, `projects`) and optional prior state
//! 2. Write both stream schemas
//! 3. Per project: list tasks, fetch each detail and its stories, emit
//! 4. Write a fresh state checkpoint stamped at extraction completion
//!
//! ## Modules
//! - `asana`: upstream API client and the `TaskSource` seam
//! - `singer`: pipeline-protocol message writer and record counter
//! - `sync`: the extraction engine

pub mod asana;
pub mod config;
pub mod error;
pub mod schemas;
pub mod singer;
pub mod sync;

pub use config::{Config, State};
pub use error::{Result, TapError};
