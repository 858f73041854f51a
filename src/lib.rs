//! Timesheet → Jiffy converter library
//!
//! This module exports the conversion pipeline for the binary and for tests.

pub mod breaks;
pub mod cli;
pub mod config;
pub mod convert;
pub mod db;
pub mod error;
pub mod ids;
pub mod logging;
pub mod resolve;
pub mod rules;
pub mod source;
pub mod time;
pub mod types;
