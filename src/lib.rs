//! gridcalc - Grid Calculator Library
//!
//! An interactive terminal grid widget with formula support, built in Rust.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::*;
pub use domain::*;
