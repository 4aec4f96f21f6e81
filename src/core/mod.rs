//! Core library components.
//!
//! This module contains the reusable logic for cluster authentication,
//! configuration handling, and support-chart deployment.

pub mod auth;
pub mod config;
pub mod constants;
pub mod decrypt;
pub mod envscope;
pub mod process;
pub mod registry;
pub mod support;
