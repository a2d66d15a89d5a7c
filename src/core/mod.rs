//! Core library components.
//!
//! This module contains the provisioning logic: configuration, store access,
//! resolution, host operations and the pipeline that ties them together.

pub mod atomic;
pub mod config;
pub mod constants;
pub mod domain;
pub mod host;
pub mod journal;
pub mod pipeline;
pub mod region;
pub mod resolve;
pub mod retry;
pub mod store;
pub mod types;
pub mod validation;
