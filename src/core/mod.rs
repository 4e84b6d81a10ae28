//! Core application modules
//!
//! This module contains configuration, constants, logging, the upstream
//! client and the prompt forwarding service.

pub mod catalog;
pub mod client;
pub mod config;
pub mod constants;
pub mod logging;
pub mod service;
