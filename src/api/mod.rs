//! HTTP surface

pub mod endpoints;
