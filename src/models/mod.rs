//! Response data models
//!
//! This module contains the attribute tree over decoded JSON and the
//! normalized response shape returned to clients.

pub mod attr;
pub mod response;
