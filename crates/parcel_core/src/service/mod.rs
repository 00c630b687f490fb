//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into tracking use-cases.
//! - Keep the CLI decoupled from storage details.

pub mod parcel_service;
