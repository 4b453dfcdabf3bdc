//! Shopfront Core - Shared types and validation rules.
//!
//! This crate provides the pieces of Shopfront that need no I/O:
//! - typed identifiers, emails, prices, users and products
//! - the password rule engine
//! - form validation for login, registration, profile editing and recovery
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no HTTP clients,
//! no storage. The `shopfront-client` crate builds the session, auth, cart
//! and order flows on top of it.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, roles and records
//! - [`password`] - Password strength and confirmation rules
//! - [`validation`] - Rule violations and per-field error sets
//! - [`forms`] - Form validators producing validated inputs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod forms;
pub mod password;
pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{Field, FieldErrors, ValidationResult, Violation};
