//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for the domain concepts shared by
//! the auth, catalog and order flows.

pub mod email;
pub mod id;
pub mod identity;
pub mod price;
pub mod product;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use identity::{Identity, SessionIdentity};
pub use price::Price;
pub use product::{Category, Product};
pub use role::{Role, RoleError};
