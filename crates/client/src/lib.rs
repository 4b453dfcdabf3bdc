//! Shopfront client library.
//!
//! Everything a front end needs besides rendering:
//!
//! - [`storage`] - key-value store (file-backed, memory fallback)
//! - [`session`] - the current user's session record
//! - [`auth`] - login, register-then-login, logout
//! - [`api`] - user directory, product catalog and order service clients
//! - [`cart`] - cart persisted in the store, and checkout
//! - [`profile`] - profile edits
//! - [`recovery`] - password recovery requests
//! - [`config`] - environment-based configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod config;
pub mod profile;
pub mod recovery;
pub mod session;
pub mod storage;

pub use auth::{AuthError, AuthOrchestrator};
pub use cart::{CartItem, CartStore, Checkout, CheckoutError};
pub use config::{ConfigError, EndpointConfig, ShopfrontConfig};
pub use profile::{ProfileError, ProfileService};
pub use session::SessionManager;
pub use storage::{Storage, StorageError};
