//! Medication insurance lookup service.
//!
//! Exposes CRUD operations over a single `medications` table plus a chat
//! endpoint that relays messages to a text-generation model.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::AppState;
