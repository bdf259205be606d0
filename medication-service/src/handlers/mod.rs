//! HTTP handlers for the medication service.

pub mod chat;
pub mod health;
pub mod medications;
