//! Services module for medication-service.

pub mod cost;
pub mod database;
pub mod generator;
pub mod metrics;

pub use database::Database;
pub use metrics::{get_metrics, init_metrics, record_chat_generation, record_medication_operation};
