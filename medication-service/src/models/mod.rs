//! Models module for medication-service.

pub mod medication;

pub use medication::{DeleteResponse, Medication, MedicationRequest, MedicationResponse};
