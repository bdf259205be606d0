//! Medication record and wire types.

use crate::services::cost::total_cost;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row in the `medications` table.
///
/// `code` and `name` are unique case-insensitively; `coverage_percentage`
/// is expected in [0,1] but intentionally not enforced.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Medication {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub coverage_percentage: f64,
    pub deductible: f64,
}

/// Input for creating or replacing a medication. All four fields are
/// required; update has no partial semantics.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MedicationRequest {
    pub code: String,
    pub name: String,
    pub coverage_percentage: f64,
    pub deductible: f64,
}

/// Wire representation returned by the medication endpoints. `total_cost`
/// is derived on the way out and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationResponse {
    pub code: String,
    pub medication_name: String,
    pub coverage_percentage: f64,
    pub deductible: f64,
    pub total_cost: f64,
}

impl From<Medication> for MedicationResponse {
    fn from(medication: Medication) -> Self {
        let total_cost = total_cost(medication.coverage_percentage, medication.deductible);
        Self {
            code: medication.code,
            medication_name: medication.name,
            coverage_percentage: medication.coverage_percentage,
            deductible: medication.deductible,
            total_cost,
        }
    }
}

/// Confirmation returned after a delete, echoing the removed row's code.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub detail: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_carries_derived_cost() {
        let medication = Medication {
            id: 1,
            code: "M1234".to_string(),
            name: "Aspirin1".to_string(),
            coverage_percentage: 0.8,
            deductible: 10.0,
        };

        let response = MedicationResponse::from(medication);
        assert_eq!(response.medication_name, "Aspirin1");
        assert_eq!(response.total_cost, 2.0);
    }

    #[test]
    fn response_serializes_name_as_medication_name() {
        let medication = Medication {
            id: 7,
            code: "M1240".to_string(),
            name: "Ibuprofen".to_string(),
            coverage_percentage: 0.5,
            deductible: 20.0,
        };

        let json = serde_json::to_value(MedicationResponse::from(medication)).unwrap();
        assert_eq!(json["medication_name"], "Ibuprofen");
        assert!(json.get("id").is_none());
    }
}
