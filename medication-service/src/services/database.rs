//! Database access for medication-service.

use crate::models::{Medication, MedicationRequest};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "medication-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Fetch a medication by primary key.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Medication>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_by_id"])
            .start_timer();

        let medication = sqlx::query_as::<_, Medication>(
            "SELECT id, code, name, coverage_percentage, deductible \
             FROM medications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to fetch medication: {}", e)))?;

        timer.observe_duration();
        Ok(medication)
    }

    /// Case-insensitive lookup by medication code.
    #[instrument(skip(self))]
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Medication>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_by_code"])
            .start_timer();

        let medication = sqlx::query_as::<_, Medication>(
            "SELECT id, code, name, coverage_percentage, deductible \
             FROM medications WHERE LOWER(code) = LOWER($1)",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to fetch medication: {}", e)))?;

        timer.observe_duration();
        Ok(medication)
    }

    /// Case-insensitive lookup by medication name.
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Medication>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_by_name"])
            .start_timer();

        let medication = sqlx::query_as::<_, Medication>(
            "SELECT id, code, name, coverage_percentage, deductible \
             FROM medications WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to fetch medication: {}", e)))?;

        timer.observe_duration();
        Ok(medication)
    }

    /// First row colliding with the given code or name, case-insensitively.
    /// Used by create to reject duplicates with a descriptive error.
    #[instrument(skip(self))]
    pub async fn find_conflicting(
        &self,
        code: &str,
        name: &str,
    ) -> Result<Option<Medication>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_conflicting"])
            .start_timer();

        let medication = sqlx::query_as::<_, Medication>(
            "SELECT id, code, name, coverage_percentage, deductible \
             FROM medications WHERE LOWER(code) = LOWER($1) OR LOWER(name) = LOWER($2)",
        )
        .bind(code)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to check for duplicates: {}", e))
        })?;

        timer.observe_duration();
        Ok(medication)
    }

    /// Insert a new medication row.
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn insert(&self, input: &MedicationRequest) -> Result<Medication, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert"])
            .start_timer();

        let medication = sqlx::query_as::<_, Medication>(
            r#"
            INSERT INTO medications (code, name, coverage_percentage, deductible)
            VALUES ($1, $2, $3, $4)
            RETURNING id, code, name, coverage_percentage, deductible
            "#,
        )
        .bind(&input.code)
        .bind(&input.name)
        .bind(input.coverage_percentage)
        .bind(input.deductible)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to insert medication"))?;

        timer.observe_duration();
        Ok(medication)
    }

    /// Overwrite all four fields of an existing row. Returns `None` when the
    /// id does not exist.
    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn update(
        &self,
        id: i32,
        input: &MedicationRequest,
    ) -> Result<Option<Medication>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update"])
            .start_timer();

        let medication = sqlx::query_as::<_, Medication>(
            r#"
            UPDATE medications
            SET code = $2, name = $3, coverage_percentage = $4, deductible = $5
            WHERE id = $1
            RETURNING id, code, name, coverage_percentage, deductible
            "#,
        )
        .bind(id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(input.coverage_percentage)
        .bind(input.deductible)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update medication"))?;

        timer.observe_duration();
        Ok(medication)
    }

    /// Delete a row by id, returning it when it existed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<Option<Medication>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete"])
            .start_timer();

        let medication = sqlx::query_as::<_, Medication>(
            "DELETE FROM medications WHERE id = $1 \
             RETURNING id, code, name, coverage_percentage, deductible",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete medication: {}", e)))?;

        timer.observe_duration();
        Ok(medication)
    }
}

/// A unique-index violation means the caller lost the check-then-write race
/// to a concurrent request; everything else is a store failure.
fn map_write_error(e: sqlx::Error, context: &str) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.code().as_deref() == Some("23505") {
            return AppError::Conflict(anyhow::anyhow!(
                "Medication with the same code or name already exists"
            ));
        }
    }
    AppError::DatabaseError(anyhow::anyhow!("{}: {}", context, e))
}
