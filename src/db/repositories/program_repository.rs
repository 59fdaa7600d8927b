use sqlx::{Error, PgPool};
use uuid::Uuid;

use crate::db::models::{Program, ProgramAssignment};

pub struct ProgramRepository;

impl ProgramRepository {
    pub async fn get_program(pool: &PgPool, program_id: Uuid) -> Result<Option<Program>, Error> {
        sqlx::query_as::<_, Program>(
            r#"
            SELECT id, school_id, name, sport, description, is_active, created_at, updated_at
            FROM programs
            WHERE id = $1
            "#,
        )
        .bind(program_id)
        .fetch_optional(pool)
        .await
    }

    /// Programs the coach is currently assigned to, in assignment order.
    pub async fn coach_assignments(
        pool: &PgPool,
        coach_id: Uuid,
    ) -> Result<Vec<ProgramAssignment>, Error> {
        sqlx::query_as::<_, ProgramAssignment>(
            r#"
            SELECT id, program_id, coach_id, created_at
            FROM program_assignments
            WHERE coach_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(coach_id)
        .fetch_all(pool)
        .await
    }
}
