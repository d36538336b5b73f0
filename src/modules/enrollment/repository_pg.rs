use uuid::Uuid;

use crate::{
    api::error,
    modules::enrollment::{
        model::OwnedCourseRow, repository::EnrollmentRepository, schema::EnrollmentEntity,
    },
};

#[derive(Clone)]
pub struct EnrollmentRepositoryPg {
    pool: sqlx::PgPool,
}

impl EnrollmentRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl EnrollmentRepository for EnrollmentRepositoryPg {
    async fn find(
        &self,
        user_id: &Uuid,
        course_id: &Uuid,
    ) -> Result<Option<EnrollmentEntity>, error::SystemError> {
        let enrollment = sqlx::query_as::<_, EnrollmentEntity>(
            "SELECT * FROM enrollments WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(enrollment)
    }

    async fn find_owned(&self, user_id: &Uuid) -> Result<Vec<OwnedCourseRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, OwnedCourseRow>(
            r#"
            SELECT
                c.*,
                e.status,
                e.completion_percentage,
                e.created_at AS enrolled_at
            FROM enrollments e
            JOIN courses c ON c.id = e.course_id
            WHERE e.user_id = $1
            ORDER BY e.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn purchase(
        &self,
        user_id: &Uuid,
        course_id: &Uuid,
        amount: f64,
    ) -> Result<EnrollmentEntity, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO purchases (id, user_id, course_id, amount)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext)))
        .bind(user_id)
        .bind(course_id)
        .bind(amount)
        .execute(&mut *tx)
        .await?;

        let enrollment = sqlx::query_as::<_, EnrollmentEntity>(
            r#"
            INSERT INTO enrollments (id, user_id, course_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext)))
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(enrollment)
    }

    async fn record_completion(
        &self,
        enrollment_id: &Uuid,
        lesson_id: &Uuid,
        total_lessons: i64,
    ) -> Result<Option<EnrollmentEntity>, error::SystemError> {
        let enrollment = sqlx::query_as::<_, EnrollmentEntity>(
            r#"
            WITH progress AS (
                SELECT
                    id,
                    CASE
                        WHEN $2 = ANY(completed_lessons) THEN completed_lessons
                        ELSE array_append(completed_lessons, $2)
                    END AS lessons
                FROM enrollments
                WHERE id = $1
                FOR UPDATE
            )
            UPDATE enrollments e
            SET completed_lessons = p.lessons,
                last_accessed_lesson = $2,
                completion_percentage = CASE
                    WHEN $3 <= 0 THEN 0
                    ELSE LEAST(100, (cardinality(p.lessons) * 100) / $3)
                END,
                updated_at = NOW()
            FROM progress p
            WHERE e.id = p.id
            RETURNING e.*
            "#,
        )
        .bind(enrollment_id)
        .bind(lesson_id)
        .bind(total_lessons)
        .fetch_optional(&self.pool)
        .await?;
        Ok(enrollment)
    }
}
