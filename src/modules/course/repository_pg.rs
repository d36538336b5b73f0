use uuid::Uuid;

use crate::{
    api::error,
    modules::course::{
        model::{InsertCourse, UpdateCourseModel},
        repository::CourseRepository,
        schema::CourseEntity,
    },
};

#[derive(Clone)]
pub struct CourseRepositoryPg {
    pool: sqlx::PgPool,
}

impl CourseRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CourseRepository for CourseRepositoryPg {
    async fn find_all(&self) -> Result<Vec<CourseEntity>, error::SystemError> {
        let courses =
            sqlx::query_as::<_, CourseEntity>("SELECT * FROM courses ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(courses)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CourseEntity>, error::SystemError> {
        let course = sqlx::query_as::<_, CourseEntity>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(course)
    }

    async fn create(&self, course: &InsertCourse) -> Result<CourseEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let created = sqlx::query_as::<_, CourseEntity>(
            r#"
            INSERT INTO courses (id, title, description, price, creator_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.price)
        .bind(course.creator_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(
        &self,
        id: &Uuid,
        changes: &UpdateCourseModel,
    ) -> Result<Option<CourseEntity>, error::SystemError> {
        let updated = sqlx::query_as::<_, CourseEntity>(
            r#"
            UPDATE courses
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.price)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn set_thumbnail(
        &self,
        id: &Uuid,
        url: &str,
        key: &str,
    ) -> Result<Option<CourseEntity>, error::SystemError> {
        let updated = sqlx::query_as::<_, CourseEntity>(
            r#"
            UPDATE courses
            SET thumbnail_url = $2, thumbnail_key = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(url)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: &Uuid) -> Result<Option<CourseEntity>, error::SystemError> {
        let deleted =
            sqlx::query_as::<_, CourseEntity>("DELETE FROM courses WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(deleted)
    }
}
