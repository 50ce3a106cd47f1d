/// Shopping experience ratings
///
/// A customer's 1-5 star rating of their storefront experience, with an
/// optional comment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Experience row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Experience {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Rating form input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitExperience {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,

    #[validate(length(max = 2000, message = "Comment must be at most 2000 characters"))]
    pub comment: Option<String>,
}

impl Experience {
    /// Records a rating with a caller-chosen ID
    pub async fn create(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: SubmitExperience,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Experience>(
            r#"
            INSERT INTO experiences (id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, rating, comment, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.rating)
        .bind(data.comment)
        .fetch_one(pool)
        .await
    }
}
