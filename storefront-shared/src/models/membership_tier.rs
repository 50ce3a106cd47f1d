/// Membership tier model and database operations
///
/// Tiers are loyalty levels gated by a minimum points threshold. They form a
/// total order on `min_points`; the unique constraint keeps two tiers from
/// sharing a threshold.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE membership_tiers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(100) NOT NULL,
///     icon VARCHAR(32) NOT NULL DEFAULT '',
///     description TEXT NOT NULL DEFAULT '',
///     benefits TEXT[] NOT NULL DEFAULT '{}',
///     min_points BIGINT NOT NULL UNIQUE CHECK (min_points >= 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use storefront_shared::models::membership_tier::{CreateMembershipTier, MembershipTier};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let gold = MembershipTier::create(&pool, CreateMembershipTier {
///     title: "Gold".to_string(),
///     icon: "👑".to_string(),
///     description: "Our best customers".to_string(),
///     benefits: vec!["Free shipping".to_string()],
///     min_points: 500,
/// }).await?;
///
/// let ladder = MembershipTier::list_ordered(&pool).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;
use validator::Validate;

/// Membership tier row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MembershipTier {
    /// Tier ID
    pub id: Uuid,

    /// Display title (e.g. "Gold")
    pub title: String,

    /// Icon or crown glyph shown next to the title
    pub icon: String,

    /// Marketing description
    pub description: String,

    /// Benefit bullet points
    pub benefits: Vec<String>,

    /// Points required to hold this tier
    pub min_points: i64,

    /// When the tier was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a tier
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMembershipTier {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 32, message = "Icon must be at most 32 characters"))]
    pub icon: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub benefits: Vec<String>,

    #[validate(range(min = 0, message = "Minimum points cannot be negative"))]
    pub min_points: i64,
}

impl MembershipTier {
    /// Inserts a new tier
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on `membership_tiers_min_points_key` when
    /// another tier already uses the same threshold.
    pub async fn create(pool: &PgPool, data: CreateMembershipTier) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, MembershipTier>(
            r#"
            INSERT INTO membership_tiers (title, icon, description, benefits, min_points)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, icon, description, benefits, min_points, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.icon)
        .bind(data.description)
        .bind(data.benefits)
        .bind(data.min_points)
        .fetch_one(pool)
        .await
    }

    /// Lists every tier, lowest threshold first
    ///
    /// Accepts a pool or an open transaction.
    pub async fn list_ordered<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, MembershipTier>(
            r#"
            SELECT id, title, icon, description, benefits, min_points, created_at
            FROM membership_tiers
            ORDER BY min_points ASC
            "#,
        )
        .fetch_all(executor)
        .await
    }
}
