/// User model and database operations
///
/// A storefront customer (or administrator) with a running points balance and
/// an optional membership tier.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     name VARCHAR(255),
///     phone VARCHAR(32),
///     avatar_url VARCHAR(512),
///     points BIGINT NOT NULL DEFAULT 0 CHECK (points >= 0),
///     membership_id UUID REFERENCES membership_tiers(id) ON DELETE SET NULL,
///     role user_role NOT NULL DEFAULT 'customer',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use storefront_shared::models::user::{User, UpdateProfile};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let update = UpdateProfile {
///     name: Some("Ada".to_string()),
///     ..Default::default()
/// };
/// let user = User::update_profile(&pool, user_id, update).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use validator::Validate;

const USER_COLUMNS: &str = "id, email, name, phone, avatar_url, points, membership_id, role, \
                            created_at, updated_at";

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Storefront shopper
    Customer,

    /// Back-office operator
    Admin,
}

/// User row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Login email address
    pub email: String,

    /// Display name
    pub name: Option<String>,

    /// Contact phone number
    pub phone: Option<String>,

    /// Profile picture URL
    pub avatar_url: Option<String>,

    /// Accumulated loyalty points
    ///
    /// Never negative; this service only ever increments it.
    pub points: i64,

    /// Current membership tier, if one has been assigned
    pub membership_id: Option<Uuid>,

    /// Account role
    pub role: UserRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
///
/// Accounts are normally provisioned by the identity provider; this exists
/// for seeding and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login email address
    pub email: String,

    /// Display name
    pub name: Option<String>,

    /// Account role
    pub role: UserRole,
}

/// Profile fields a user may edit
///
/// `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfile {
    /// New display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New phone number
    #[validate(length(min = 3, max = 32, message = "Phone must be 3-32 characters"))]
    pub phone: Option<String>,

    /// New avatar URL
    #[validate(length(max = 512, message = "Avatar URL must be at most 512 characters"))]
    pub avatar_url: Option<String>,
}

impl User {
    /// Inserts a new user with zero points and no tier
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, name, role) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.email)
            .bind(data.name)
            .bind(data.role)
            .fetch_one(pool)
            .await
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Updates the editable profile fields
    ///
    /// Columns whose input is `None` keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::RowNotFound` if the user does not exist.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProfile,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                avatar_url = COALESCE($4, avatar_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(data.name)
            .bind(data.phone)
            .bind(data.avatar_url)
            .fetch_one(pool)
            .await
    }

    /// Adds `delta` points inside an open transaction
    ///
    /// The increment happens in SQL so concurrent awards do not overwrite
    /// each other. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::RowNotFound` if the user does not exist.
    pub async fn add_points(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        delta: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            UPDATE users
            SET points = points + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING points
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_one(&mut **tx)
        .await
    }

    /// Assigns (or clears) the user's membership tier inside an open transaction
    pub async fn set_membership(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        membership_id: Option<Uuid>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET membership_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(membership_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
