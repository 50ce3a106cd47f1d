/// Per-user account settings
///
/// One row per user, created on first save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Settings row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSettings {
    pub user_id: Uuid,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub marketing_emails: bool,
    pub language: String,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement of a user's settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveSettings {
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub marketing_emails: bool,

    /// BCP 47 language tag, e.g. "en" or "pt-BR"
    #[validate(length(min = 2, max = 8, message = "Language must be 2-8 characters"))]
    pub language: String,
}

impl UserSettings {
    /// Inserts or replaces the settings row for `user_id`
    pub async fn upsert(pool: &PgPool, user_id: Uuid, data: SaveSettings) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, UserSettings>(
            r#"
            INSERT INTO user_settings
                (user_id, email_notifications, sms_notifications, marketing_emails, language)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                email_notifications = EXCLUDED.email_notifications,
                sms_notifications = EXCLUDED.sms_notifications,
                marketing_emails = EXCLUDED.marketing_emails,
                language = EXCLUDED.language,
                updated_at = NOW()
            RETURNING user_id, email_notifications, sms_notifications, marketing_emails,
                      language, updated_at
            "#,
        )
        .bind(user_id)
        .bind(data.email_notifications)
        .bind(data.sms_notifications)
        .bind(data.marketing_emails)
        .bind(data.language)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_length_validation() {
        let mut settings = SaveSettings {
            email_notifications: true,
            sms_notifications: false,
            marketing_emails: false,
            language: "en".to_string(),
        };
        assert!(settings.validate().is_ok());

        settings.language = "e".to_string();
        assert!(settings.validate().is_err());
    }
}
