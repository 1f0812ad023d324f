use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::errors::FixtureError;
use crate::models::FixtureUser;

const INSERT_USER_SQL: &str = r#"
    INSERT INTO public.user_user(password, last_login, is_superuser, username, first_name, last_name, email, is_staff, is_active, date_joined, national_id, phone, address, is_email_verified, verification_code, verification_code_expires_at, sso_user_id, is_banned)
    VALUES ($1, null, false, $2, '', '', $2, false, true, NOW(), null, $3, null, true, null, null, $4, false)
"#;

const DELETE_USERS_SQL: &str = "DELETE FROM public.user_user WHERE email = ANY($1)";

/// Insert statement for one fixture user
///
/// # Arguments
/// * `skip_existing` - Silently skip rows that collide with an existing user
pub fn insert_user_sql(skip_existing: bool) -> String {
    let sql = INSERT_USER_SQL.trim();
    if skip_existing {
        format!("{}\n    ON CONFLICT DO NOTHING", sql)
    } else {
        sql.to_string()
    }
}

/// Connection pool for fixture setup
pub struct DbFixtures {
    pool: PgPool,
}

impl DbFixtures {
    /// Connect to the fixture database
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    pub async fn new(database_url: &str) -> Result<Self, FixtureError> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .map_err(FixtureError::Connect)?;

        info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    /// Insert fixture users in a single transaction
    ///
    /// # Arguments
    /// * `users` - Rows to insert
    /// * `skip_existing` - Skip users that already exist instead of failing
    ///
    /// # Returns
    /// * `Result<u64, FixtureError>` - Number of rows actually inserted
    pub async fn insert_users(&self, users: &[FixtureUser], skip_existing: bool) -> Result<u64, FixtureError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!(
                "Failed to acquire connection from pool: {}. Pool state: {} idle, {} total",
                e,
                self.pool.num_idle(),
                self.pool.size()
            );
            FixtureError::TransactionBegin(e)
        })?;

        let sql = insert_user_sql(skip_existing);
        let mut inserted = 0;

        for user in users {
            let result = sqlx::query(&sql)
                .bind(&user.password_hash)
                .bind(&user.email)
                .bind(&user.phone)
                .bind(user.sso_user_id)
                .execute(&mut *tx)
                .await
                .map_err(|source| FixtureError::Operation {
                    operation: format!("insert fixture user {}", user.email),
                    source,
                })?;

            if result.rows_affected() == 0 {
                warn!("Fixture user {} already present, skipped", user.email);
            } else {
                info!("Fixture user {} inserted", user.email);
            }
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(FixtureError::TransactionCommit)?;

        Ok(inserted)
    }

    /// Delete fixture users by email
    ///
    /// # Returns
    /// * `Result<u64, FixtureError>` - Number of rows deleted
    pub async fn delete_users(&self, emails: &[String]) -> Result<u64, FixtureError> {
        let result = sqlx::query(DELETE_USERS_SQL)
            .bind(emails)
            .execute(&self.pool)
            .await
            .map_err(|source| FixtureError::Operation {
                operation: "delete fixture users".to_string(),
                source,
            })?;

        info!("Deleted {} fixture user(s)", result.rows_affected());
        Ok(result.rows_affected())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
