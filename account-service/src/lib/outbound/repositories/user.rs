use async_trait::async_trait;
use auth::SaltedPassword;
use sqlx::PgPool;

use crate::account::errors::AccountError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::UserCredential;
use crate::domain::account::ports::InsertOutcome;
use crate::domain::account::ports::UserDirectory;

pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    email: String,
    password_hash: String,
    password_salt: String,
    is_admin: bool,
}

impl TryFrom<CredentialRow> for UserCredential {
    type Error = AccountError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        Ok(UserCredential {
            email: EmailAddress::new(row.email)?,
            password: SaltedPassword {
                hash: row.password_hash,
                salt: row.password_salt,
            },
            is_admin: row.is_admin,
        })
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredential>, AccountError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT email, password_hash, password_salt, is_admin
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        row.map(UserCredential::try_from).transpose()
    }

    async fn insert_if_absent(
        &self,
        credential: UserCredential,
    ) -> Result<InsertOutcome, AccountError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, password_salt, is_admin)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(credential.email.as_str())
        .bind(&credential.password.hash)
        .bind(&credential.password.salt)
        .bind(credential.is_admin)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(InsertOutcome::Duplicate),
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) => {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return Ok(InsertOutcome::Duplicate);
                    }
                }
                Err(AccountError::DatabaseError(e.to_string()))
            }
        }
    }
}
