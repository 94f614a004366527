use async_trait::async_trait;
use derive_new::new;
use kernel::model::{auth::AccessToken, id::UserId};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};

use crate::database::ConnectionPool;

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            r#"
                SELECT user_id
                FROM sessions
                WHERE token = $1
            "#,
        )
        .bind(&access_token.0)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(
        migrations = "../migrations",
        fixtures(path = "../../fixtures", scripts("common"))
    )]
    #[ignore = "requires a PostgreSQL reachable through DATABASE_URL"]
    async fn token_resolves_only_through_a_session(pool: sqlx::PgPool) -> AppResult<()> {
        let repo = AuthRepositoryImpl::new(ConnectionPool::new(pool));

        let user_id = repo
            .fetch_user_id_from_token(&AccessToken("token-user-1".into()))
            .await?;
        assert_eq!(user_id, Some(UserId::new(1)));

        let unknown = repo
            .fetch_user_id_from_token(&AccessToken("no-such-token".into()))
            .await?;
        assert_eq!(unknown, None);
        Ok(())
    }
}
