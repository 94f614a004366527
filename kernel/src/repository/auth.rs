use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{auth::AccessToken, id::UserId};

#[async_trait]
pub trait AuthRepository: Send + Sync {
    // アクセストークンに紐づくセッションからユーザー ID を取得する
    async fn fetch_user_id_from_token(&self, access_token: &AccessToken)
        -> AppResult<Option<UserId>>;
}
