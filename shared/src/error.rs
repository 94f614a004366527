use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    EntityNotFound(String),
    #[error("許可されていない操作です")]
    ForbiddenOperation,
    #[error("ログインに失敗しました")]
    UnauthenticatedError,
    #[error(transparent)]
    ValidationError(#[from] garde::Report),
    #[error(transparent)]
    InvalidJsonBody(#[from] JsonRejection),
    #[error("トランザクションを実行できませんでした。")]
    TransactionError(#[source] sqlx::Error),
    #[error("データベース処理実行中にエラーが発生しました。")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("{0}")]
    ConversionEntityError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ForbiddenOperation => StatusCode::FORBIDDEN,
            AppError::UnauthenticatedError => StatusCode::UNAUTHORIZED,
            // 想定外のエラーもクライアントには 400 として返す
            AppError::ValidationError(_)
            | AppError::InvalidJsonBody(_)
            | AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::ConversionEntityError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if matches!(
            self,
            AppError::TransactionError(_)
                | AppError::SpecificOperationError(_)
                | AppError::NoRowsAffectedError(_)
                | AppError::ConversionEntityError(_)
        ) {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "Unexpected error happened"
            );
        }
        self.status_code().into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
