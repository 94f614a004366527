use async_trait::async_trait;
use derive_new::new;
use kernel::model::{enrollment::Enrollment, id::UserId};
use kernel::repository::enrollment::EnrollmentRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::enrollment::EnrollmentRow, ConnectionPool};

#[derive(new)]
pub struct EnrollmentRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl EnrollmentRepository for EnrollmentRepositoryImpl {
    async fn find_with_address_by_user_id(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<Enrollment>> {
        // 住所が登録されていない申込は存在しないものとして扱う
        sqlx::query_as::<_, EnrollmentRow>(
            r#"
                SELECT
                e.enrollment_id,
                e.user_id,
                e.name,
                e.cpf,
                e.birthday,
                e.phone,
                a.cep,
                a.street,
                a.city,
                a.state,
                a.number,
                a.neighborhood,
                a.address_detail
                FROM enrollments AS e
                INNER JOIN addresses AS a ON a.enrollment_id = e.enrollment_id
                WHERE e.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map(|row| row.map(Enrollment::from))
        .map_err(AppError::SpecificOperationError)
    }
}
