use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    booking::{
        event::{CreateBooking, UpdateBookingRoom},
        Booking,
    },
    id::{BookingId, RoomId, UserId},
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{booking::BookingRow, room::RoomOccupancyRow},
    ConnectionPool,
};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

const SELECT_BOOKING_WITH_ROOM: &str = r#"
    SELECT
    b.booking_id,
    b.user_id,
    b.created_at,
    b.updated_at,
    r.room_id,
    r.name AS room_name,
    r.capacity,
    r.hotel_id,
    r.created_at AS room_created_at,
    r.updated_at AS room_updated_at
    FROM bookings AS b
    INNER JOIN rooms AS r ON r.room_id = b.room_id
"#;

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING_WITH_ROOM} WHERE b.user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map(|row| row.map(Booking::from))
        .map_err(AppError::SpecificOperationError)
    }

    async fn create(&self, event: CreateBooking) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        // 定員の確認と予約の追加を同じトランザクション内で行い、
        // 同時に予約された場合に定員を超えないようにする。
        // 分離レベルは READ COMMITTED のままにして、部屋の行ロックを待った後の
        // 再集計が先に確定した予約を数えられるようにする
        self.ensure_vacancy(&mut tx, event.room_id).await?;

        let booking_id = sqlx::query_scalar::<_, BookingId>(
            r#"
                INSERT INTO bookings (user_id, room_id)
                VALUES ($1, $2)
                RETURNING booking_id
            "#,
        )
        .bind(event.user_id)
        .bind(event.room_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            // 1 ユーザー 1 予約の一意制約に違反した
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::ForbiddenOperation
            }
            e => AppError::SpecificOperationError(e),
        })?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.find_by_id(booking_id).await
    }

    async fn update_room(&self, event: UpdateBookingRoom) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        self.ensure_vacancy(&mut tx, event.room_id).await?;

        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET room_id = $1, updated_at = CURRENT_TIMESTAMP
                WHERE booking_id = $2 AND user_id = $3
            "#,
        )
        .bind(event.room_id)
        .bind(event.booking_id)
        .bind(event.user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        // 指定の予約が存在しない、または他のユーザーの予約だった
        if res.rows_affected() < 1 {
            return Err(AppError::ForbiddenOperation);
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.find_by_id(event.booking_id).await
    }
}

impl BookingRepositoryImpl {
    // 部屋の行をロックしたうえで予約数を数え直す
    async fn ensure_vacancy(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        room_id: RoomId,
    ) -> AppResult<()> {
        let capacity = sqlx::query_scalar::<_, i32>(
            r#"
                SELECT capacity
                FROM rooms
                WHERE room_id = $1
                FOR UPDATE
            "#,
        )
        .bind(room_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound(format!("部屋（{room_id}）が見つかりませんでした。")))?;

        let booked = sqlx::query_scalar::<_, i64>(
            r#"
                SELECT COUNT(*)
                FROM bookings
                WHERE room_id = $1
            "#,
        )
        .bind(room_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if (RoomOccupancyRow { capacity, booked }).is_full() {
            return Err(AppError::ForbiddenOperation);
        }
        Ok(())
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Booking> {
        sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING_WITH_ROOM} WHERE b.booking_id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Booking::from)
        .ok_or_else(|| {
            AppError::NoRowsAffectedError(format!("booking ({booking_id}) was not persisted"))
        })
    }
}
