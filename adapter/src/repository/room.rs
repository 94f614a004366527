use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{BookingId, RoomId},
    room::{Room, RoomWithBookings},
};
use kernel::repository::room::RoomRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::room::RoomRow, ConnectionPool};

#[derive(new)]
pub struct RoomRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn find_with_bookings(&self, room_id: RoomId) -> AppResult<Option<RoomWithBookings>> {
        let Some(room) = sqlx::query_as::<_, RoomRow>(
            r#"
                SELECT room_id, name, capacity, hotel_id, created_at, updated_at
                FROM rooms
                WHERE room_id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        else {
            return Ok(None);
        };

        let bookings = sqlx::query_scalar::<_, BookingId>(
            r#"
                SELECT booking_id
                FROM bookings
                WHERE room_id = $1
                ORDER BY booking_id ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(Some(RoomWithBookings {
            room: Room::from(room),
            bookings,
        }))
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
    async fn room_lists_its_bookings(pool: sqlx::PgPool) -> AppResult<()> {
        let repo = RoomRepositoryImpl::new(ConnectionPool::new(pool));

        let Some(full) = repo.find_with_bookings(RoomId::new(2)).await? else {
            panic!("room 2 exists in the fixture");
        };
        assert_eq!(full.room.capacity, 1);
        assert_eq!(full.bookings.len(), 1);
        assert!(full.is_full());

        assert!(repo.find_with_bookings(RoomId::new(1000)).await?.is_none());
        Ok(())
    }
}
