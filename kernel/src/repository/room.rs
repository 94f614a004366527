use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{id::RoomId, room::RoomWithBookings};

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_with_bookings(&self, room_id: RoomId) -> AppResult<Option<RoomWithBookings>>;
}
