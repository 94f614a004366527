use kernel::model::{
    id::{HotelId, RoomId},
    room::Room,
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct RoomRow {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub hotel_id: HotelId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoomRow> for Room {
    fn from(value: RoomRow) -> Self {
        let RoomRow {
            room_id,
            name,
            capacity,
            hotel_id,
            created_at,
            updated_at,
        } = value;
        Room {
            room_id,
            name,
            capacity,
            hotel_id,
            created_at,
            updated_at,
        }
    }
}

// 予約処理中に行ロックを取った部屋の定員と現在の予約数
pub struct RoomOccupancyRow {
    pub capacity: i32,
    pub booked: i64,
}

impl RoomOccupancyRow {
    pub fn is_full(&self) -> bool {
        self.booked >= i64::from(self.capacity)
    }
}
