use crate::model::id::{BookingId, HotelId, RoomId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub hotel_id: HotelId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 部屋と、その部屋に現在割り当てられている予約の一覧
#[derive(Debug, Clone)]
pub struct RoomWithBookings {
    pub room: Room,
    pub bookings: Vec<BookingId>,
}

impl RoomWithBookings {
    pub fn is_full(&self) -> bool {
        // capacity が不正（0 以下）の部屋は常に満室扱い
        let capacity = usize::try_from(self.room.capacity).unwrap_or(0);
        self.bookings.len() >= capacity
    }
}
