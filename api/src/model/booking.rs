use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    booking::Booking,
    id::{BookingId, HotelId, RoomId},
    room::Room,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[garde(range(min = 1))]
    room_id: i32,
}

impl BookingRequest {
    pub fn room_id(&self) -> RoomId {
        RoomId::new(self.room_id)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingIdResponse {
    pub booking_id: BookingId,
}

impl From<Booking> for BookingIdResponse {
    fn from(value: Booking) -> Self {
        Self {
            booking_id: value.booking_id,
        }
    }
}

#[derive(Serialize)]
pub struct BookingResponse {
    pub id: BookingId,
    #[serde(rename = "Room")]
    pub room: RoomResponse,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id, room, ..
        } = value;
        Self {
            id: booking_id,
            room: room.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub hotel_id: HotelId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Room> for RoomResponse {
    fn from(value: Room) -> Self {
        let Room {
            room_id,
            name,
            capacity,
            hotel_id,
            created_at,
            updated_at,
        } = value;
        Self {
            id: room_id,
            name,
            capacity,
            hotel_id,
            created_at,
            updated_at,
        }
    }
}
