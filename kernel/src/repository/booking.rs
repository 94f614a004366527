use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    booking::{
        event::{CreateBooking, UpdateBookingRoom},
        Booking,
    },
    id::UserId,
};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    // ユーザー ID に紐づく予約を、部屋の情報とともに取得する
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Option<Booking>>;
    // 予約を作成する。部屋が満室、またはユーザーが既に予約を持つ場合は ForbiddenOperation
    async fn create(&self, event: CreateBooking) -> AppResult<Booking>;
    // 予約の部屋を付け替え、updated_at を更新する。満室の場合は ForbiddenOperation
    async fn update_room(&self, event: UpdateBookingRoom) -> AppResult<Booking>;
}
