use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use garde::Validate;
use kernel::model::{
    booking::event::{CreateBooking, UpdateBookingRoom},
    id::BookingId,
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::booking::{BookingIdResponse, BookingRequest, BookingResponse},
};

pub async fn show_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    registry
        .booking_service()
        .find_current_booking(user.id())
        .await
        .map(BookingResponse::from)
        .map(Json)
}

pub async fn create_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> AppResult<Json<BookingIdResponse>> {
    let Json(req) = payload?;
    req.validate(&())?;

    registry
        .booking_service()
        .create_booking(CreateBooking::new(user.id(), req.room_id()))
        .await
        .map(BookingIdResponse::from)
        .map(Json)
}

pub async fn update_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> AppResult<Json<BookingIdResponse>> {
    let Json(req) = payload?;
    req.validate(&())?;

    registry
        .booking_service()
        .update_booking(UpdateBookingRoom::new(booking_id, user.id(), req.room_id()))
        .await
        .map(BookingIdResponse::from)
        .map(Json)
}
