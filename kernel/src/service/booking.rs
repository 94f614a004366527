use std::sync::Arc;

use derive_new::new;
use shared::error::{AppError, AppResult};

use crate::model::{
    booking::{
        event::{CreateBooking, UpdateBookingRoom},
        Booking,
    },
    id::{RoomId, UserId},
};
use crate::repository::{
    booking::BookingRepository, enrollment::EnrollmentRepository, room::RoomRepository,
    ticket::TicketRepository,
};

/// Booking rules for conference attendees.
///
/// A user may book, or move a booking into, a room only while holding a paid,
/// in-person ticket that includes the hotel, and only while the room has a
/// free place. Every failure is surfaced as [`AppError::ForbiddenOperation`],
/// except an unknown room (and, when fetching, an absent booking) which is
/// [`AppError::EntityNotFound`].
#[derive(new)]
pub struct BookingService {
    booking_repository: Arc<dyn BookingRepository>,
    enrollment_repository: Arc<dyn EnrollmentRepository>,
    ticket_repository: Arc<dyn TicketRepository>,
    room_repository: Arc<dyn RoomRepository>,
}

impl BookingService {
    pub async fn find_current_booking(&self, user_id: UserId) -> AppResult<Booking> {
        self.booking_repository
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("ユーザー（{user_id}）の予約が見つかりませんでした。"))
            })
    }

    pub async fn create_booking(&self, event: CreateBooking) -> AppResult<Booking> {
        self.check_eligibility(event.user_id, event.room_id).await?;

        let booking = self.booking_repository.create(event).await?;
        tracing::info!(
            booking_id = %booking.booking_id,
            user_id = %booking.user_id,
            room_id = %booking.room.room_id,
            "booking created"
        );
        Ok(booking)
    }

    pub async fn update_booking(&self, event: UpdateBookingRoom) -> AppResult<Booking> {
        self.check_eligibility(event.user_id, event.room_id).await?;

        let Some(current) = self
            .booking_repository
            .find_by_user_id(event.user_id)
            .await?
        else {
            tracing::debug!(user_id = %event.user_id, "no booking to move");
            return Err(AppError::ForbiddenOperation);
        };
        if current.booking_id != event.booking_id {
            tracing::debug!(
                user_id = %event.user_id,
                booking_id = %event.booking_id,
                "booking belongs to another user"
            );
            return Err(AppError::ForbiddenOperation);
        }

        let booking = self.booking_repository.update_room(event).await?;
        tracing::info!(
            booking_id = %booking.booking_id,
            user_id = %booking.user_id,
            room_id = %booking.room.room_id,
            "booking moved"
        );
        Ok(booking)
    }

    /// Checks, in order: enrollment, ticket, room existence, room capacity.
    pub async fn check_eligibility(&self, user_id: UserId, room_id: RoomId) -> AppResult<()> {
        let Some(enrollment) = self
            .enrollment_repository
            .find_with_address_by_user_id(user_id)
            .await?
        else {
            tracing::debug!(%user_id, "no enrollment");
            return Err(AppError::ForbiddenOperation);
        };

        let ticket = self
            .ticket_repository
            .find_by_enrollment_id(enrollment.enrollment_id)
            .await?;
        if !ticket.is_some_and(|t| t.grants_hotel_booking()) {
            tracing::debug!(%user_id, "ticket does not grant a hotel booking");
            return Err(AppError::ForbiddenOperation);
        }

        let room = self
            .room_repository
            .find_with_bookings(room_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("部屋（{room_id}）が見つかりませんでした。"))
            })?;

        if room.is_full() {
            tracing::debug!(%room_id, capacity = room.room.capacity, "room is full");
            return Err(AppError::ForbiddenOperation);
        }

        Ok(())
    }
}
