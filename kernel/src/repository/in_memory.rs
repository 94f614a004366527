//! In-memory implementation of every repository trait.
//!
//! Mirrors the PostgreSQL adapter closely enough for unit and HTTP tests:
//! one booking per user, and room capacity rechecked under the same lock
//! as the write.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult};

use crate::model::{
    auth::AccessToken,
    booking::{
        event::{CreateBooking, UpdateBookingRoom},
        Booking,
    },
    enrollment::{Address, Enrollment},
    id::{BookingId, EnrollmentId, HotelId, RoomId, TicketId, TicketTypeId, UserId},
    room::{Room, RoomWithBookings},
    ticket::{Ticket, TicketStatus, TicketType},
};
use crate::repository::{
    auth::AuthRepository, booking::BookingRepository, enrollment::EnrollmentRepository,
    health::HealthCheckRepository, room::RoomRepository, ticket::TicketRepository,
};

struct BookingRecord {
    user_id: UserId,
    room_id: RoomId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    sessions: HashMap<String, UserId>,
    enrollments: HashMap<UserId, Enrollment>,
    tickets: HashMap<EnrollmentId, Ticket>,
    rooms: BTreeMap<RoomId, Room>,
    bookings: BTreeMap<BookingId, BookingRecord>,
    last_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn occupancy(&self, room_id: RoomId) -> Vec<BookingId> {
        self.bookings
            .iter()
            .filter(|(_, b)| b.room_id == room_id)
            .map(|(id, _)| *id)
            .collect()
    }

    fn booking_of(&self, user_id: UserId) -> Option<BookingId> {
        self.bookings
            .iter()
            .find(|(_, b)| b.user_id == user_id)
            .map(|(id, _)| *id)
    }

    fn to_booking(&self, booking_id: BookingId) -> AppResult<Booking> {
        let record = self.bookings.get(&booking_id).ok_or_else(|| {
            AppError::EntityNotFound(format!("booking ({booking_id}) not found"))
        })?;
        let room = self.rooms.get(&record.room_id).cloned().ok_or_else(|| {
            AppError::ConversionEntityError(format!(
                "booking ({booking_id}) references unknown room ({})",
                record.room_id
            ))
        })?;
        Ok(Booking {
            booking_id,
            user_id: record.user_id,
            room,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    fn ensure_vacancy(&self, room_id: RoomId) -> AppResult<()> {
        let room = self
            .rooms
            .get(&room_id)
            .ok_or_else(|| AppError::EntityNotFound(format!("room ({room_id}) not found")))?;
        let with_bookings = RoomWithBookings {
            room: room.clone(),
            bookings: self.occupancy(room_id),
        };
        if with_bookings.is_full() {
            return Err(AppError::ForbiddenOperation);
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<State>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_session(&self, token: &str, user_id: UserId) {
        self.lock().sessions.insert(token.to_string(), user_id);
    }

    pub fn insert_enrollment(&self, user_id: UserId) -> Enrollment {
        let mut state = self.lock();
        let enrollment = Enrollment {
            enrollment_id: EnrollmentId::new(state.next_id()),
            user_id,
            name: format!("attendee-{user_id}"),
            cpf: "00000000000".into(),
            birthday: Utc::now(),
            phone: "(21) 98999-9999".into(),
            address: Address {
                cep: "00000-000".into(),
                street: "Rua Principal".into(),
                city: "Rio de Janeiro".into(),
                state: "RJ".into(),
                number: "100".into(),
                neighborhood: "Centro".into(),
                address_detail: None,
            },
        };
        state.enrollments.insert(user_id, enrollment.clone());
        enrollment
    }

    pub fn insert_ticket(
        &self,
        enrollment_id: EnrollmentId,
        status: TicketStatus,
        is_remote: bool,
        includes_hotel: bool,
    ) -> Ticket {
        let mut state = self.lock();
        let ticket = Ticket {
            ticket_id: TicketId::new(state.next_id()),
            enrollment_id,
            status,
            ticket_type: TicketType {
                ticket_type_id: TicketTypeId::new(state.next_id()),
                name: "conference ticket".into(),
                price: 250,
                is_remote,
                includes_hotel,
            },
        };
        state.tickets.insert(enrollment_id, ticket.clone());
        ticket
    }

    pub fn insert_room(&self, capacity: i32) -> Room {
        let mut state = self.lock();
        let now = Utc::now();
        let room_id = RoomId::new(state.next_id());
        let room = Room {
            room_id,
            name: format!("room-{room_id}"),
            capacity,
            hotel_id: HotelId::new(1),
            created_at: now,
            updated_at: now,
        };
        state.rooms.insert(room_id, room.clone());
        room
    }

    /// Places a booking without any eligibility or capacity check, for
    /// arranging fixtures such as an already full room.
    pub fn insert_booking(&self, user_id: UserId, room_id: RoomId) -> BookingId {
        let mut state = self.lock();
        let booking_id = BookingId::new(state.next_id());
        let now = Utc::now();
        state.bookings.insert(
            booking_id,
            BookingRecord {
                user_id,
                room_id,
                created_at: now,
                updated_at: now,
            },
        );
        booking_id
    }

    pub fn booking_count(&self, room_id: RoomId) -> usize {
        self.lock().occupancy(room_id).len()
    }
}

#[async_trait]
impl AuthRepository for InMemoryRepository {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        Ok(self.lock().sessions.get(&access_token.0).copied())
    }
}

#[async_trait]
impl HealthCheckRepository for InMemoryRepository {
    async fn check_db(&self) -> bool {
        true
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryRepository {
    async fn find_with_address_by_user_id(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<Enrollment>> {
        Ok(self.lock().enrollments.get(&user_id).cloned())
    }
}

#[async_trait]
impl TicketRepository for InMemoryRepository {
    async fn find_by_enrollment_id(
        &self,
        enrollment_id: EnrollmentId,
    ) -> AppResult<Option<Ticket>> {
        Ok(self.lock().tickets.get(&enrollment_id).cloned())
    }
}

#[async_trait]
impl RoomRepository for InMemoryRepository {
    async fn find_with_bookings(&self, room_id: RoomId) -> AppResult<Option<RoomWithBookings>> {
        let state = self.lock();
        Ok(state.rooms.get(&room_id).map(|room| RoomWithBookings {
            room: room.clone(),
            bookings: state.occupancy(room_id),
        }))
    }
}

#[async_trait]
impl BookingRepository for InMemoryRepository {
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Option<Booking>> {
        let state = self.lock();
        state
            .booking_of(user_id)
            .map(|booking_id| state.to_booking(booking_id))
            .transpose()
    }

    async fn create(&self, event: CreateBooking) -> AppResult<Booking> {
        let mut state = self.lock();
        state.ensure_vacancy(event.room_id)?;
        if state.booking_of(event.user_id).is_some() {
            return Err(AppError::ForbiddenOperation);
        }
        let booking_id = BookingId::new(state.next_id());
        let now = Utc::now();
        state.bookings.insert(
            booking_id,
            BookingRecord {
                user_id: event.user_id,
                room_id: event.room_id,
                created_at: now,
                updated_at: now,
            },
        );
        state.to_booking(booking_id)
    }

    async fn update_room(&self, event: UpdateBookingRoom) -> AppResult<Booking> {
        let mut state = self.lock();
        state.ensure_vacancy(event.room_id)?;
        let record = state
            .bookings
            .get_mut(&event.booking_id)
            .filter(|b| b.user_id == event.user_id)
            .ok_or(AppError::ForbiddenOperation)?;
        record.room_id = event.room_id;
        record.updated_at = Utc::now();
        state.to_booking(event.booking_id)
    }
}
