use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::{
    auth::AuthRepositoryImpl, booking::BookingRepositoryImpl,
    enrollment::EnrollmentRepositoryImpl, health::HealthCheckRepositoryImpl,
    room::RoomRepositoryImpl, ticket::TicketRepositoryImpl,
};
use kernel::repository::{
    auth::AuthRepository, booking::BookingRepository, enrollment::EnrollmentRepository,
    health::HealthCheckRepository, room::RoomRepository, ticket::TicketRepository,
};
use kernel::service::booking::BookingService;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    booking_service: Arc<BookingService>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool) -> Self {
        Self::from_repositories(
            Arc::new(HealthCheckRepositoryImpl::new(pool.clone())),
            Arc::new(AuthRepositoryImpl::new(pool.clone())),
            Arc::new(BookingRepositoryImpl::new(pool.clone())),
            Arc::new(EnrollmentRepositoryImpl::new(pool.clone())),
            Arc::new(TicketRepositoryImpl::new(pool.clone())),
            Arc::new(RoomRepositoryImpl::new(pool)),
        )
    }

    // DB 以外の実装（テスト用のインメモリ実装など）を差し込む場合に使う
    pub fn from_repositories(
        health_check_repository: Arc<dyn HealthCheckRepository>,
        auth_repository: Arc<dyn AuthRepository>,
        booking_repository: Arc<dyn BookingRepository>,
        enrollment_repository: Arc<dyn EnrollmentRepository>,
        ticket_repository: Arc<dyn TicketRepository>,
        room_repository: Arc<dyn RoomRepository>,
    ) -> Self {
        let booking_service = Arc::new(BookingService::new(
            booking_repository,
            enrollment_repository,
            ticket_repository,
            room_repository,
        ));
        Self {
            health_check_repository,
            auth_repository,
            booking_service,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn booking_service(&self) -> Arc<BookingService> {
        self.booking_service.clone()
    }
}
