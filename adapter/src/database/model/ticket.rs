use kernel::model::{
    id::{EnrollmentId, TicketId, TicketTypeId},
    ticket::{Ticket, TicketStatus, TicketType},
};
use shared::error::AppError;

// チケットとチケット種別を JOIN して取得する際に使う型
#[derive(sqlx::FromRow)]
pub struct TicketRow {
    pub ticket_id: TicketId,
    pub enrollment_id: EnrollmentId,
    pub status: String,
    pub ticket_type_id: TicketTypeId,
    pub ticket_type_name: String,
    pub price: i32,
    pub is_remote: bool,
    pub includes_hotel: bool,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = AppError;

    fn try_from(value: TicketRow) -> Result<Self, Self::Error> {
        let TicketRow {
            ticket_id,
            enrollment_id,
            status,
            ticket_type_id,
            ticket_type_name,
            price,
            is_remote,
            includes_hotel,
        } = value;
        let status = status.parse::<TicketStatus>().map_err(|_| {
            AppError::ConversionEntityError(format!(
                "チケット（{ticket_id}）のステータスが不正です: {status}"
            ))
        })?;
        Ok(Ticket {
            ticket_id,
            enrollment_id,
            status,
            ticket_type: TicketType {
                ticket_type_id,
                name: ticket_type_name,
                price,
                is_remote,
                includes_hotel,
            },
        })
    }
}
