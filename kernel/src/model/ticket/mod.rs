use crate::model::id::{EnrollmentId, TicketId, TicketTypeId};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum TicketStatus {
    Reserved,
    Paid,
}

#[derive(Debug, Clone)]
pub struct TicketType {
    pub ticket_type_id: TicketTypeId,
    pub name: String,
    pub price: i32,
    pub is_remote: bool,
    pub includes_hotel: bool,
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub ticket_id: TicketId,
    pub enrollment_id: EnrollmentId,
    pub status: TicketStatus,
    pub ticket_type: TicketType,
}

impl Ticket {
    /// 支払い済みで、現地参加かつホテル付きのチケットのみ部屋を予約できる
    pub fn grants_hotel_booking(&self) -> bool {
        !(self.status == TicketStatus::Reserved
            || self.ticket_type.is_remote
            || !self.ticket_type.includes_hotel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(status: TicketStatus, is_remote: bool, includes_hotel: bool) -> Ticket {
        Ticket {
            ticket_id: TicketId::new(1),
            enrollment_id: EnrollmentId::new(1),
            status,
            ticket_type: TicketType {
                ticket_type_id: TicketTypeId::new(1),
                name: "Presencial + Hotel".into(),
                price: 600,
                is_remote,
                includes_hotel,
            },
        }
    }

    #[test]
    fn only_paid_in_person_hotel_tickets_grant_booking() {
        assert!(ticket(TicketStatus::Paid, false, true).grants_hotel_booking());
        assert!(!ticket(TicketStatus::Reserved, false, true).grants_hotel_booking());
        assert!(!ticket(TicketStatus::Paid, true, true).grants_hotel_booking());
        assert!(!ticket(TicketStatus::Paid, false, false).grants_hotel_booking());
    }

    #[test]
    fn status_parses_from_database_labels() {
        assert_eq!("PAID".parse::<TicketStatus>().ok(), Some(TicketStatus::Paid));
        assert_eq!(
            "RESERVED".parse::<TicketStatus>().ok(),
            Some(TicketStatus::Reserved)
        );
        assert_eq!(TicketStatus::Paid.as_ref(), "PAID");
        assert!("CANCELLED".parse::<TicketStatus>().is_err());
    }
}
