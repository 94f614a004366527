use kernel::model::{
    enrollment::{Address, Enrollment},
    id::{EnrollmentId, UserId},
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct EnrollmentRow {
    pub enrollment_id: EnrollmentId,
    pub user_id: UserId,
    pub name: String,
    pub cpf: String,
    pub birthday: DateTime<Utc>,
    pub phone: String,
    pub cep: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub number: String,
    pub neighborhood: String,
    pub address_detail: Option<String>,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(value: EnrollmentRow) -> Self {
        let EnrollmentRow {
            enrollment_id,
            user_id,
            name,
            cpf,
            birthday,
            phone,
            cep,
            street,
            city,
            state,
            number,
            neighborhood,
            address_detail,
        } = value;
        Enrollment {
            enrollment_id,
            user_id,
            name,
            cpf,
            birthday,
            phone,
            address: Address {
                cep,
                street,
                city,
                state,
                number,
                neighborhood,
                address_detail,
            },
        }
    }
}
