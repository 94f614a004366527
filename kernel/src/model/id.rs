use serde::{Deserialize, Serialize};

// 各エンティティの ID は DB の SERIAL 値（正の整数）を包む型として定義する
macro_rules! define_id {
    ($id_type: ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
            sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $id_type(i32);

        impl $id_type {
            pub fn new(value: i32) -> Self {
                Self(value)
            }

            pub fn raw(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $id_type {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$id_type> for i32 {
            fn from(value: $id_type) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $id_type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(UserId);
define_id!(EnrollmentId);
define_id!(TicketId);
define_id!(TicketTypeId);
define_id!(HotelId);
define_id!(RoomId);
define_id!(BookingId);
