pub mod form;
pub mod id;

pub use self::id::{Id, TicketId, UserId};
