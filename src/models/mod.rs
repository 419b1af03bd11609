mod query;
mod ticket;
mod user;

pub use self::query::{
    SortField, SortOrder, TicketPage, TicketQuery, UnknownSortField, UnknownSortOrder,
};
pub use self::ticket::{
    InvalidPriority, NewTicket, Priority, Ticket, TicketChanges, TicketStatus, UnknownTicketStatus,
};
pub use self::user::{NewUser, PublicUser, Role, UnknownRole, User};
