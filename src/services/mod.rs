mod auth;
mod tickets;

pub use self::auth::AuthService;
pub use self::tickets::TicketService;
