//! Persistence ports used by the services.
//!
//! The Postgres adapters live in [`crate::database`]; tests run the
//! services against in-memory implementations instead.

use async_trait::async_trait;

use crate::database::Result;
use crate::models::{NewTicket, NewUser, Ticket, TicketChanges, TicketQuery, User};
use crate::types::TicketId;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks up a user by its normalized email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Persists a new user. Fails with
    /// [`Error::UniqueViolation`](crate::database::Error::UniqueViolation)
    /// if the email is already taken.
    async fn create(&self, user: NewUser) -> Result<User>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Returns one page of non-deleted tickets matching the query,
    /// along with the total amount of matching tickets.
    async fn find_all(&self, query: &TicketQuery) -> Result<(Vec<Ticket>, u64)>;

    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>>;

    async fn create(&self, ticket: &NewTicket) -> Result<Ticket>;

    /// Applies the changes and refreshes `updated_at`. Returns `None`
    /// if the ticket does not exist or has been soft deleted.
    async fn update(&self, id: TicketId, changes: &TicketChanges) -> Result<Option<Ticket>>;

    /// Flags the ticket as deleted. Returns `None` if the ticket does
    /// not exist or has already been soft deleted.
    async fn soft_delete(&self, id: TicketId) -> Result<Option<Ticket>>;
}
