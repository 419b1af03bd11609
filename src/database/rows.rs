use chrono::{DateTime, Utc};
use error_stack::{Report, ResultExt};
use sqlx::FromRow;

use super::Error;
use crate::models::{Priority, Role, Ticket, TicketStatus, User};
use crate::types::{TicketId, UserId};

#[derive(Debug, FromRow)]
pub(super) struct UserRow {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Report<Error>;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .change_context(Error::Decode)
            .attach_printable_lazy(|| format!("user id = {}", row.id))?;

        Ok(Self {
            id: row.id,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct TicketRow {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: i16,
    pub assignee: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = Report<Error>;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<TicketStatus>()
            .change_context(Error::Decode)
            .attach_printable_lazy(|| format!("ticket id = {}", row.id))?;

        let priority = Priority::try_from(row.priority)
            .change_context(Error::Decode)
            .attach_printable_lazy(|| format!("ticket id = {}", row.id))?;

        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status,
            priority,
            assignee: row.assignee,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str, priority: i16) -> TicketRow {
        TicketRow {
            id: TicketId::new(1),
            title: "Broken chair".into(),
            description: "The chair at desk 14 has lost a wheel.".into(),
            status: status.into(),
            priority,
            assignee: None,
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn should_decode_ticket_rows() {
        let ticket = Ticket::try_from(row("inprogress", 3)).unwrap();
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.priority, Priority::HIGH);

        let error = Ticket::try_from(row("closed", 3)).unwrap_err();
        assert_eq!(error.current_context(), &Error::Decode);
        assert!(Ticket::try_from(row("open", 9)).is_err());
    }
}
