//! In-memory repositories and fixtures shared by the test suite.

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::num::{NonZeroU32, NonZeroU64};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::auth::TokenKeys;
use crate::config;
use crate::database::{Error, Result};
use crate::models::{
    NewTicket, NewUser, Priority, SortField, SortOrder, Ticket, TicketChanges, TicketQuery,
    TicketStatus, User,
};
use crate::repositories::{TicketRepository, UserRepository};
use crate::types::{TicketId, UserId};
use crate::util::Sensitive;
use crate::App;

pub const JWT_SECRET: &str = "helpdesk test signing key";

#[must_use]
pub fn test_config() -> config::Server {
    config::Server {
        ip: [127, 0, 0, 1].into(),
        port: 0,
        workers: None,
        db: config::Database {
            url: Sensitive::new("postgres://localhost/helpdesk".into()),
            pool_size: NonZeroU32::new(1).unwrap(),
            min_idle: None,
            timeout_secs: NonZeroU64::new(1).unwrap(),
            enforce_tls: false,
            run_migrations: false,
        },
        auth: config::Auth {
            jwt_secret: Sensitive::new(JWT_SECRET.into()),
            token_ttl_secs: NonZeroU64::new(86_400).unwrap(),
        },
        logging: config::Logging::default(),
    }
}

#[must_use]
pub fn token_keys() -> TokenKeys {
    TokenKeys::new(JWT_SECRET.as_bytes(), Duration::from_secs(86_400))
}

/// App backed by fresh in-memory repositories.
#[must_use]
pub fn build_test_app() -> (App, Arc<MemoryUserRepository>, Arc<MemoryTicketRepository>) {
    let users = Arc::new(MemoryUserRepository::default());
    let tickets = Arc::new(MemoryTicketRepository::default());
    let app = App::from_parts(test_config(), users.clone(), tickets.clone());
    (app, users, tickets)
}

#[must_use]
pub fn new_ticket(title: &str) -> NewTicket {
    NewTicket {
        title: title.into(),
        description: "Something in the office stopped working today.".into(),
        status: TicketStatus::Open,
        priority: Priority::MEDIUM,
        assignee: None,
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(Error::UniqueViolation.into());
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(users.len() as u64 + 1),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}

/// Keeps every ticket in a vector, soft deleted ones included, and
/// mirrors the filtering and ordering of the Postgres queries.
#[derive(Debug, Default)]
pub struct MemoryTicketRepository {
    tickets: Mutex<Vec<Ticket>>,
}

impl MemoryTicketRepository {
    pub fn insert(&self, ticket: NewTicket) -> Ticket {
        let mut tickets = self.tickets.lock().unwrap();
        let now = Utc::now();
        let ticket = Ticket {
            id: TicketId::new(tickets.len() as u64 + 1),
            title: ticket.title,
            description: ticket.description,
            status: ticket.status,
            priority: ticket.priority,
            assignee: ticket.assignee,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        tickets.push(ticket.clone());
        ticket
    }

    /// Reads a ticket even if it is soft deleted.
    pub fn get(&self, id: TicketId) -> Option<Ticket> {
        let tickets = self.tickets.lock().unwrap();
        tickets.iter().find(|t| t.id == id).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.lock().unwrap().is_empty()
    }
}

/// Same column semantics as the `UPDATE ... SET` built by the
/// Postgres repository.
fn apply_changes(ticket: &mut Ticket, changes: &TicketChanges) {
    if let Some(title) = &changes.title {
        ticket.title.clone_from(title);
    }
    if let Some(description) = &changes.description {
        ticket.description.clone_from(description);
    }
    if let Some(status) = changes.status {
        ticket.status = status;
    }
    if let Some(priority) = changes.priority {
        ticket.priority = priority;
    }
    if let Some(assignee) = &changes.assignee {
        ticket.assignee.clone_from(assignee);
    }
}

fn compare(a: &Ticket, b: &Ticket, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::Priority => a.priority.cmp(&b.priority),
        // Postgres sorts NULL after every value in ascending order
        SortField::Assignee => match (&a.assignee, &b.assignee) {
            (Some(a), Some(b)) => a.cmp(b),
            (None, None) => Ordering::Equal,
            (None, Some(..)) => Ordering::Greater,
            (Some(..), None) => Ordering::Less,
        },
    }
}

#[async_trait]
impl TicketRepository for MemoryTicketRepository {
    async fn find_all(&self, query: &TicketQuery) -> Result<(Vec<Ticket>, u64)> {
        let tickets = self.tickets.lock().unwrap();
        let search = query.search.as_ref().map(|s| s.to_lowercase());

        let mut matched = tickets
            .iter()
            .filter(|t| !t.is_deleted)
            .filter(|t| match &search {
                Some(search) => t.title.to_lowercase().contains(search),
                None => true,
            })
            .filter(|t| query.status.map_or(true, |status| t.status == status))
            .cloned()
            .collect::<Vec<_>>();

        matched.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort).then(a.id.cmp(&b.id));
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>> {
        let tickets = self.tickets.lock().unwrap();
        Ok(tickets.iter().find(|t| t.id == id && !t.is_deleted).cloned())
    }

    async fn create(&self, ticket: &NewTicket) -> Result<Ticket> {
        Ok(self.insert(ticket.clone()))
    }

    async fn update(&self, id: TicketId, changes: &TicketChanges) -> Result<Option<Ticket>> {
        let mut tickets = self.tickets.lock().unwrap();
        let Some(ticket) = tickets.iter_mut().find(|t| t.id == id && !t.is_deleted) else {
            return Ok(None);
        };

        apply_changes(ticket, changes);
        ticket.updated_at = Utc::now();
        Ok(Some(ticket.clone()))
    }

    async fn soft_delete(&self, id: TicketId) -> Result<Option<Ticket>> {
        let mut tickets = self.tickets.lock().unwrap();
        let Some(ticket) = tickets.iter_mut().find(|t| t.id == id && !t.is_deleted) else {
            return Ok(None);
        };

        ticket.is_deleted = true;
        ticket.updated_at = Utc::now();
        Ok(Some(ticket.clone()))
    }
}

#[test]
fn apply_changes_can_clear_assignee() {
    let tickets = MemoryTicketRepository::default();
    let mut ticket = tickets.insert(NewTicket {
        assignee: Some("bob".into()),
        priority: Priority::LOW,
        ..new_ticket("Printer on fire")
    });

    let changes = TicketChanges {
        status: Some(TicketStatus::Resolved),
        assignee: Some(None),
        ..Default::default()
    };
    apply_changes(&mut ticket, &changes);

    assert_eq!(ticket.status, TicketStatus::Resolved);
    assert_eq!(ticket.assignee, None);
    assert_eq!(ticket.priority, Priority::LOW);
    assert_eq!(ticket.title, "Printer on fire");
}
