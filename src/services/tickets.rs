use std::sync::Arc;
use validator::Validate;

use crate::error::{ApiError, ErrorCategory, Result};
use crate::models::{
    NewTicket, SortField, SortOrder, Ticket, TicketChanges, TicketPage, TicketQuery, TicketStatus,
};
use crate::repositories::TicketRepository;
use crate::types::form::tickets::{CreateTicket, ListTickets, UpdateTicket};
use crate::types::TicketId;

/// Create, read, update and soft delete operations on tickets.
#[derive(Clone)]
pub struct TicketService {
    tickets: Arc<dyn TicketRepository>,
}

impl std::fmt::Debug for TicketService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketService").finish_non_exhaustive()
    }
}

impl TicketService {
    #[must_use]
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    #[tracing::instrument(skip(self), name = "services.tickets.list")]
    pub async fn get_tickets(&self, params: ListTickets) -> Result<TicketPage> {
        let query = parse_query(params)?;
        let (tickets, total) = self.tickets.find_all(&query).await?;
        Ok(TicketPage::new(tickets, total, &query))
    }

    #[tracing::instrument(skip(self), name = "services.tickets.get")]
    pub async fn get_ticket_by_id(&self, id: &str) -> Result<Ticket> {
        const NOT_FOUND: &str = "Ticket not found";

        let id = parse_id(id, NOT_FOUND)?;
        self.tickets
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::new(ErrorCategory::NotFound).message(NOT_FOUND))
    }

    #[tracing::instrument(skip_all, name = "services.tickets.create")]
    pub async fn create_ticket(&self, form: CreateTicket) -> Result<Ticket> {
        form.validate()?;

        let ticket = self.tickets.create(&NewTicket::from(form)).await?;
        tracing::info!(ticket.id = %ticket.id, "created ticket");

        Ok(ticket)
    }

    #[tracing::instrument(skip(self, form), name = "services.tickets.update")]
    pub async fn update_ticket(&self, id: &str, form: UpdateTicket) -> Result<Ticket> {
        const NOT_FOUND: &str = "Ticket not found or could not be updated";

        form.validate()?;

        let id = parse_id(id, NOT_FOUND)?;
        let changes = TicketChanges::from(form);
        self.tickets
            .update(id, &changes)
            .await?
            .ok_or_else(|| ApiError::new(ErrorCategory::NotFound).message(NOT_FOUND))
    }

    #[tracing::instrument(skip(self), name = "services.tickets.delete")]
    pub async fn delete_ticket(&self, id: &str) -> Result<Ticket> {
        const NOT_FOUND: &str = "Ticket not found or could not be deleted";

        let id = parse_id(id, NOT_FOUND)?;
        let ticket = self
            .tickets
            .soft_delete(id)
            .await?
            .ok_or_else(|| ApiError::new(ErrorCategory::NotFound).message(NOT_FOUND))?;

        tracing::info!(ticket.id = %ticket.id, "soft deleted ticket");
        Ok(ticket)
    }
}

// An id that can never exist is reported the same way as a missing ticket.
fn parse_id(id: &str, not_found: &'static str) -> Result<TicketId> {
    id.parse()
        .map_err(|_| ApiError::new(ErrorCategory::NotFound).message(not_found))
}

fn parse_query(params: ListTickets) -> Result<TicketQuery> {
    fn invalid(message: String) -> ApiError {
        ApiError::new(ErrorCategory::InvalidRequest).message(message)
    }

    let page = match params.page {
        None => TicketQuery::DEFAULT_PAGE,
        Some(page) => u32::try_from(page)
            .ok()
            .filter(|page| *page >= 1)
            .ok_or_else(|| invalid("page must be a positive integer".into()))?,
    };

    let limit = match params.limit {
        None => TicketQuery::DEFAULT_LIMIT,
        Some(limit) => u32::try_from(limit)
            .ok()
            .filter(|limit| (1..=TicketQuery::MAX_LIMIT).contains(limit))
            .ok_or_else(|| {
                invalid(format!("limit must be between 1 and {}", TicketQuery::MAX_LIMIT))
            })?,
    };

    // surrounding whitespace is part of the pattern unless it is all there is
    let search = params.search.filter(|search| !search.trim().is_empty());

    let status = params
        .status
        .filter(|status| !status.is_empty())
        .map(|status| status.parse::<TicketStatus>())
        .transpose()
        .map_err(|error| invalid(error.to_string()))?;

    let sort = params
        .sort_field
        .filter(|field| !field.is_empty())
        .map(|field| field.parse::<SortField>())
        .transpose()
        .map_err(|error| invalid(error.to_string()))?
        .unwrap_or_default();

    let order = params
        .sort_order
        .filter(|order| !order.is_empty())
        .map(|order| order.parse::<SortOrder>())
        .transpose()
        .map_err(|error| invalid(error.to_string()))?
        .unwrap_or_default();

    Ok(TicketQuery {
        page,
        limit,
        search,
        status,
        sort,
        order,
    })
}
