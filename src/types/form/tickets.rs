use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{NewTicket, Priority, TicketChanges, TicketStatus};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicket {
    #[validate(length(min = 5, max = 80, message = "Title must be between 5 and 80 characters"))]
    pub title: String,
    #[validate(length(min = 20, message = "Description must be at least 20 characters"))]
    pub description: String,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub assignee: Option<String>,
}

impl From<CreateTicket> for NewTicket {
    fn from(form: CreateTicket) -> Self {
        Self {
            title: form.title,
            description: form.description,
            status: form.status.unwrap_or_default(),
            priority: form.priority.unwrap_or_default(),
            assignee: form.assignee,
        }
    }
}

/// Partial ticket update. Fields left out are not touched and
/// `"assignee": null` unassigns the ticket.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicket {
    #[validate(length(min = 5, max = 80, message = "Title must be between 5 and 80 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 20, message = "Description must be at least 20 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "crate::util::serde::double_option")]
    pub assignee: Option<Option<String>>,
}

impl From<UpdateTicket> for TicketChanges {
    fn from(form: UpdateTicket) -> Self {
        Self {
            title: form.title,
            description: form.description,
            status: form.status,
            priority: form.priority,
            assignee: form.assignee,
        }
    }
}

/// Raw query string of `GET /tickets`. Values are checked when
/// turned into a [`TicketQuery`](crate::models::TicketQuery).
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTickets {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
