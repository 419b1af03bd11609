use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

use super::{Ticket, TicketStatus};

/// Filters, ordering and window of a ticket listing. Every value
/// in here is already checked, so repositories can trust it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
    pub sort: SortField,
    pub order: SortOrder,
}

impl TicketQuery {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for TicketQuery {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
            search: None,
            status: None,
            sort: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketPage {
    pub tickets: Vec<Ticket>,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

impl TicketPage {
    #[must_use]
    pub fn new(tickets: Vec<Ticket>, total: u64, query: &TicketQuery) -> Self {
        Self {
            tickets,
            total,
            page: query.page,
            pages: total.div_ceil(u64::from(query.limit.max(1))),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Status,
    Priority,
    Assignee,
}

impl SortField {
    /// Column the field is stored in.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Assignee => "assignee",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown {0:?} sort field")]
pub struct UnknownSortField(pub String);

impl FromStr for SortField {
    type Err = UnknownSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            "title" => Ok(Self::Title),
            "status" => Ok(Self::Status),
            "priority" => Ok(Self::Priority),
            "assignee" => Ok(Self::Assignee),
            _ => Err(UnknownSortField(s.to_string())),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown {0:?} sort order")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(UnknownSortOrder(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        let query = TicketQuery {
            page: 3,
            limit: 25,
            ..Default::default()
        };
        assert_eq!(query.offset(), 50);
        assert_eq!(TicketQuery::default().offset(), 0);
    }

    #[test]
    fn pages_round_up() {
        let query = TicketQuery {
            limit: 10,
            ..Default::default()
        };
        assert_eq!(TicketPage::new(Vec::new(), 0, &query).pages, 0);
        assert_eq!(TicketPage::new(Vec::new(), 10, &query).pages, 1);
        assert_eq!(TicketPage::new(Vec::new(), 11, &query).pages, 2);
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("updatedAt".parse::<SortField>().unwrap(), SortField::UpdatedAt);
        assert!("password_hash".parse::<SortField>().is_err());
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
