use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::rows::TicketRow;
use super::{ErrorExt, Pool, Result};
use crate::models::{NewTicket, Ticket, TicketChanges, TicketQuery};
use crate::repositories::TicketRepository;
use crate::types::TicketId;

#[derive(Debug, Clone)]
pub struct PgTicketRepository {
    pool: Pool,
}

impl PgTicketRepository {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

/// Escapes `LIKE` wildcards so the search text is matched literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &TicketQuery) {
    builder.push(" WHERE is_deleted = FALSE");

    if let Some(search) = &query.search {
        builder
            .push(r" AND title ILIKE ")
            .push_bind(format!("%{}%", escape_like(search)))
            .push(r" ESCAPE '\'");
    }

    if let Some(status) = query.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    #[tracing::instrument(skip(self), name = "db.tickets.find_all")]
    async fn find_all(&self, query: &TicketQuery) -> Result<(Vec<Ticket>, u64)> {
        let mut conn = self.pool.get().await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM tickets");
        push_filters(&mut count, query);

        let (total,) = count
            .build_query_as::<(i64,)>()
            .fetch_one(&mut *conn)
            .await
            .into_db_error()?;

        let mut select = QueryBuilder::new("SELECT * FROM tickets");
        push_filters(&mut select, query);

        let order = query.order.as_sql();
        select
            .push(format!(
                " ORDER BY {} {order}, id {order}",
                query.sort.column()
            ))
            .push(" LIMIT ")
            .push_bind(i64::from(query.limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.offset()).unwrap_or(i64::MAX));

        let tickets = select
            .build_query_as::<TicketRow>()
            .fetch_all(&mut *conn)
            .await
            .into_db_error()?
            .into_iter()
            .map(Ticket::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok((tickets, u64::try_from(total).unwrap_or_default()))
    }

    #[tracing::instrument(skip(self), name = "db.tickets.find_by_id")]
    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>> {
        let mut conn = self.pool.get().await?;
        sqlx::query_as::<_, TicketRow>(
            "SELECT * FROM tickets WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .into_db_error()?
        .map(Ticket::try_from)
        .transpose()
    }

    #[tracing::instrument(skip_all, name = "db.tickets.create")]
    async fn create(&self, ticket: &NewTicket) -> Result<Ticket> {
        let mut conn = self.pool.get().await?;
        let row = sqlx::query_as::<_, TicketRow>(
            r"INSERT INTO tickets (title, description, status, priority, assignee)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *",
        )
        .bind(&ticket.title)
        .bind(&ticket.description)
        .bind(ticket.status.as_str())
        .bind(i16::from(ticket.priority))
        .bind(&ticket.assignee)
        .fetch_one(&mut *conn)
        .await
        .into_db_error()?;

        Ticket::try_from(row)
    }

    #[tracing::instrument(skip(self, changes), name = "db.tickets.update")]
    async fn update(&self, id: TicketId, changes: &TicketChanges) -> Result<Option<Ticket>> {
        let mut conn = self.pool.get().await?;

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE tickets SET updated_at = now()");
        if let Some(title) = &changes.title {
            builder.push(", title = ").push_bind(title.clone());
        }
        if let Some(description) = &changes.description {
            builder.push(", description = ").push_bind(description.clone());
        }
        if let Some(status) = changes.status {
            builder.push(", status = ").push_bind(status.as_str());
        }
        if let Some(priority) = changes.priority {
            builder.push(", priority = ").push_bind(i16::from(priority));
        }
        if let Some(assignee) = &changes.assignee {
            builder.push(", assignee = ").push_bind(assignee.clone());
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND is_deleted = FALSE RETURNING *");

        builder
            .build_query_as::<TicketRow>()
            .fetch_optional(&mut *conn)
            .await
            .into_db_error()?
            .map(Ticket::try_from)
            .transpose()
    }

    #[tracing::instrument(skip(self), name = "db.tickets.soft_delete")]
    async fn soft_delete(&self, id: TicketId) -> Result<Option<Ticket>> {
        let mut conn = self.pool.get().await?;
        sqlx::query_as::<_, TicketRow>(
            r"UPDATE tickets SET is_deleted = TRUE, updated_at = now()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .into_db_error()?
        .map(Ticket::try_from)
        .transpose()
    }
}
