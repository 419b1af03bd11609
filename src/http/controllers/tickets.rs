use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::http::AuthUser;
use crate::models::{Ticket, TicketPage};
use crate::types::form::tickets::{CreateTicket, ListTickets, MessageResponse, UpdateTicket};
use crate::App;

pub async fn list(
    app: web::Data<App>,
    query: web::Query<ListTickets>,
) -> Result<web::Json<TicketPage>, ApiError> {
    let page = app.tickets.get_tickets(query.into_inner()).await?;
    Ok(web::Json(page))
}

pub async fn create(
    app: web::Data<App>,
    AuthUser(claims): AuthUser,
    form: web::Json<CreateTicket>,
) -> Result<HttpResponse, ApiError> {
    let ticket = app.tickets.create_ticket(form.into_inner()).await?;
    tracing::debug!(user.id = %claims.id, ticket.id = %ticket.id, "ticket opened");
    Ok(HttpResponse::Created().json(ticket))
}

pub async fn get(
    app: web::Data<App>,
    id: web::Path<String>,
) -> Result<web::Json<Ticket>, ApiError> {
    let ticket = app.tickets.get_ticket_by_id(&id).await?;
    Ok(web::Json(ticket))
}

pub async fn update(
    app: web::Data<App>,
    _user: AuthUser,
    id: web::Path<String>,
    form: web::Json<UpdateTicket>,
) -> Result<web::Json<Ticket>, ApiError> {
    let ticket = app.tickets.update_ticket(&id, form.into_inner()).await?;
    Ok(web::Json(ticket))
}

pub async fn delete(
    app: web::Data<App>,
    _user: AuthUser,
    id: web::Path<String>,
) -> Result<web::Json<MessageResponse>, ApiError> {
    app.tickets.delete_ticket(&id).await?;
    Ok(web::Json(MessageResponse {
        message: "Ticket deleted successfully".into(),
    }))
}
