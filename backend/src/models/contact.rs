use chrono::{DateTime, Utc};
use eazypg_shared::{ContactCategory, ContactRequest, ContactResponse, ContactStatus};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContactTicket {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub category: ContactCategory,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactTicket {
    pub fn from_request(user_id: Option<Uuid>, request: ContactRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: request.name,
            email: request.email.to_lowercase(),
            subject: request.subject,
            message: request.message,
            category: request.category.unwrap_or_default(),
            status: ContactStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    pub async fn create(pool: &PgPool, ticket: &ContactTicket) -> Result<Self, AppError> {
        let ticket = sqlx::query_as::<_, ContactTicket>(
            r#"
            INSERT INTO contact_tickets (id, user_id, name, email, subject, message, category, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(ticket.id)
        .bind(ticket.user_id)
        .bind(&ticket.name)
        .bind(&ticket.email)
        .bind(&ticket.subject)
        .bind(&ticket.message)
        .bind(ticket.category)
        .bind(ticket.status)
        .bind(ticket.created_at)
        .bind(ticket.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(ticket)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError> {
        let ticket = sqlx::query_as::<_, ContactTicket>("SELECT * FROM contact_tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(ticket)
    }

    pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, AppError> {
        let tickets = sqlx::query_as::<_, ContactTicket>(
            "SELECT * FROM contact_tickets WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tickets)
    }

    pub fn to_response(&self) -> ContactResponse {
        ContactResponse {
            id: self.id,
            user_id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
            category: self.category,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
