use eazypg_shared::{
    ContactRequest, ContactResponse, ContactSubmittedResponse, ERROR_CONTACT_NOT_FOUND,
    ERROR_NOT_AUTHORIZED, SUCCESS_CONTACT_SUBMITTED,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::ContactTicket;
use crate::repositories::ContactRepository;

/// Support tickets from the contact form.
#[derive(Clone)]
pub struct ContactService {
    contacts: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(contacts: Arc<dyn ContactRepository>) -> Self {
        Self { contacts }
    }

    /// Anonymous submissions are accepted; signed-in users own their ticket.
    pub async fn submit(
        &self,
        user_id: Option<Uuid>,
        request: ContactRequest,
    ) -> Result<ContactSubmittedResponse, AppError> {
        request.validate()?;

        let ticket = self
            .contacts
            .create(&ContactTicket::from_request(user_id, request))
            .await?;
        info!(
            "Contact ticket {} opened ({:?})",
            ticket.id, ticket.category
        );

        Ok(ContactSubmittedResponse {
            message: SUCCESS_CONTACT_SUBMITTED.to_string(),
            ticket_id: ticket.id,
        })
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<ContactResponse>, AppError> {
        let tickets = self.contacts.find_by_user(user_id).await?;
        Ok(tickets.iter().map(ContactTicket::to_response).collect())
    }

    /// Tickets owned by someone else are off limits. Anonymous ones are not.
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<ContactResponse, AppError> {
        let ticket = self
            .contacts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_CONTACT_NOT_FOUND.to_string()))?;

        match ticket.user_id {
            Some(owner) if owner != user_id => {
                Err(AppError::Authorization(ERROR_NOT_AUTHORIZED.to_string()))
            }
            _ => Ok(ticket.to_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use eazypg_shared::{ContactCategory, ContactStatus};

    fn service() -> ContactService {
        ContactService::new(Arc::new(MemoryStore::default()))
    }

    fn request(subject: &str) -> ContactRequest {
        ContactRequest {
            name: "Grace".to_string(),
            email: "Grace@Example.com".to_string(),
            subject: subject.to_string(),
            message: "My booking page does not load".to_string(),
            category: None,
        }
    }

    #[tokio::test]
    async fn test_submit_defaults() {
        let contact = service();
        let user_id = Uuid::new_v4();

        let submitted = contact.submit(Some(user_id), request("Help")).await.unwrap();
        assert_eq!(submitted.message, SUCCESS_CONTACT_SUBMITTED);

        let ticket = contact.get(user_id, submitted.ticket_id).await.unwrap();
        assert_eq!(ticket.email, "grace@example.com");
        assert_eq!(ticket.category, ContactCategory::General);
        assert_eq!(ticket.status, ContactStatus::Open);
        assert_eq!(ticket.user_id, Some(user_id));
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let mut bad = request("Help");
        bad.email = "not-an-email".to_string();

        let result = service().submit(None, bad).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_only_returns_own_tickets() {
        let contact = service();
        let mine = Uuid::new_v4();
        contact.submit(Some(mine), request("First")).await.unwrap();
        contact.submit(Some(mine), request("Second")).await.unwrap();
        contact.submit(Some(Uuid::new_v4()), request("Other")).await.unwrap();
        contact.submit(None, request("Anonymous")).await.unwrap();

        let tickets = contact.list(mine).await.unwrap();
        assert_eq!(tickets.len(), 2);
        assert!(tickets.iter().all(|t| t.user_id == Some(mine)));
    }

    #[tokio::test]
    async fn test_ownership() {
        let contact = service();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let owned = contact.submit(Some(owner), request("Mine")).await.unwrap();
        let result = contact.get(stranger, owned.ticket_id).await;
        assert!(matches!(result, Err(AppError::Authorization(_))));

        let anonymous = contact.submit(None, request("Anyone")).await.unwrap();
        assert!(contact.get(stranger, anonymous.ticket_id).await.is_ok());

        let missing = contact.get(owner, Uuid::new_v4()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
