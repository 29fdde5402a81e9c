use chrono::{DateTime, Utc};
use eazypg_shared::{
    CreateReviewRequest, RatingsInput, ReviewReply, ReviewResponse, ReviewType, UserSummary,
};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub booking_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub review_type: ReviewType,
    pub rating_overall: i16,
    pub rating_cleanliness: Option<i16>,
    pub rating_accuracy: Option<i16>,
    pub rating_check_in: Option<i16>,
    pub rating_communication: Option<i16>,
    pub rating_location: Option<i16>,
    pub rating_value: Option<i16>,
    pub comment: String,
    pub response_text: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub helpful_user_ids: Vec<Uuid>,
    pub reported: bool,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn from_request(
        listing_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        request: CreateReviewRequest,
    ) -> Self {
        let now = Utc::now();
        let ratings = request.ratings;

        Self {
            id: Uuid::new_v4(),
            listing_id,
            booking_id: request.booking_id,
            reviewer_id,
            reviewee_id,
            review_type: request.review_type,
            rating_overall: ratings.overall,
            rating_cleanliness: ratings.cleanliness,
            rating_accuracy: ratings.accuracy,
            rating_check_in: ratings.check_in,
            rating_communication: ratings.communication,
            rating_location: ratings.location,
            rating_value: ratings.value,
            comment: request.comment,
            response_text: None,
            responded_at: None,
            helpful_user_ids: Vec::new(),
            reported: false,
            visible: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add the voter if absent, remove them otherwise.
    pub fn toggle_helpful(&mut self, user_id: Uuid) {
        if let Some(pos) = self.helpful_user_ids.iter().position(|id| *id == user_id) {
            self.helpful_user_ids.remove(pos);
        } else {
            self.helpful_user_ids.push(user_id);
        }
    }

    pub async fn create(pool: &PgPool, review: &Review) -> Result<Self, AppError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (
                id, listing_id, booking_id, reviewer_id, reviewee_id, review_type,
                rating_overall, rating_cleanliness, rating_accuracy, rating_check_in,
                rating_communication, rating_location, rating_value,
                comment, helpful_user_ids, reported, visible, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(review.id)
        .bind(review.listing_id)
        .bind(review.booking_id)
        .bind(review.reviewer_id)
        .bind(review.reviewee_id)
        .bind(review.review_type)
        .bind(review.rating_overall)
        .bind(review.rating_cleanliness)
        .bind(review.rating_accuracy)
        .bind(review.rating_check_in)
        .bind(review.rating_communication)
        .bind(review.rating_location)
        .bind(review.rating_value)
        .bind(&review.comment)
        .bind(&review.helpful_user_ids)
        .bind(review.reported)
        .bind(review.visible)
        .bind(review.created_at)
        .bind(review.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(review)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, AppError> {
        let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(review)
    }

    pub async fn exists_for_booking(
        pool: &PgPool,
        booking_id: Uuid,
        review_type: ReviewType,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE booking_id = $1 AND review_type = $2)",
        )
        .bind(booking_id)
        .bind(review_type)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Visible guest reviews of a listing, newest first, with the total count.
    pub async fn find_visible_for_listing(
        pool: &PgPool,
        listing_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), AppError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE listing_id = $1 AND review_type = 'guest_to_host' AND visible = TRUE
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(listing_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reviews
            WHERE listing_id = $1 AND review_type = 'guest_to_host' AND visible = TRUE
            "#,
        )
        .bind(listing_id)
        .fetch_one(pool)
        .await?;

        Ok((reviews, total))
    }

    pub async fn visible_overall_ratings(
        pool: &PgPool,
        listing_id: Uuid,
    ) -> Result<Vec<i16>, AppError> {
        let ratings = sqlx::query_scalar::<_, i16>(
            r#"
            SELECT rating_overall FROM reviews
            WHERE listing_id = $1 AND review_type = 'guest_to_host' AND visible = TRUE
            "#,
        )
        .bind(listing_id)
        .fetch_all(pool)
        .await?;

        Ok(ratings)
    }

    pub async fn set_response(
        pool: &PgPool,
        id: Uuid,
        text: &str,
        responded_at: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews SET response_text = $2, responded_at = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(text)
        .bind(responded_at)
        .fetch_one(pool)
        .await?;

        Ok(review)
    }

    /// Atomic counterpart of `toggle_helpful`.
    pub async fn toggle_helpful_vote(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, AppError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews SET
                helpful_user_ids = CASE
                    WHEN $2 = ANY(helpful_user_ids) THEN array_remove(helpful_user_ids, $2)
                    ELSE array_append(helpful_user_ids, $2)
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(review)
    }

    pub fn to_response(&self, reviewer: Option<UserSummary>) -> ReviewResponse {
        let response = match (&self.response_text, self.responded_at) {
            (Some(text), Some(responded_at)) => Some(ReviewReply {
                text: text.clone(),
                responded_at,
            }),
            _ => None,
        };

        ReviewResponse {
            id: self.id,
            listing_id: self.listing_id,
            booking_id: self.booking_id,
            reviewer_id: self.reviewer_id,
            reviewer,
            reviewee_id: self.reviewee_id,
            review_type: self.review_type,
            ratings: RatingsInput {
                overall: self.rating_overall,
                cleanliness: self.rating_cleanliness,
                accuracy: self.rating_accuracy,
                check_in: self.rating_check_in,
                communication: self.rating_communication,
                location: self.rating_location,
                value: self.rating_value,
            },
            comment: self.comment.clone(),
            response,
            helpful_count: self.helpful_user_ids.len(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eazypg_shared::RatingsInput;

    fn review() -> Review {
        Review::from_request(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            CreateReviewRequest {
                booking_id: Uuid::new_v4(),
                ratings: RatingsInput {
                    overall: 5,
                    cleanliness: Some(4),
                    accuracy: None,
                    check_in: None,
                    communication: None,
                    location: None,
                    value: None,
                },
                comment: "Lovely stay".to_string(),
                review_type: ReviewType::GuestToHost,
            },
        )
    }

    #[test]
    fn test_toggle_helpful() {
        let mut review = review();
        let voter = Uuid::new_v4();

        review.toggle_helpful(voter);
        assert_eq!(review.to_response(None).helpful_count, 1);

        review.toggle_helpful(voter);
        assert_eq!(review.to_response(None).helpful_count, 0);
    }

    #[test]
    fn test_response_requires_text_and_time() {
        let mut review = review();
        assert!(review.to_response(None).response.is_none());

        review.response_text = Some("Thanks!".to_string());
        review.responded_at = Some(Utc::now());
        let reply = review.to_response(None).response.unwrap();
        assert_eq!(reply.text, "Thanks!");
    }
}
