use chrono::Utc;
use eazypg_shared::{
    BookingStatus, CreateReviewRequest, HelpfulResponse, PageQuery, PaginationMeta,
    ReviewPage, ReviewReplyRequest, ReviewResponse, ReviewType, DEFAULT_REVIEW_PAGE_SIZE,
    ERROR_BOOKING_NOT_FOUND, ERROR_NOT_AUTHORIZED, ERROR_REVIEW_EXISTS, ERROR_REVIEW_NOT_FOUND,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::user_summaries;
use crate::error::AppError;
use crate::models::Review;
use crate::repositories::{
    BookingRepository, ListingRepository, PaginationParams, ReviewRepository, UserRepository,
};
use crate::rules::average_rating;

#[derive(Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    bookings: Arc<dyn BookingRepository>,
    listings: Arc<dyn ListingRepository>,
    users: Arc<dyn UserRepository>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        bookings: Arc<dyn BookingRepository>,
        listings: Arc<dyn ListingRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            reviews,
            bookings,
            listings,
            users,
        }
    }

    /// Review a completed stay. Guest reviews also refresh the listing rating.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateReviewRequest,
    ) -> Result<ReviewResponse, AppError> {
        request.validate()?;

        let booking = self
            .bookings
            .find_by_id(request.booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_BOOKING_NOT_FOUND.to_string()))?;

        if booking.status != BookingStatus::Completed {
            return Err(AppError::Validation(
                "Can only review completed bookings".to_string(),
            ));
        }

        let reviewee_id = match request.review_type {
            ReviewType::GuestToHost if booking.guest_id == user_id => booking.host_id,
            ReviewType::HostToGuest if booking.host_id == user_id => booking.guest_id,
            _ => return Err(AppError::Authorization(ERROR_NOT_AUTHORIZED.to_string())),
        };

        if self
            .reviews
            .exists_for_booking(booking.id, request.review_type)
            .await?
        {
            return Err(AppError::Validation(ERROR_REVIEW_EXISTS.to_string()));
        }

        let review_type = request.review_type;
        let review = Review::from_request(booking.listing_id, user_id, reviewee_id, request);
        let review = self.reviews.create(&review).await.map_err(|err| match err {
            AppError::Conflict(_) => AppError::Validation(ERROR_REVIEW_EXISTS.to_string()),
            other => other,
        })?;

        self.mark_reviewed(booking.id, review_type).await?;

        if review_type == ReviewType::GuestToHost {
            self.refresh_listing_rating(booking.listing_id).await?;
        }

        info!(
            "Review {} ({}) created for booking {}",
            review.id, review_type, booking.id
        );
        self.with_reviewer(review).await
    }

    /// Visible guest reviews of a listing, newest first.
    pub async fn list_for_listing(
        &self,
        listing_id: Uuid,
        query: PageQuery,
    ) -> Result<ReviewPage, AppError> {
        query.validate()?;
        let pagination =
            PaginationParams::from_page(query.page, query.limit, DEFAULT_REVIEW_PAGE_SIZE);

        let (reviews, total) = self
            .reviews
            .visible_for_listing(listing_id, pagination.limit, pagination.offset)
            .await?;

        let reviewers =
            user_summaries(self.users.as_ref(), reviews.iter().map(|r| r.reviewer_id)).await?;

        Ok(ReviewPage {
            reviews: reviews
                .iter()
                .map(|review| review.to_response(reviewers.get(&review.reviewer_id).cloned()))
                .collect(),
            pagination: PaginationMeta::new(pagination.page, pagination.limit, total),
        })
    }

    /// The reviewee answers a review. A second answer replaces the first.
    pub async fn respond(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: ReviewReplyRequest,
    ) -> Result<ReviewResponse, AppError> {
        request.validate()?;

        let review = self.find(id).await?;
        if review.reviewee_id != user_id {
            return Err(AppError::Authorization(ERROR_NOT_AUTHORIZED.to_string()));
        }

        let review = self
            .reviews
            .set_response(id, request.text.trim(), Utc::now())
            .await?;
        debug!("Review {} answered by {}", id, user_id);
        self.with_reviewer(review).await
    }

    pub async fn toggle_helpful(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<HelpfulResponse, AppError> {
        let review = self
            .reviews
            .toggle_helpful(id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_REVIEW_NOT_FOUND.to_string()))?;

        let marked = review.helpful_user_ids.contains(&user_id);
        Ok(HelpfulResponse {
            message: if marked {
                "Marked as helpful"
            } else {
                "Unmarked as helpful"
            }
            .to_string(),
            helpful_count: review.helpful_user_ids.len(),
        })
    }

    /// Set the reviewer's flag on the booking, re-reading it when the other
    /// party's review landed first.
    async fn mark_reviewed(
        &self,
        booking_id: Uuid,
        review_type: ReviewType,
    ) -> Result<(), AppError> {
        let mut attempts = 0;
        loop {
            let mut booking = self
                .bookings
                .find_by_id(booking_id)
                .await?
                .ok_or_else(|| AppError::NotFound(ERROR_BOOKING_NOT_FOUND.to_string()))?;
            match review_type {
                ReviewType::GuestToHost => booking.reviewed_by_guest = true,
                ReviewType::HostToGuest => booking.reviewed_by_host = true,
            }

            match self.bookings.update(&booking, false).await {
                Err(AppError::Conflict(_)) if attempts < 3 => attempts += 1,
                other => return other.map(|_| ()),
            }
        }
    }

    async fn refresh_listing_rating(&self, listing_id: Uuid) -> Result<(), AppError> {
        let ratings = self.reviews.visible_overall_ratings(listing_id).await?;
        if let Some(summary) = average_rating(&ratings) {
            self.listings
                .update_rating(listing_id, summary.average, summary.count)
                .await?;
            debug!(
                "Listing {} rating now {} over {} reviews",
                listing_id, summary.average, summary.count
            );
        }
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Review, AppError> {
        self.reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(ERROR_REVIEW_NOT_FOUND.to_string()))
    }

    async fn with_reviewer(&self, review: Review) -> Result<ReviewResponse, AppError> {
        let reviewer = self
            .users
            .find_by_id(review.reviewer_id)
            .await?
            .map(|user| user.to_summary());
        Ok(review.to_response(reviewer))
    }
}
