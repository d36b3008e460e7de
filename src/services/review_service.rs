use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::reviews::ReviewRequest,
    error::{AppError, AppResult},
    models::{OrderStatus, Review},
    services::{account_service::AccountService, product_service::Catalog},
    session::Session,
};

#[derive(Debug, Clone)]
pub struct ReviewService {
    accounts: AccountService,
}

impl ReviewService {
    pub fn new(accounts: AccountService) -> Self {
        Self { accounts }
    }

    /// Records a review for a product the session user has received, then
    /// pushes the new average rating into the catalog.
    pub fn submit_review(
        &self,
        session: &Session,
        catalog: &mut Catalog,
        payload: ReviewRequest,
    ) -> AppResult<Review> {
        let user = session.require_user()?;
        if !(1..=5).contains(&payload.rating) {
            return Err(AppError::InvalidRating);
        }
        if !self.can_review(user.id, &payload.product_id) {
            return Err(AppError::NotEligibleForReview);
        }

        let review = Review {
            id: Uuid::new_v4(),
            user_id: user.id,
            user_name: user.name.clone(),
            product_id: payload.product_id,
            rating: payload.rating,
            comment: payload.comment,
            date: Utc::now(),
        };
        self.accounts.add_review(&review)?;

        let summary = self.accounts.get_product_average_rating(&review.product_id);
        if !catalog.update_product_rating(&review.product_id, summary.rating) {
            tracing::debug!(product_id = %review.product_id, "reviewed product not in catalog");
        }

        Ok(review)
    }

    /// A delivered order containing the product is required.
    pub fn can_review(&self, user_id: Uuid, product_id: &str) -> bool {
        self.accounts
            .get_orders(user_id)
            .iter()
            .any(|order| order.status == OrderStatus::Delivered && order.contains_product(product_id))
    }

    pub fn has_reviewed(&self, user_id: Uuid, product_id: &str) -> bool {
        self.accounts
            .get_user_reviews(user_id)
            .iter()
            .any(|review| review.product_id == product_id)
    }

    pub fn my_reviews(&self, session: &Session) -> AppResult<Vec<Review>> {
        let user = session.require_user()?;
        Ok(self.accounts.get_user_reviews(user.id))
    }
}
