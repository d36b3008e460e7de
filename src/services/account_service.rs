use chrono::Utc;
use url::Url;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::{Db, keys},
    dto::auth::{LoginRequest, RegisterRequest},
    error::{AppError, AppResult},
    models::{Order, OrderStatus, RatingSummary, Review, User},
    session::Session,
};

const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/";

/// Users, session pointer, orders and reviews, each a whole-document table
/// in the store. Lookups are full scans.
#[derive(Debug, Clone)]
pub struct AccountService {
    db: Db,
}

impl AccountService {
    pub fn new(db: Db) -> Self {
        for key in keys::TABLES {
            db.ensure_table(key);
        }
        Self { db }
    }

    /// Creates an account and signs it in. The password is accepted but not stored.
    pub fn register(&self, session: &mut Session, payload: RegisterRequest) -> AppResult<User> {
        let RegisterRequest {
            name, email, phone, ..
        } = payload;

        match self.create_user(name, email, phone) {
            Ok(user) => {
                session.set_user(user.clone());
                tracing::info!(user_id = %user.id, "user registered");
                log_audit(
                    Some(user.id),
                    "user_register",
                    Some("users"),
                    Some(serde_json::json!({ "user_id": user.id })),
                );
                Ok(user)
            }
            Err(AppError::DuplicateEmail) => Err(AppError::DuplicateEmail),
            Err(err) => {
                tracing::warn!(error = %err, "registration failed");
                Err(AppError::RegistrationFailed)
            }
        }
    }

    fn create_user(&self, name: String, email: String, phone: Option<String>) -> AppResult<User> {
        let mut users: Vec<User> = self.db.load_table(keys::USERS)?;
        if users.iter().any(|user| user.email == email) {
            return Err(AppError::DuplicateEmail);
        }

        let user = User {
            id: Uuid::new_v4(),
            avatar: avatar_url(&name),
            name,
            email,
            phone,
            date_joined: Utc::now(),
            address: None,
        };

        users.push(user.clone());
        self.db.write(keys::USERS, &users)?;
        self.db.write(keys::CURRENT_USER, &user)?;

        Ok(user)
    }

    /// Signs in by email alone; no credential check is performed.
    pub fn login(&self, session: &mut Session, payload: LoginRequest) -> AppResult<User> {
        let LoginRequest { email, .. } = payload;

        let users: Vec<User> = self.db.load_table(keys::USERS).map_err(|err| {
            tracing::warn!(error = %err, "login failed");
            AppError::LoginFailed
        })?;

        let user = users
            .into_iter()
            .find(|user| user.email == email)
            .ok_or(AppError::UserNotFound)?;

        self.db.write(keys::CURRENT_USER, &user).map_err(|err| {
            tracing::warn!(error = %err, "login failed");
            AppError::LoginFailed
        })?;

        session.set_user(user.clone());
        tracing::info!(user_id = %user.id, "user logged in");
        log_audit(
            Some(user.id),
            "user_login",
            Some("users"),
            Some(serde_json::json!({ "user_id": user.id })),
        );

        Ok(user)
    }

    /// Clears the session pointer. Cart and wishlist are left alone.
    pub fn logout(&self, session: &mut Session) {
        if let Err(err) = self.db.remove(keys::CURRENT_USER) {
            tracing::warn!(error = %err, "failed to clear session pointer");
        }
        if let Some(user) = session.user() {
            log_audit(Some(user.id), "user_logout", Some("users"), None);
        }
        session.clear();
    }

    pub fn get_current_user(&self) -> Option<User> {
        self.db.read(keys::CURRENT_USER)
    }

    /// Replaces the stored user with the same id and refreshes the session.
    pub fn update_user(&self, session: &mut Session, user: User) -> bool {
        match self.replace_user(&user) {
            Ok(()) => {
                log_audit(Some(user.id), "user_update", Some("users"), None);
                session.set_user(user);
                true
            }
            Err(err) => {
                tracing::warn!(user_id = %user.id, error = %err, "user update failed");
                false
            }
        }
    }

    fn replace_user(&self, user: &User) -> AppResult<()> {
        let mut users: Vec<User> = self.db.load_table(keys::USERS)?;
        let existing = users
            .iter_mut()
            .find(|existing| existing.id == user.id)
            .ok_or(AppError::NotFound)?;
        *existing = user.clone();

        self.db.write(keys::USERS, &users)?;
        self.db.write(keys::CURRENT_USER, user)?;
        Ok(())
    }

    /// Orders owned by `user_id`, newest first.
    pub fn get_orders(&self, user_id: Uuid) -> Vec<Order> {
        self.db
            .read_table::<Order>(keys::ORDERS)
            .into_iter()
            .filter(|order| order.user_id == user_id)
            .collect()
    }

    pub fn find_order(&self, order_id: Uuid) -> Option<Order> {
        self.db
            .read_table::<Order>(keys::ORDERS)
            .into_iter()
            .find(|order| order.id == order_id)
    }

    /// Prepends the order to the orders table.
    pub fn save_order(&self, order: &Order) -> bool {
        let result = self
            .db
            .load_table::<Order>(keys::ORDERS)
            .and_then(|mut orders| {
                orders.insert(0, order.clone());
                self.db.write(keys::ORDERS, &orders)
            });

        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(order_id = %order.id, error = %err, "failed to save order");
                false
            }
        }
    }

    pub fn update_order_status(&self, order_id: Uuid, status: OrderStatus) -> bool {
        match self.set_order_status(order_id, status) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(order_id = %order_id, %status, error = %err, "order status update failed");
                false
            }
        }
    }

    /// Moves an order to `status` if the transition is legal. Nothing is
    /// written when the order is unknown or the transition is rejected.
    pub fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let mut orders: Vec<Order> = self.db.load_table(keys::ORDERS)?;
        let order = orders
            .iter_mut()
            .find(|order| order.id == order_id)
            .ok_or(AppError::NotFound)?;

        if !order.status.can_transition_to(status) {
            return Err(AppError::InvalidStatusTransition {
                from: order.status,
                to: status,
            });
        }
        order.status = status;
        let updated = order.clone();

        self.db.write(keys::ORDERS, &orders)?;
        log_audit(
            Some(updated.user_id),
            "order_status_update",
            Some("orders"),
            Some(serde_json::json!({ "order_id": updated.id, "status": updated.status })),
        );

        Ok(updated)
    }

    pub fn get_reviews(&self, product_id: Option<&str>) -> Vec<Review> {
        let reviews: Vec<Review> = self.db.read_table(keys::REVIEWS);
        match product_id {
            Some(product_id) => reviews
                .into_iter()
                .filter(|review| review.product_id == product_id)
                .collect(),
            None => reviews,
        }
    }

    pub fn get_user_reviews(&self, user_id: Uuid) -> Vec<Review> {
        self.db
            .read_table::<Review>(keys::REVIEWS)
            .into_iter()
            .filter(|review| review.user_id == user_id)
            .collect()
    }

    pub fn save_review(&self, review: &Review) -> bool {
        match self.add_review(review) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(review_id = %review.id, error = %err, "failed to save review");
                false
            }
        }
    }

    /// Appends a review, enforcing a 1..=5 rating and one review per user and product.
    pub fn add_review(&self, review: &Review) -> AppResult<()> {
        if !(1..=5).contains(&review.rating) {
            return Err(AppError::InvalidRating);
        }

        let mut reviews: Vec<Review> = self.db.load_table(keys::REVIEWS)?;
        if reviews
            .iter()
            .any(|r| r.user_id == review.user_id && r.product_id == review.product_id)
        {
            return Err(AppError::DuplicateReview);
        }

        reviews.push(review.clone());
        self.db.write(keys::REVIEWS, &reviews)?;
        log_audit(
            Some(review.user_id),
            "review_create",
            Some("reviews"),
            Some(serde_json::json!({ "product_id": review.product_id, "rating": review.rating })),
        );
        Ok(())
    }

    pub fn get_product_average_rating(&self, product_id: &str) -> RatingSummary {
        let reviews = self.get_reviews(Some(product_id));
        if reviews.is_empty() {
            return RatingSummary {
                rating: 0.0,
                count: 0,
            };
        }

        let total: u32 = reviews.iter().map(|review| u32::from(review.rating)).sum();
        let mean = f64::from(total) / reviews.len() as f64;

        RatingSummary {
            rating: (mean * 10.0).round() / 10.0,
            count: reviews.len(),
        }
    }
}

fn avatar_url(name: &str) -> Option<String> {
    Url::parse_with_params(AVATAR_BASE_URL, &[("name", name), ("background", "random")])
        .map(String::from)
        .ok()
}
