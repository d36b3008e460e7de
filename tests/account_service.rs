mod common;

use chrono::Utc;
use uuid::Uuid;

use storefront_core::{
    db::{Db, keys},
    dto::auth::{LoginRequest, RegisterForm},
    error::AppError,
    models::{Address, Order, OrderStatus, RatingSummary, Review, User},
    response::ServiceResponse,
};

use common::{register_request, state, state_with};

fn login(email: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: "anything".into(),
    }
}

fn review(user_id: Uuid, product_id: &str, rating: u8) -> Review {
    Review {
        id: Uuid::new_v4(),
        user_id,
        user_name: "Tester".into(),
        product_id: product_id.into(),
        rating,
        comment: String::new(),
        date: Utc::now(),
    }
}

fn order(user_id: Uuid) -> Order {
    Order {
        id: Uuid::new_v4(),
        user_id,
        items: Vec::new(),
        total: 10_00,
        status: OrderStatus::Pending,
        order_date: Utc::now(),
        estimated_delivery: None,
        shipping_address: Address::default(),
        payment_method: "Cash on Delivery".into(),
        tracking_number: None,
    }
}

#[test]
fn register_signs_in_new_user() -> anyhow::Result<()> {
    let mut state = state();

    let user = state.register(register_request("Ann", "ann@x.io"))?;

    assert_eq!(state.session.user(), Some(&user));
    assert_eq!(state.accounts.get_current_user(), Some(user.clone()));
    assert!(user.avatar.as_deref().is_some_and(|url| url.contains("name=Ann")));
    let users: Vec<User> = state.db.read_table(keys::USERS);
    assert_eq!(users.len(), 1);
    Ok(())
}

#[test]
fn duplicate_email_is_rejected_and_session_kept() -> anyhow::Result<()> {
    let mut state = state();
    let ann = state.register(register_request("Ann", "ann@x.io"))?;

    let err = state.register(register_request("Other Ann", "ann@x.io"));

    assert!(matches!(err, Err(AppError::DuplicateEmail)));
    assert_eq!(state.session.user().map(|u| u.id), Some(ann.id));
    assert_eq!(state.db.read_table::<User>(keys::USERS).len(), 1);
    Ok(())
}

#[test]
fn login_matches_by_email_only() -> anyhow::Result<()> {
    let mut state = state();
    let ann = state.register(register_request("Ann", "ann@x.io"))?;
    state.logout();

    assert!(matches!(
        state.login(login("bob@x.io")),
        Err(AppError::UserNotFound)
    ));
    assert!(!state.session.is_authenticated());

    let user = state.login(login("ann@x.io"))?;
    assert_eq!(user.id, ann.id);
    assert!(state.session.is_authenticated());
    Ok(())
}

#[test]
fn logout_clears_pointer_and_keeps_cart() -> anyhow::Result<()> {
    let mut state = state();
    state.register(register_request("Ann", "ann@x.io"))?;
    state
        .cart
        .add(common::product("9", "Cable", "Accessories", 5_00), 2);

    state.logout();

    assert!(state.session.user().is_none());
    assert_eq!(state.accounts.get_current_user(), None);
    assert_eq!(state.cart.item_count(), 2);
    Ok(())
}

#[test]
fn session_is_restored_from_store() -> anyhow::Result<()> {
    let db = Db::in_memory();
    let mut first = state_with(db.clone());
    let ann = first.register(register_request("Ann", "ann@x.io"))?;

    let second = state_with(db.clone());
    assert_eq!(second.session.user().map(|u| u.id), Some(ann.id));

    first.logout();
    let third = state_with(db);
    assert!(!third.session.is_authenticated());
    Ok(())
}

#[test]
fn update_user_replaces_stored_record() -> anyhow::Result<()> {
    let mut state = state();
    let mut ann = state.register(register_request("Ann", "ann@x.io"))?;
    ann.phone = Some("555-0100".into());

    assert!(state.accounts.update_user(&mut state.session, ann.clone()));
    assert_eq!(state.session.user(), Some(&ann));
    let users: Vec<User> = state.db.read_table(keys::USERS);
    assert_eq!(users[0].phone.as_deref(), Some("555-0100"));

    let mut stranger = ann.clone();
    stranger.id = Uuid::new_v4();
    assert!(!state.accounts.update_user(&mut state.session, stranger));
    assert_eq!(state.session.user().map(|u| u.id), Some(ann.id));
    Ok(())
}

#[test]
fn average_rating_rounds_to_one_decimal() -> anyhow::Result<()> {
    let state = state();
    assert_eq!(
        state.accounts.get_product_average_rating("1"),
        RatingSummary {
            rating: 0.0,
            count: 0
        }
    );

    for rating in [5, 4, 4] {
        state.accounts.add_review(&review(Uuid::new_v4(), "1", rating))?;
    }
    state.accounts.add_review(&review(Uuid::new_v4(), "2", 1))?;

    assert_eq!(
        state.accounts.get_product_average_rating("1"),
        RatingSummary {
            rating: 4.3,
            count: 3
        }
    );
    assert_eq!(state.accounts.get_reviews(None).len(), 4);
    assert_eq!(state.accounts.get_reviews(Some("2")).len(), 1);
    Ok(())
}

#[test]
fn one_review_per_user_and_product() -> anyhow::Result<()> {
    let state = state();
    let user_id = Uuid::new_v4();
    state.accounts.add_review(&review(user_id, "1", 5))?;

    assert!(matches!(
        state.accounts.add_review(&review(user_id, "1", 3)),
        Err(AppError::DuplicateReview)
    ));
    assert!(!state.accounts.save_review(&review(user_id, "1", 2)));
    assert!(state.accounts.save_review(&review(user_id, "2", 2)));
    assert!(matches!(
        state.accounts.add_review(&review(user_id, "3", 6)),
        Err(AppError::InvalidRating)
    ));
    assert_eq!(state.accounts.get_user_reviews(user_id).len(), 2);
    Ok(())
}

#[test]
fn save_order_prepends_and_filters_by_owner() {
    let state = state();
    let ann = Uuid::new_v4();
    let first = order(ann);
    let second = order(ann);
    let other = order(Uuid::new_v4());

    assert!(state.accounts.save_order(&first));
    assert!(state.accounts.save_order(&other));
    assert!(state.accounts.save_order(&second));

    let ids: Vec<Uuid> = state.accounts.get_orders(ann).iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn order_status_updates_follow_lifecycle() {
    let state = state();
    let placed = order(Uuid::new_v4());
    state.accounts.save_order(&placed);
    let before: Vec<Order> = state.db.read_table(keys::ORDERS);

    assert!(!state
        .accounts
        .update_order_status(Uuid::new_v4(), OrderStatus::Shipped));
    assert!(!state
        .accounts
        .update_order_status(placed.id, OrderStatus::Delivered));
    assert_eq!(state.db.read_table::<Order>(keys::ORDERS), before);

    assert!(state
        .accounts
        .update_order_status(placed.id, OrderStatus::Processing));
    assert!(state
        .accounts
        .update_order_status(placed.id, OrderStatus::Shipped));
    assert!(state
        .accounts
        .update_order_status(placed.id, OrderStatus::Delivered));
    assert!(!state
        .accounts
        .update_order_status(placed.id, OrderStatus::Cancelled));

    let stored = state.accounts.find_order(placed.id).map(|o| o.status);
    assert_eq!(stored, Some(OrderStatus::Delivered));
}

#[test]
fn register_form_validation() {
    let form = |password: &str, confirm: &str| RegisterForm {
        name: "Ann".into(),
        email: "ann@x.io".into(),
        password: password.into(),
        confirm_password: confirm.into(),
        phone: Some(String::new()),
    };

    assert!(matches!(
        form("secret1", "secret2").validate(),
        Err(AppError::PasswordMismatch)
    ));
    assert!(matches!(
        form("abc", "abc").validate(),
        Err(AppError::WeakPassword)
    ));
    assert!(matches!(
        RegisterForm {
            name: "  ".into(),
            ..form("secret1", "secret1")
        }
        .validate(),
        Err(AppError::Validation(_))
    ));

    let request = form("secret1", "secret1").validate();
    assert!(matches!(request, Ok(ref r) if r.email == "ann@x.io" && r.phone.is_none()));
}

#[test]
fn results_fold_into_response_shape() -> anyhow::Result<()> {
    let mut state = state();
    let ok = ServiceResponse::from(state.register(register_request("Ann", "ann@x.io")));
    assert!(ok.success);
    assert!(ok.error.is_none());

    let failed = ServiceResponse::from(state.register(register_request("Ann", "ann@x.io")));
    let json = serde_json::to_value(&failed)?;
    assert_eq!(
        json,
        serde_json::json!({ "success": false, "error": "Email already exists" })
    );
    Ok(())
}
