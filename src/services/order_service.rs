use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CheckoutRequest, OrderTotals, PaymentInfo, PaymentMethod},
    error::{AppError, AppResult},
    models::{Order, OrderItem, OrderStatus, User},
    services::{account_service::AccountService, cart_service::CartLedger},
    session::Session,
};

/// Subtotals strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: i64 = 99_00;
pub const SHIPPING_FEE: i64 = 9_99;
pub const TAX_RATE_PERCENT: i64 = 8;
pub const DELIVERY_ESTIMATE_DAYS: i64 = 5;
pub const DEFAULT_COUNTRY: &str = "United States";
pub const CASH_ON_DELIVERY_LABEL: &str = "Cash on Delivery";

/// Shipping, tax and grand total for a cart subtotal. Tax rounds half up to the cent.
pub fn calculate_totals(subtotal: i64) -> OrderTotals {
    let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
        0
    } else {
        SHIPPING_FEE
    };
    let tax = (subtotal * TAX_RATE_PERCENT + 50).div_euclid(100);

    OrderTotals {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
    }
}

/// Payment label stored on the order; never the full card number.
pub fn mask_payment(method: PaymentMethod, info: &PaymentInfo) -> String {
    match method {
        PaymentMethod::Card => {
            let skip = info.card_number.chars().count().saturating_sub(4);
            let last_four: String = info.card_number.chars().skip(skip).collect();
            format!("**** **** **** {last_four}")
        }
        PaymentMethod::CashOnDelivery => CASH_ON_DELIVERY_LABEL.to_string(),
    }
}

fn build_tracking_number() -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(9)
        .collect();
    format!("TRK{}", suffix.to_uppercase())
}

fn build_order(
    user: &User,
    cart: &CartLedger,
    payload: CheckoutRequest,
    now: DateTime<Utc>,
) -> Order {
    let CheckoutRequest {
        mut shipping_address,
        payment_method,
        payment_info,
    } = payload;
    if shipping_address.country.is_empty() {
        shipping_address.country = DEFAULT_COUNTRY.to_string();
    }

    let items = cart
        .items()
        .iter()
        .map(|item| OrderItem {
            product_id: item.product.id.clone(),
            product_name: item.product.name.clone(),
            product_image: item.product.image.clone(),
            quantity: item.quantity,
            price: item.product.price,
        })
        .collect();

    Order {
        id: Uuid::new_v4(),
        user_id: user.id,
        items,
        total: calculate_totals(cart.total()).total,
        status: OrderStatus::Pending,
        order_date: now,
        estimated_delivery: Some(now + chrono::Duration::days(DELIVERY_ESTIMATE_DAYS)),
        shipping_address,
        payment_method: mask_payment(payment_method, &payment_info),
        tracking_number: Some(build_tracking_number()),
    }
}

/// Checkout and the customer-facing order status actions.
#[derive(Debug, Clone)]
pub struct OrderService {
    accounts: AccountService,
    checkout_delay: Duration,
}

impl OrderService {
    pub fn new(accounts: AccountService, checkout_delay: Duration) -> Self {
        Self {
            accounts,
            checkout_delay,
        }
    }

    pub fn preview_totals(cart: &CartLedger) -> OrderTotals {
        calculate_totals(cart.total())
    }

    /// Validates the checkout, waits out the simulated payment, persists the
    /// order and then clears the cart. Any rejection leaves every store untouched.
    pub async fn place_order(
        &self,
        session: &Session,
        cart: &mut CartLedger,
        payload: CheckoutRequest,
    ) -> AppResult<Order> {
        let user = session.require_user()?;
        if cart.is_empty() {
            return Err(AppError::EmptyCart);
        }
        if !payload.shipping_address.is_complete() {
            return Err(AppError::IncompleteAddress);
        }
        if payload.payment_method == PaymentMethod::Card && !payload.payment_info.is_complete() {
            return Err(AppError::IncompletePayment);
        }

        tokio::time::sleep(self.checkout_delay).await;

        let order = build_order(user, cart, payload, Utc::now());
        if !self.accounts.save_order(&order) {
            return Err(AppError::OrderFailed);
        }
        cart.clear();

        tracing::info!(order_id = %order.id, user_id = %user.id, total = order.total, "order placed");
        log_audit(
            Some(user.id),
            "checkout",
            Some("orders"),
            Some(serde_json::json!({ "order_id": order.id, "total": order.total })),
        );

        Ok(order)
    }

    /// Orders of the signed-in user, newest first.
    pub fn my_orders(&self, session: &Session) -> AppResult<Vec<Order>> {
        let user = session.require_user()?;
        Ok(self.accounts.get_orders(user.id))
    }

    /// Cancels one of the session user's orders while it is still pending.
    pub fn cancel_order(&self, session: &Session, order_id: Uuid) -> AppResult<Order> {
        self.transition(session, order_id, OrderStatus::Pending, OrderStatus::Cancelled)
    }

    /// Confirms delivery of one of the session user's shipped orders.
    pub fn mark_delivered(&self, session: &Session, order_id: Uuid) -> AppResult<Order> {
        self.transition(session, order_id, OrderStatus::Shipped, OrderStatus::Delivered)
    }

    fn transition(
        &self,
        session: &Session,
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> AppResult<Order> {
        let user = session.require_user()?;
        let order = self
            .accounts
            .find_order(order_id)
            .filter(|order| order.user_id == user.id)
            .ok_or(AppError::NotFound)?;

        if order.status != from {
            return Err(AppError::InvalidStatusTransition {
                from: order.status,
                to,
            });
        }

        self.accounts.set_order_status(order_id, to)
    }
}
