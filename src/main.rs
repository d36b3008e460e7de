use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_core::{
    config::AppConfig,
    dto::{cart::CartSnapshot, orders::OrderTotals, wishlist::WishlistSnapshot},
    models::{Order, Review, User},
    services::order_service::OrderService,
    state::AppState,
};

/// Everything the view layer would render on startup.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateReport {
    user: Option<User>,
    cart: CartSnapshot,
    cart_totals: OrderTotals,
    wishlist: WishlistSnapshot,
    categories: Vec<String>,
    product_count: usize,
    orders: Vec<Order>,
    reviews: Vec<Review>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(data_dir = ?config.data_dir, catalog = %config.catalog_path.display(), "loading storefront state");
    let state = AppState::from_config(config)?;

    let (orders, reviews) = match state.session.user() {
        Some(user) => (
            state.accounts.get_orders(user.id),
            state.accounts.get_user_reviews(user.id),
        ),
        None => (Vec::new(), Vec::new()),
    };

    let report = StateReport {
        user: state.session.user().cloned(),
        cart: state.cart.snapshot(),
        cart_totals: OrderService::preview_totals(&state.cart),
        wishlist: state.wishlist.snapshot(),
        categories: state.catalog.categories().to_vec(),
        product_count: state.catalog.products().len(),
        orders,
        reviews,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
