use crate::{
    config::AppConfig,
    db::{self, Db},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        orders::CheckoutRequest,
        reviews::ReviewRequest,
    },
    error::{AppError, AppResult},
    models::{Order, Product, Review, User},
    services::{
        account_service::AccountService,
        cart_service::CartLedger,
        order_service::OrderService,
        product_service::{self, Catalog},
        review_service::ReviewService,
        wishlist_service::Wishlist,
    },
    session::Session,
};

/// Application context handed to the view layer.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: Db,
    pub session: Session,
    pub accounts: AccountService,
    pub orders: OrderService,
    pub reviews: ReviewService,
    pub cart: CartLedger,
    pub wishlist: Wishlist,
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(config: AppConfig, db: Db, products: Vec<Product>) -> Self {
        let accounts = AccountService::new(db.clone());
        Self {
            session: Session::restore(&db),
            orders: OrderService::new(accounts.clone(), config.checkout_delay),
            reviews: ReviewService::new(accounts.clone()),
            cart: CartLedger::load(db.clone()),
            wishlist: Wishlist::load(db.clone()),
            catalog: Catalog::new(products),
            accounts,
            config,
            db,
        }
    }

    /// Opens the configured store and catalog. A missing catalog file yields an empty catalog.
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let db = db::create_store(&config)?;
        let products = match product_service::load_catalog(&config.catalog_path) {
            Ok(products) => products,
            Err(AppError::Storage(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %config.catalog_path.display(), "catalog file not found");
                Vec::new()
            }
            Err(err) => return Err(err),
        };
        Ok(Self::new(config, db, products))
    }

    pub fn register(&mut self, payload: RegisterRequest) -> AppResult<User> {
        self.accounts.register(&mut self.session, payload)
    }

    pub fn login(&mut self, payload: LoginRequest) -> AppResult<User> {
        self.accounts.login(&mut self.session, payload)
    }

    pub fn logout(&mut self) {
        self.accounts.logout(&mut self.session);
    }

    pub async fn place_order(&mut self, payload: CheckoutRequest) -> AppResult<Order> {
        self.orders
            .place_order(&self.session, &mut self.cart, payload)
            .await
    }

    pub fn submit_review(&mut self, payload: ReviewRequest) -> AppResult<Review> {
        self.reviews
            .submit_review(&self.session, &mut self.catalog, payload)
    }
}
