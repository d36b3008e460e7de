use std::{collections::BTreeMap, fs, path::Path};

use storefront_core::{
    config::AppConfig,
    dto::auth::{LoginRequest, RegisterRequest},
    error::AppError,
    models::{Product, User},
    response::ServiceResponse,
    state::AppState,
};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    seed_catalog(&config.catalog_path)?;

    let mut state = AppState::from_config(config)?;
    let user = ensure_user(&mut state, "Demo Shopper", "user@example.com")?;
    state.logout();

    println!(
        "Seed completed. {} products, user ID: {}",
        state.catalog.products().len(),
        user.id
    );
    Ok(())
}

fn ensure_user(state: &mut AppState, name: &str, email: &str) -> anyhow::Result<User> {
    let registered = state.register(RegisterRequest {
        name: name.into(),
        email: email.into(),
        password: "user123".into(),
        phone: None,
    });

    let result = match registered {
        Err(AppError::DuplicateEmail) => state.login(LoginRequest {
            email: email.into(),
            password: "user123".into(),
        }),
        other => other,
    };

    let response = ServiceResponse::from(result);
    println!("{}", serde_json::to_string(&response)?);
    response
        .data
        .ok_or_else(|| anyhow::anyhow!("could not ensure user {email}"))
}

fn seed_catalog(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        println!("Catalog already present at {}", path.display());
        return Ok(());
    }

    let products = vec![
        product("1", "Ferris Phone", "Crustacean", 1199_00, "Phones", 4.8, 342, true),
        product("2", "Borrow Book 16", "Crustacean", 2499_00, "Laptops", 4.9, 156, true),
        product("3", "Async Buds", "Tokio Audio", 249_00, "Audio", 4.6, 512, false),
        product("4", "Lifetime Watch", "Oxide", 399_00, "Wearables", 4.4, 98, false),
    ];

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(&products)?)?;

    println!("Seeded catalog at {}", path.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    brand: &str,
    price: i64,
    category: &str,
    rating: f64,
    review_count: u32,
    is_new: bool,
) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        brand: brand.into(),
        price,
        original_price: None,
        image: String::new(),
        images: Vec::new(),
        category: category.into(),
        description: format!("{name} by {brand}"),
        specifications: BTreeMap::new(),
        in_stock: true,
        stock_count: 25,
        rating,
        review_count,
        is_new,
        is_featured: is_new,
        discount: None,
    }
}
