#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashSet},
    io,
    sync::{Arc, Mutex, PoisonError},
};

use storefront_core::{
    config::AppConfig,
    db::{Db, MemoryStorage, Storage},
    dto::{
        auth::RegisterRequest,
        orders::{CheckoutRequest, PaymentInfo, PaymentMethod},
    },
    models::{Address, Product},
    state::AppState,
};

pub fn product(id: &str, name: &str, category: &str, price: i64) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        brand: "Acme".into(),
        price,
        original_price: None,
        image: format!("https://img.example.com/{id}.png"),
        images: Vec::new(),
        category: category.into(),
        description: String::new(),
        specifications: BTreeMap::new(),
        in_stock: true,
        stock_count: 10,
        rating: 0.0,
        review_count: 0,
        is_new: false,
        is_featured: false,
        discount: None,
    }
}

pub fn catalog() -> Vec<Product> {
    let mut phone = product("1", "Pixel Phone", "Phones", 799_00);
    phone.brand = "Google".into();
    phone.rating = 4.5;
    phone.review_count = 120;
    phone.is_new = true;

    let mut laptop = product("2", "Air Laptop", "Laptops", 1299_00);
    laptop.brand = "Apple".into();
    laptop.description = "Thin and light notebook".into();
    laptop.rating = 4.9;
    laptop.review_count = 80;

    let mut budget_phone = product("3", "Budget Phone", "Phones", 199_00);
    budget_phone.brand = "Nokia".into();
    budget_phone.rating = 3.9;
    budget_phone.review_count = 300;

    let mut earbuds = product("4", "Buds", "Audio", 99_00);
    earbuds.brand = "Sony".into();
    earbuds.description = "Wireless earbuds with phone controls".into();
    earbuds.rating = 4.5;
    earbuds.review_count = 45;
    earbuds.is_new = true;

    vec![phone, laptop, budget_phone, earbuds]
}

pub fn state() -> AppState {
    state_with(Db::in_memory())
}

pub fn state_with(db: Db) -> AppState {
    AppState::new(AppConfig::in_memory(), db, catalog())
}

pub fn register_request(name: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        name: name.into(),
        email: email.into(),
        password: "secret1".into(),
        phone: None,
    }
}

pub fn address() -> Address {
    Address {
        street: "1 Main St".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        zip: "62701".into(),
        country: String::new(),
    }
}

pub fn card_checkout() -> CheckoutRequest {
    CheckoutRequest {
        shipping_address: address(),
        payment_method: PaymentMethod::Card,
        payment_info: PaymentInfo {
            card_number: "4111111111119876".into(),
            expiry_date: "12/30".into(),
            cvv: "123".into(),
            name_on_card: "Ann".into(),
        },
    }
}

/// In-memory storage whose writes to selected keys fail, for exercising the
/// persistence fault paths.
#[derive(Debug, Default)]
pub struct FaultyStorage {
    inner: MemoryStorage,
    broken: Mutex<HashSet<String>>,
}

impl FaultyStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn break_key(&self, key: &str) {
        self.broken
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string());
    }

    fn check(&self, key: &str) -> io::Result<()> {
        let broken = self.broken.lock().unwrap_or_else(PoisonError::into_inner);
        if broken.contains(key) {
            return Err(io::Error::other(format!("write to {key} rejected")));
        }
        Ok(())
    }
}

impl Storage for FaultyStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        self.check(key)?;
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        self.check(key)?;
        self.inner.remove_item(key)
    }
}
