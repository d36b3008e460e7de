//! State and persistence layer of a client-side storefront: cart, wishlist,
//! catalog filtering, accounts, orders and reviews over a key-value document store.

pub mod audit;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod models;
pub mod response;
pub mod services;
pub mod session;
pub mod state;
