// src/models/mod.rs
pub mod product;
pub mod user;

pub use product::Product;
pub use user::{ContractRecord, GiftRecord, User, UserProfile};
