pub mod category;
pub mod feed;
pub mod health;
pub mod recipe;
pub mod user;
