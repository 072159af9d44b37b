pub mod auth;
pub mod feed;
pub mod recipe;
pub mod session;
pub mod user;
