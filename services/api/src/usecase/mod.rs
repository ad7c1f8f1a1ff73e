pub mod auth;
pub mod catalog;
pub mod product;
pub mod token;
pub mod wishlist;
