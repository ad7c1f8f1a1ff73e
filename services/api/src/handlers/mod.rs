pub mod auth;
pub mod catalog;
pub mod index;
pub mod product;
pub mod view;
pub mod wishlist;
