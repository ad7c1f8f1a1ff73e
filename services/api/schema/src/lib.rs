//! sea-orm entities for the Shopfront API database.

pub mod categories;
pub mod products;
pub mod sub_categories;
pub mod users;
pub mod wishlist_items;
pub mod wishlists;
