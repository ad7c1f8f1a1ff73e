
mod auth_test;
mod catalog_test;
mod e2e_test;
mod wishlist_test;
