pub mod auth;
pub mod bootstrap_admin;
pub mod draft;
pub mod reaction;
pub mod solution;
