//! Blogging REST API: bearer-token sessions and post CRUD with categories.

pub mod app;
pub mod auth;
pub mod categories;
pub mod config;
pub mod db;
pub mod error;
pub mod posts;
pub mod state;
pub mod validation;
