//! Newsdesk - a small news publishing system
//!
//! Library half of the server: configuration, storage, business services,
//! the HTTP API and the server-rendered reading site.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod theme;
