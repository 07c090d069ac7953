//! linkvault: a personal bookmark service.
//!
//! Owners store, search, update and delete URL bookmarks. New bookmarks are
//! enriched with page metadata fetched from the target URL.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod api;
pub mod app;
pub mod database;
pub mod managers;
pub mod services;
pub mod types;
