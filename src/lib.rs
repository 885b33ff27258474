//! # MentorHub
//!
//! Backend for a startup mentorship marketplace: founders browse mentors,
//! book sessions and submit startup ideas for LLM analysis; mentors apply
//! and are verified through a single-use emailed link.
//!
//! ## Usage
//!
//! ```bash
//! mentorhub serve [--port 5000] [--ephemeral]
//! mentorhub weekly-report [--output report.json] [--send]
//! ```
//!
//! ## Modules
//!
//! - `api` - axum routes, header identity and error responses
//! - `services` - marketplace operations over the shared `AppState`
//! - `models` - Mentor, Booking, User and IdeaAnalysis records
//! - `storage` - one collection per entity behind `UnifiedStorage`, file or memory backed
//! - `mail` - tera email templates and mail transports
//! - `analysis` - idea analysis through an LLM messages endpoint
//! - `config` - TOML configuration with `MENTORHUB_*` overrides
//! - `error` - `MarketplaceError` and its numeric code registry
pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod mail;
pub mod models;
pub mod services;
pub mod storage;
