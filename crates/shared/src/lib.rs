//! Shared utilities and common types for the Meal Share backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Identity token verification (RS256 JWTs from the campus identity provider)
//! - Cursor-based pagination for message transcripts
//! - Common validation logic for marketplace fields

pub mod auth;
pub mod pagination;
pub mod validation;
