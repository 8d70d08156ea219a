//! Slipstone Core - Shared types library.
//!
//! This crate provides common types used across all Slipstone components:
//! - `api` - Storefront and operations-console HTTP server
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails, plus the
//!   order-lifecycle, tracking, workshop, and OTP enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
