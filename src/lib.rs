//! Mosaic - Personalized Content Dashboard Gateway
//!
//! This crate implements the server side of a personalized content
//! dashboard: thin proxy routes over movie, news and image upstreams plus a
//! mocked social feed, fronted by a per-client fixed-window rate limiter
//! and a bounded retry policy for upstream calls.

pub mod config;
pub mod content;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod http;
pub mod ratelimit;
