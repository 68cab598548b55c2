//! Request and Response models for the feed service
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::FeedRequest;
pub use responses::{
    DetachResponse, ErrorResponse, FeedResponse, HealthResponse, LoadStateView, StatsResponse,
};
