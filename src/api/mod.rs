//! API Module
//!
//! HTTP handlers and routing for the feed service.
//!
//! # Endpoints
//! - `PUT /feed` - Bind the feed to a query
//! - `GET /feed` - Current snapshot
//! - `DELETE /feed` - Detach the feed
//! - `POST /feed/load/:edge` - Load the next page at `front` or `back`
//! - `POST /feed/retry/:edge` - Retry a failed edge
//! - `POST /feed/access/:index` - Report the scroll position
//! - `POST /feed/refresh` - Reload around the last accessed position
//! - `GET /stats` - Paging statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
