//! HTTP inbound adapter exposing the movie REST endpoints.

pub mod error;
pub mod movies;
pub mod request_context;
pub mod schemas;
pub mod state;

pub use error::ApiResult;
