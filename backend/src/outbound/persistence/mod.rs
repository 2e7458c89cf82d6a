//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and port
//! types. Connections come from a `bb8` pool managed through `diesel-async`.
//!
//! ```ignore
//! use movies::outbound::persistence::{DbPool, DieselMovieRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/movies")).await?;
//! let repo = DieselMovieRepository::new(pool);
//! ```

mod diesel_movie_repository;
mod models;
mod pool;
mod schema;

pub use diesel_movie_repository::DieselMovieRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
