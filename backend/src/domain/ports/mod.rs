//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod movie_repository;
mod movies_command;
mod movies_query;

#[cfg(test)]
pub use movie_repository::MockMovieRepository;
pub use movie_repository::{MovieRepository, MovieRepositoryError, MovieRow};
#[cfg(test)]
pub use movies_command::MockMoviesCommand;
pub use movies_command::MoviesCommand;
#[cfg(test)]
pub use movies_query::MockMoviesQuery;
pub use movies_query::MoviesQuery;
