//! Request middleware.
//!
//! The pipeline, from outermost to innermost, is [`Recovery`], [`Trace`],
//! [`ResponseLog`] and [`SecureHeaders`]. Actix applies `wrap` calls in
//! reverse, so register them innermost first:
//!
//! ```
//! use actix_web::App;
//! use movies::middleware::{Recovery, ResponseLog, SecureHeaders, Trace};
//!
//! let _app = App::new()
//!     .wrap(SecureHeaders::hardened())
//!     .wrap(ResponseLog)
//!     .wrap(Trace::new(tracing::Span::none()))
//!     .wrap(Recovery);
//! ```

pub mod recovery;
pub mod response_log;
pub mod secure_headers;
pub mod trace;

pub use recovery::Recovery;
pub use response_log::ResponseLog;
pub use secure_headers::{HeaderPolicy, InvalidOrigin, SecureHeaders};
pub use trace::Trace;
