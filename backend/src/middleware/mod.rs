//! Request middleware.
//!
//! The pipeline, outermost first:
//!
//! 1. [`RequestLog`]: trace identifier, request and response logging.
//! 2. [`Cors`]: origin allow-list and preflight answers.
//! 3. [`ContentTypeGuard`]: JSON bodies for `POST` and `PUT`.
//! 4. [`PanicRecovery`]: converts handler panics into 500 responses.
//!
//! Actix applies `wrap` calls inside out, so an `App` registers them in the
//! reverse order. See [`crate::inbound::http::app::build_app`].

pub mod content_type;
pub mod cors;
pub mod panic_recovery;
pub mod request_log;

pub use content_type::ContentTypeGuard;
pub use cors::Cors;
pub use panic_recovery::PanicRecovery;
pub use request_log::RequestLog;
