//! Pagination primitives shared by the blog backend.
//!
//! Two concerns live here:
//!
//! - [`PageRequest`] and [`PageWindow`] describe client-facing page/limit
//!   pagination and the slice of an ordered sequence that a page covers.
//! - [`Cursor`] is an opaque continuation token. Store adapters use it to
//!   carry their native resume point between scan calls without leaking its
//!   shape to callers.

mod cursor;
mod page;

pub use cursor::{Cursor, CursorError};
pub use page::{PageRequest, PageRequestError, PageWindow};
