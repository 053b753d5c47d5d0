//! HTTP handlers, one module per resource. Every handler answers with the
//! [`ApiResponse`](crate::response::ApiResponse) envelope.

pub mod articles;
pub mod categories;
pub mod comments;
pub mod upload;
pub mod users;

pub use articles::*;
pub use categories::*;
pub use comments::*;
pub use upload::*;
pub use users::*;
