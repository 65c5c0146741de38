//! Backend access.
//!
//! - `source`: the [`DataSource`] trait and response envelope decoding
//! - `http`: [`HttpSource`], the blocking HTTP implementation
//! - `messages`: request/response protocol with trace context propagation
//! - `loader`: one background thread per request, results over a channel

pub mod http;
pub mod loader;
pub mod messages;
pub mod source;

pub use http::HttpSource;
pub use loader::{handle_request, Loader};
pub use messages::{LoadRequest, LoadResponse, TraceContext};
pub use source::DataSource;
