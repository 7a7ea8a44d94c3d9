//! # Chat Backend
//!
//! Everything that talks to the support backend: the request/record wire
//! types, the incremental stream decoder, and the HTTP implementation of
//! [`ChatBackend`].

pub mod backend;
pub mod http;
pub mod stream;
pub mod types;

pub use backend::{ChatBackend, ChatError};
pub use http::HttpBackend;
pub use stream::{RecordDecoder, parse_line};
pub use types::{ChatRequest, StreamRecord};
