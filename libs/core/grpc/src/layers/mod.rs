//! Server-side tower middleware for tonic.
//!
//! Applied in order at server construction; the tags layer must wrap the
//! logging layer so every logged call carries its tags:
//!
//! ```ignore
//! Server::builder()
//!     .layer(TagsLayer)
//!     .layer(LoggingLayer)
//!     .add_service(service)
//! ```
//!
//! Both layers see every call, unary and streaming alike, because they sit
//! below the generated service routing at the HTTP level.

mod level;
mod logging;
mod tags;

pub use level::{level_for, status_code};
pub use logging::{LoggedBody, Logging, LoggingLayer};
pub use tags::{CallTags, REQUEST_ID_HEADER, Tags, TagsLayer};
