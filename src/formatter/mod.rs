//! Code formatting for substituted snippets.
//!
//! Formatting is the only asynchronous step of the transform. A [`Formatter`]
//! returns a future per snippet; the transform collects those futures and
//! awaits them together once every code block has been visited.
//!
//! The default implementation is [`CommandFormatter`], which pipes the snippet
//! through prettier:
//!
//! ```toml
//! [formatter]
//! command = ["prettier"]
//!
//! [formatter.options]
//! printWidth = 100
//! semi = false
//! ```
//!
//! The language tag of the code block selects the prettier parser (see
//! [`dispatch`]).

pub mod command;
pub mod dispatch;

pub use command::CommandFormatter;
pub use dispatch::{DEFAULT_PROFILE, formatter_profile};

use crate::error::FormatterError;
use futures::future::BoxFuture;
use indexmap::IndexMap;

/// Options forwarded to the formatter as-is, keyed by option name.
pub type FormatterOptions = IndexMap<String, serde_json::Value>;

/// What to format a snippet as.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatRequest {
    /// Formatter profile, e.g. `typescript` or `babel`.
    pub profile: &'static str,
    pub options: FormatterOptions,
}

pub trait Formatter: Send + Sync {
    /// Start formatting `source`. No work needs to happen until the returned
    /// future is polled.
    fn format(&self, source: String, request: FormatRequest) -> BoxFuture<'static, Result<String, FormatterError>>;
}
