//! Process exit statuses of the `snipmd` binary.
//!
//! A docs build calls snipmd before the site generator, so the status tells
//! the build whether to stop: 1 means an author has to fix a document, 2
//! means snipmd itself could not run.

/// All documents were written (or already up to date).
pub const SUCCESS: i32 = 0;

/// At least one document references a snippet that could not be substituted.
pub const TRANSFORM_FAILED: i32 = 1;

/// Bad configuration, unreadable or unwritable files, or a discovery failure.
pub const TOOL_ERROR: i32 = 2;

pub mod exit {
    use super::{SUCCESS, TOOL_ERROR, TRANSFORM_FAILED};

    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    pub fn transform_failed() -> ! {
        std::process::exit(TRANSFORM_FAILED);
    }

    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
