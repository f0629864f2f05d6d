//! Browser plumbing: process lifecycle, DOM access, bounded waits.

pub mod dom;
pub mod launch;
pub mod wait;

pub use dom::Dom;
pub use launch::BrowserHandle;
pub use wait::{wait_until, wait_until_gone};
