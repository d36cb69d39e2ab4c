//! HTTP request handlers.

pub mod fallback;
pub mod redirect;
pub mod shorten;

pub use fallback::{method_not_allowed_handler, not_found_handler};
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
