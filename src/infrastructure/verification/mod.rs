//! Bot verification clients.

pub mod turnstile;

pub use turnstile::{TURNSTILE_VERIFY_URL, TurnstileVerifier};
