//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Storage (LocalStorage on web, see `web::LocalStore`)
//! - The JS-facing container binding

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Current Unix time in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
