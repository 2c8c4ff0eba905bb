//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod routes;
pub mod schemas;
pub mod state;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// Largest accepted JSON request body, in bytes.
pub const JSON_BODY_LIMIT: usize = 64 * 1024;

/// JSON extractor settings rendering body failures as `invalid_request`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_registry::inbound::http::json_config;
///
/// let app = App::new().app_data(json_config());
/// ```
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(error::json_error_handler)
}
