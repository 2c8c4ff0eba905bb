//! Route table for the users API.
//!
//! The collection answers on both `/api/users` and `/api/users/`.

use actix_web::web;

use crate::inbound::http::users::{create_user, delete_user, get_user, list_users, update_user};

/// Mount point of the users resource.
pub const USERS_SCOPE: &str = "/api/users";

/// Register the users routes.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_registry::inbound::http::routes::configure_users;
///
/// let app = App::new().configure(configure_users);
/// ```
pub fn configure_users(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(USERS_SCOPE)
            .service(
                web::resource(["", "/"])
                    .route(web::get().to(list_users))
                    .route(web::post().to(create_user)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_user))
                    .route(web::put().to(update_user))
                    .route(web::delete().to(delete_user)),
            ),
    );
}
