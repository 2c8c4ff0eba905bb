//! Builders for HTTP state from the configured repository.

use std::sync::Arc;

use actix_web::web;

use user_registry::domain::UserService;
use user_registry::domain::ports::UserRepository;
use user_registry::inbound::http::state::HttpState;

/// Wrap `repository` in the user service and expose it through both ports.
pub(super) fn build_http_state(repository: Arc<dyn UserRepository>) -> web::Data<HttpState> {
    let service: UserService<dyn UserRepository> = UserService::new(repository);
    web::Data::new(HttpState::new(
        Arc::new(service.clone()),
        Arc::new(service),
    ))
}
