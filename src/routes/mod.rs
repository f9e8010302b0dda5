// Route exports
pub mod error;
pub mod golf;

use actix_web::web;

pub use error::{handle_json_payload_error, handle_query_payload_error, ApiError};
pub use golf::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(golf::configure),
    );
}
