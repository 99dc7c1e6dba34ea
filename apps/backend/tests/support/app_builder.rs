use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use luckydraw::config::draw::DrawScheme;
use luckydraw::middleware::request_trace::RequestTrace;
use luckydraw::middleware::structured_logger::StructuredLogger;
use luckydraw::middleware::trace_span::TraceSpan;
use luckydraw::routes;
use luckydraw::state::app_state::AppState;

/// Test service with the production middleware stack (minus CORS) and routes.
/// The `/api/draw` handler follows `state.draw_config.scheme`.
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    let scheme: DrawScheme = state.draw_config.scheme;
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(move |cfg| routes::configure(cfg, scheme)),
    )
    .await
}
