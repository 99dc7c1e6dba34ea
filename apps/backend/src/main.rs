use actix_web::{web, App, HttpServer};
use luckydraw::config::db::{db_kind_from_env, RuntimeEnv};
use luckydraw::config::draw::DrawConfig;
use luckydraw::infra::state::build_state;
use luckydraw::middleware::cors::cors_middleware;
use luckydraw::middleware::request_trace::RequestTrace;
use luckydraw::middleware::structured_logger::StructuredLogger;
use luckydraw::middleware::trace_span::TraceSpan;
use luckydraw::routes;
use tracing::info;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let host = std::env::var("LUCKYDRAW_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ PORT must be a valid port number");
            std::process::exit(1);
        });

    let draw_config = DrawConfig::from_env().unwrap_or_else(|e| {
        eprintln!("❌ Invalid draw configuration: {e}");
        std::process::exit(1);
    });
    let db_kind = db_kind_from_env().unwrap_or_else(|e| {
        eprintln!("❌ Invalid LUCKYDRAW_DB_KIND: {e}");
        std::process::exit(1);
    });
    let scheme = draw_config.scheme;

    let app_state = match build_state()
        .with_env(RuntimeEnv::Prod)
        .with_db(db_kind)
        .with_draw_config(draw_config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!(host = %host, port, db_kind = ?db_kind, scheme = ?scheme, "server starting");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(|cfg| routes::configure(cfg, scheme))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
