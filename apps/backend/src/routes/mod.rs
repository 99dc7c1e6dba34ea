use actix_web::web;

use crate::config::draw::DrawScheme;

pub mod draw;
pub mod health;

/// Register every route. `scheme` picks the handler behind `POST /api/draw`.
///
/// `main.rs` and the integration tests share this so both exercise the same
/// paths.
pub fn configure(cfg: &mut web::ServiceConfig, scheme: DrawScheme) {
    cfg.configure(health::configure_routes);
    cfg.route("/draw", web::post().to(draw::pool_draw));

    match scheme {
        DrawScheme::Rounds => cfg.route("/api/draw", web::post().to(draw::round_draw)),
        DrawScheme::Pool => cfg.route("/api/draw", web::post().to(draw::pool_draw_display)),
    };
}
