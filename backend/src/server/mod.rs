//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_web::dev::Server;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use ticketing_backend::doc::ApiDoc;
use ticketing_backend::inbound::http::configure;
use ticketing_backend::inbound::http::health::{HealthState, live, ready};
use ticketing_backend::middleware::Trace;

use state_builders::build_http_state;

/// Bind the listener and build the server. Readiness flips once bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config.db_pool, config.tokens);
    let server_health_state = health_state.clone();
    #[cfg(feature = "metrics")]
    let prometheus = make_metrics()?;

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(http_state.clone())
            .wrap(Trace)
            .configure(configure)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("ticketing")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))
}
