// File: services/slotbook_backend/src/main.rs
use axum::{routing::get, Router};
use slotbook_booking::{routes as booking_routes, BookingState};
use slotbook_common::init_from_config;
use slotbook_config::load_config;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod service_factory;

use service_factory::SlotbookServiceFactory;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = Arc::new(load_config()?);
    // Dropping the guard would stop the file writer.
    let _log_guard = init_from_config(&config.logging);
    info!(
        "Starting Slotbook (calendar: {}, payments: {})",
        config.use_gcal, config.use_stripe
    );

    let factory = SlotbookServiceFactory::new(config.clone()).await;
    let state = Arc::new(BookingState::from_factory(config.clone(), &factory)?);

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to Slotbook API!" }))
        .merge(booking_routes::routes(state));

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        use slotbook_booking::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Slotbook API",
                version = "0.1.0",
                description = "Slot booking with calendar holds and hosted checkout",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");
        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
