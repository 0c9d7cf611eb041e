//! Trolley JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use trolley_app::context::AppContext;

use crate::{
    config::ServerConfig,
    observability::{Observability, metrics_handler, request_logging},
    state::State,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod carts;
mod config;
mod extensions;
mod healthcheck;
mod observability;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

fn cart_routes() -> Router {
    Router::with_path("carts")
        .post(carts::handlers::create::handler)
        .push(
            Router::with_path("{cart}")
                .get(carts::handlers::get::handler)
                .push(
                    Router::with_path("items")
                        .get(carts::items::handlers::index::handler)
                        .post(carts::items::handlers::create::handler)
                        .delete(carts::items::handlers::clear::handler)
                        .push(
                            Router::with_path("{product}")
                                .patch(carts::items::handlers::update::handler)
                                .delete(carts::items::handlers::delete::handler),
                        ),
                ),
        )
}

/// Trolley JSON API Server entry point
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    let observability = Observability::init(&config).unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("Observability error: {e}");
        }

        process::exit(1);
    });

    let addr = config.socket_addr();

    info!(
        database_url = %config.database.redacted_url(),
        run_migrations = config.database.run_migrations,
        "connecting to cart database"
    );

    let settings = match config.database.settings() {
        Ok(settings) => settings,
        Err(settings_error) => {
            error!("invalid database configuration: {settings_error}");

            observability.shutdown();
            process::exit(1);
        }
    };

    let app = match AppContext::connect(&settings, config.database.run_migrations).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            observability.shutdown();
            process::exit(1);
        }
    };

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(
            &app,
            config.observability.request_log_settings(),
        )))
        .hoop(request_logging)
        .push(Router::with_path("healthz").get(healthcheck::live))
        .push(Router::with_path("readyz").get(healthcheck::ready))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(cart_routes());

    let doc = OpenApi::new("Trolley API", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;
    let server = Server::new(listener);
    let handle = server.handle();
    let grace = config.server.shutdown_grace();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, grace).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;

    info!("server stopped, closing database pool");

    app.db.close().await;
    observability.shutdown();
}
