//! HTTP surface of the counter.
//!
//! | Path      | Content-Type      | Body                                   |
//! |-----------|-------------------|----------------------------------------|
//! | `/`       | `text/html`       | usage instructions                     |
//! | `/count`  | `image/svg+xml`   | 1×1 transparent pixel, counts the view |
//! | `/badge`  | `image/svg+xml`   | badge with the current count           |
//! | `/stats`  | `application/json`| `{"views": <integer>}`                 |

use std::net::SocketAddr;

use axum::extract::{Host, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CACHE_CONTROL, CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderValue, Method};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_template::RenderHtml;
use serde::Serialize;
use snafu::ResultExt;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::badge::{format_count, render_badge_with_color};
use crate::config::Config;
use crate::error::{
    ApplicationError, BindAddressSnafu, ConnectStoreSnafu, DataDirSnafu,
    InitializeCounterSnafu, WebServerSnafu,
};
use crate::store::{Store, SurrealStore};

pub use client::*;
pub use error::*;
pub use state::*;

mod client;
mod error;
mod state;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";
pub const SVG: &str = "image/svg+xml";
pub const BADGE_LABEL: &str = "Profile views";
pub const PIXEL: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#;

pub fn create_router<S: Store>(app: App<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([CONTENT_TYPE]);

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(NO_CACHE),
        ))
        .layer(cors);

    Router::new()
        .route("/", get(home::<S>))
        .route("/count", get(count::<S>))
        .route("/badge", get(badge::<S>))
        .route("/stats", get(stats::<S>))
        .layer(middleware)
        .with_state(app)
}

fn svg(body: String) -> impl IntoResponse {
    ([(CONTENT_TYPE, SVG), (CACHE_CONTROL, NO_CACHE)], body)
}

#[instrument(skip_all)]
async fn count<S: Store>(
    State(app): State<App<S>>, ClientIdentity(identity): ClientIdentity,
) -> Result<impl IntoResponse> {
    app.register_view(&identity).await?;
    Ok(svg(PIXEL.to_owned()))
}

#[instrument(skip_all)]
async fn badge<S: Store>(State(app): State<App<S>>) -> Result<impl IntoResponse> {
    let views = app.count().await?;
    let body = render_badge_with_color(BADGE_LABEL, &format_count(views), &app.badge_color);
    Ok(svg(body))
}

#[derive(Debug, Serialize)]
pub struct Stats {
    pub views: u64,
}

async fn stats<S: Store>(State(app): State<App<S>>) -> Result<Json<Stats>> {
    let views = app.count().await?;
    Ok(Json(Stats { views }))
}

#[derive(Debug, Serialize)]
struct HomePage {
    base_url: String,
    cooldown_minutes: i64,
}

async fn home<S: Store>(
    State(app): State<App<S>>, Host(host): Host, headers: HeaderMap,
) -> impl IntoResponse {
    let page = HomePage {
        base_url: base_url(request_scheme(&headers), &host),
        cooldown_minutes: app.cooldown().num_minutes(),
    };

    RenderHtml(INDEX_TEMPLATE, app.templates.clone(), page)
}

/// `<scheme>://<host>`, HTML-escaped except for the slashes so the page shows
/// the literal URL. The template marks it `safe`.
fn base_url(scheme: &str, host: &str) -> String {
    let url = format!("{scheme}://{host}");
    tera::escape_html(&url).replace("&#x2F;", "/")
}

/// Opens the store, makes sure the counter exists and serves until Ctrl-C.
pub async fn serve(config: Config) -> Result<(), ApplicationError> {
    if config.uses_data_dir() {
        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .context(DataDirSnafu {
                path: config.data_dir.clone(),
            })?;
    }

    let store = SurrealStore::connect(&config.store_endpoint())
        .await
        .context(ConnectStoreSnafu)?;

    let app = create_app(store, &config)?;
    let views = app.init().await.context(InitializeCounterSnafu)?;
    tracing::info!(views, "view counter is ready");

    let address = config.address();
    let listener = TcpListener::bind(address)
        .await
        .context(BindAddressSnafu { address })?;
    tracing::info!(%address, "server running on port {}", config.port);

    let router = create_router(app);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context(WebServerSnafu)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received Ctrl-C, shutting down"),
        Err(err) => {
            tracing::error!(error = %err, "could not listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await
        }
    }
}
