//! HTTP API server for the ordering backend.
//!
//! Provides REST endpoints for carts, checkout, orders, the menu catalog and
//! user accounts, with structured logging (tracing) and Prometheus
//! metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::{CartService, CatalogService, CheckoutService, UserService, Validator};
use metrics_exporter_prometheus::PrometheusHandle;
use store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store> {
    pub carts: CartService<S>,
    pub checkout: CheckoutService<S>,
    pub catalog: CatalogService<S>,
    pub users: UserService<S>,
    pub validator: Validator,
    pub max_page_size: usize,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::system::health))
        .route(
            "/users",
            get(routes::users::list::<S>).post(routes::users::register::<S>),
        )
        .route(
            "/users/me",
            get(routes::users::profile::<S>).put(routes::users::update::<S>),
        )
        .route("/users/email/{email}", get(routes::users::by_email::<S>))
        .route(
            "/users/{id}",
            get(routes::users::get::<S>).delete(routes::users::delete::<S>),
        )
        .route(
            "/menus",
            get(routes::menus::list::<S>).post(routes::menus::create::<S>),
        )
        .route(
            "/menus/{id}",
            get(routes::menus::get::<S>)
                .patch(routes::menus::patch::<S>)
                .delete(routes::menus::delete::<S>),
        )
        .route(
            "/carts",
            get(routes::carts::list_all::<S>).post(routes::carts::create::<S>),
        )
        .route("/carts/mine", get(routes::carts::mine::<S>))
        .route(
            "/carts/{id}",
            get(routes::carts::get::<S>).put(routes::carts::update_line::<S>),
        )
        .route("/carts/{id}/checkout", post(routes::carts::checkout::<S>))
        .route("/orders", get(routes::orders::mine::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Registers descriptions for the counters emitted by the cart engine.
pub fn describe_metrics() {
    metrics::describe_counter!("carts_created_total", "Carts opened successfully");
    metrics::describe_counter!("cart_updates_total", "Cart line adjustments committed");
    metrics::describe_counter!("checkouts_total", "Carts frozen into orders");
    metrics::describe_counter!(
        "stock_reservations_rejected_total",
        "Conditional stock decrements that affected no row"
    );
}

/// Creates the application state with every service sharing one store.
pub fn create_default_state<S: Store + Clone + 'static>(
    store: S,
    config: &Config,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        carts: CartService::new(store.clone()),
        checkout: CheckoutService::new(store.clone()),
        catalog: CatalogService::new(store.clone()),
        users: UserService::new(store),
        validator: config.validator(),
        max_page_size: config.max_page_size,
    })
}
