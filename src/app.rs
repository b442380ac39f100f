//! HTTP application wiring.
//!
//! Builds the Axum router and defines the shared state injected into
//! handlers. Kept apart from `main` so tests can drive the router directly.

use crate::api;
use crate::config::AppConfig;
use crate::core::sync::SyncHub;
use axum::Router;
use axum::routing::{delete, get, post};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub hub: SyncHub,
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            db: Arc::new(db),
            hub: SyncHub::new(),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    Router::new()
        .route("/v1/system/health", get(api::system::system_health))
        .route("/v1/sync", get(api::system::sync_status))
        .route("/v1/stats/dashboard", get(api::system::dashboard))
        .route("/v1/auth/login", post(api::auth::login))
        .route("/v1/auth/logout", post(api::auth::logout))
        .route("/v1/auth/me", get(api::auth::me))
        .route(
            "/v1/users",
            get(api::users::list_users).post(api::users::create_user),
        )
        .route(
            "/v1/users/:id",
            get(api::users::get_user)
                .patch(api::users::update_user)
                .delete(api::users::delete_user),
        )
        .route(
            "/v1/inventory",
            get(api::inventory::list_items).post(api::inventory::create_item),
        )
        .route("/v1/inventory/low-stock", get(api::inventory::low_stock))
        .route(
            "/v1/inventory/:id",
            get(api::inventory::get_item)
                .patch(api::inventory::update_item)
                .delete(api::inventory::delete_item),
        )
        .route("/v1/inventory/:id/stock", post(api::inventory::update_stock))
        .route(
            "/v1/spare-parts",
            get(api::spare_parts::list_parts).post(api::spare_parts::create_part),
        )
        .route("/v1/spare-parts/low-stock", get(api::spare_parts::low_stock))
        .route(
            "/v1/spare-parts/:id",
            get(api::spare_parts::get_part)
                .patch(api::spare_parts::update_part)
                .delete(api::spare_parts::delete_part),
        )
        .route(
            "/v1/spare-parts/:id/stock",
            post(api::spare_parts::update_stock),
        )
        .route(
            "/v1/collections/:key",
            get(api::collections::get_collection)
                .put(api::collections::replace_collection)
                .post(api::collections::append_item),
        )
        .route(
            "/v1/collections/:key/:index",
            delete(api::collections::remove_item),
        )
        .route("/v1/quantity/adjust", post(api::quantity::adjust))
        .route("/v1/quantity/updates", get(api::quantity::list_updates))
        .route(
            "/v1/requisitions",
            get(api::requisitions::list_requisitions).post(api::requisitions::create_requisition),
        )
        .route(
            "/v1/requisitions/transactions",
            post(api::requisitions::record_transaction),
        )
        .route(
            "/v1/requisitions/:id",
            get(api::requisitions::get_requisition).delete(api::requisitions::delete_requisition),
        )
        .route(
            "/v1/requisitions/:id/approve",
            post(api::requisitions::approve),
        )
        .route("/v1/requisitions/:id/reject", post(api::requisitions::reject))
        .route(
            "/v1/requisitions/:id/complete",
            post(api::requisitions::complete),
        )
        .route(
            "/v1/gate-passes",
            get(api::gate_passes::list_gate_passes).post(api::gate_passes::create_gate_pass),
        )
        .route("/v1/gate-passes/:id", get(api::gate_passes::get_gate_pass))
        .route(
            "/v1/gate-passes/:id/decision",
            post(api::gate_passes::decide),
        )
        .route(
            "/v1/gate-passes/:id/deactivate",
            post(api::gate_passes::deactivate),
        )
        .route(
            "/v1/issuances",
            get(api::issuances::list_issuances).post(api::issuances::create_issuance),
        )
        .route("/v1/issuances/:id", get(api::issuances::get_issuance))
        .route(
            "/v1/issuance-requisitions",
            get(api::issuance_requisitions::list).post(api::issuance_requisitions::create),
        )
        .route(
            "/v1/issuance-requisitions/counts",
            get(api::issuance_requisitions::counts),
        )
        .route(
            "/v1/issuance-requisitions/:id",
            get(api::issuance_requisitions::get).patch(api::issuance_requisitions::update),
        )
        .route(
            "/v1/notifications",
            get(api::notifications::recent).post(api::notifications::create),
        )
        .route(
            "/v1/notifications/:id/read",
            post(api::notifications::mark_read),
        )
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
