use axum::{
    routing::{get, post},
    Router,
};

use std::sync::Arc;

use crate::{exports, reports, split, transactions, users};
use engine::Ledger;

#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<Ledger>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/users", get(users::list))
        .route("/users/{id}", get(users::get))
        .route("/users/{id}/transactions", get(users::history))
        .route("/users/{id}/claim", post(users::claim))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            axum::routing::patch(transactions::update).delete(transactions::delete),
        )
        .route("/transactions/{id}/comments", post(transactions::comment_new))
        .route("/split", post(split::split_new))
        .route("/reports/categories", get(reports::categories))
        .route("/reports/users", get(reports::by_user))
        .route("/reports/monthly", get(reports::monthly))
        .route("/export", get(exports::csv))
        .route("/reconcile", post(reports::reconcile))
        .with_state(state)
}

pub async fn run(ledger: Ledger) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(ledger, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    ledger: Ledger,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        ledger: Arc::new(ledger),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    ledger: Ledger,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(ledger, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
