//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum_test::TestServer;

use mailing_list::config::GrpcConfig;
use mailing_list::web::handlers::AppState;
use mailing_list::web::router::create_router;
use mailing_list::{Database, GrpcServer, MailingList, MailingListClient};

/// Create a registry over a fresh in-memory database.
pub async fn create_registry() -> MailingList {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    MailingList::new(Arc::new(db))
}

/// Create an in-process JSON API server over the given registry.
pub fn create_json_server(registry: MailingList) -> TestServer {
    let router = create_router(Arc::new(AppState::new(registry)));
    TestServer::new(router).expect("Failed to create test server")
}

/// Start a gRPC server on a random local port.
pub async fn start_grpc_server(registry: MailingList) -> SocketAddr {
    let config = GrpcConfig {
        bind: "127.0.0.1:0".to_string(),
    };
    GrpcServer::new(&config, registry)
        .expect("Invalid gRPC config")
        .run_with_addr()
        .await
        .expect("Failed to start gRPC server")
}

/// Connect a client to a server started with `start_grpc_server`.
pub async fn connect_grpc_client(addr: SocketAddr) -> MailingListClient {
    MailingListClient::connect(format!("http://{addr}"))
        .await
        .expect("Failed to connect gRPC client")
}
