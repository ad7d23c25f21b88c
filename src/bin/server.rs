use actix_web::{App, HttpServer, web};
use std::env;
use tracing_subscriber::EnvFilter;
use vmops::www::handlers;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let server_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| String::from("0.0.0.0"));
    let server_port = env::var("PORT").unwrap_or_else(|_| String::from("8080"));
    let bind_address = format!("{}:{}", server_address, server_port);

    tracing::info!("Starting push endpoint at: http://{}/pubsub", bind_address);
    HttpServer::new(|| {
        App::new()
            .route("/", web::post().to(handlers::push))
            .route("/pubsub", web::post().to(handlers::push))
            .route("/healthz", web::get().to(handlers::healthz))
    })
    .bind(bind_address)?
    .run()
    .await
}
