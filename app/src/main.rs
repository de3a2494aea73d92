use kit_forms::{App, Config, FormRequestProvider, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod controllers;
mod models;
mod requests;
mod routes;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let environment = Config::init(std::path::Path::new("."));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(%environment, "starting app");

    App::register(&FormRequestProvider);

    Server::from_config(routes::router()).run().await
}
