// src/main.rs
mod api;
mod config;
mod generator;
mod geometry;
mod model;
mod optimizer;
mod types;

use config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("⚠️ Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();

    println!("🤖 Warehouse placement service starting...");
    api::start_api_server(
        app_config.api,
        app_config.optimizer.packing_config(),
        app_config.generator,
    )
    .await;
}
