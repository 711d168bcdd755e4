use dotenvy::dotenv;
use hotdog_bot::config::Settings;
use hotdog_bot::handler::MessageHandler;
use hotdog_bot::vision::RekognitionDetector;
use hotdog_bot::web;
use hotdog_bot::webex::WebexClient;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenv().ok();

    init_logging();

    info!("Starting hotdog detection bot...");

    let settings = init_settings();
    info!(bot_email = %settings.bot_email, "Bot account loaded.");

    let detector = init_detector().await;
    let webex = WebexClient::new(&settings);
    let handler = MessageHandler::new(webex, detector);

    web::serve(handler, settings.webhook_port).await
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_settings() -> Settings {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}

async fn init_detector() -> Arc<RekognitionDetector> {
    // Region and credentials come from the default provider chain.
    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await;
    info!("Rekognition client initialized.");
    Arc::new(RekognitionDetector::new(&sdk_config))
}
