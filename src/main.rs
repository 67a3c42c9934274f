use std::sync::Arc;

use thiserror::Error;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use expiry_reminder::adapters::{
    GoogleCalendarClient, GoogleCalendarConfig, OcrSpaceConfig, OcrSpaceRecognizer,
    OpenFoodFactsCatalog, OpenFoodFactsConfig, ServiceAccountKey, TelegramBot, TelegramConfig,
    ZbarDecoder,
};
use expiry_reminder::application::{
    ConversationEngine, Dispatcher, EngineCollaborators, EngineSettings, ProductResolver,
    ReminderScheduler, UpdatePoller,
};
use expiry_reminder::config::{AppConfig, LogFormat, ServiceConfig, ValidationError};
use expiry_reminder::ports::{CalendarError, CatalogError, MessagingError, RecognitionError};

#[derive(Debug, Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),
    #[error("telegram client: {0}")]
    Telegram(#[from] MessagingError),
    #[error("OCR client: {0}")]
    Ocr(#[from] RecognitionError),
    #[error("product catalog client: {0}")]
    Catalog(#[from] CatalogError),
    #[error("calendar client: {0}")]
    Calendar(#[from] CalendarError),
}

#[tokio::main]
async fn main() {
    let loaded = AppConfig::load();
    let service = loaded
        .as_ref()
        .map(|c| c.service.clone())
        .unwrap_or_default();
    init_tracing(&service);

    let config = match loaded {
        Ok(config) => config,
        Err(err) => {
            error!("failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    let poller = match build(&config) {
        Ok(poller) => poller,
        Err(err) => {
            error!("failed to start: {err}");
            std::process::exit(1);
        }
    };

    info!(
        calendar = %config.calendar.calendar_id,
        timezone = %config.calendar.timezone,
        call_timeout_secs = config.service.call_timeout_secs,
        "expiry reminder bot starting"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let running = tokio::spawn(poller.run(shutdown_rx));

    if let Err(err) = signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
    }
    info!("shutdown signal received");

    // The poller only stops once it sees the flag; a closed channel means it already exited.
    let _ = shutdown_tx.send(true);
    if let Err(err) = running.await {
        error!("update poller panicked: {err}");
    }
    info!("stopped");
}

fn init_tracing(service: &ServiceConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&service.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match service.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn build(config: &AppConfig) -> Result<UpdatePoller, StartupError> {
    config.validate()?;
    let timeout = config.service.call_timeout();

    let telegram = Arc::new(TelegramBot::new(
        TelegramConfig::new(config.telegram.bot_token.clone())
            .with_api_base_url(&config.telegram.api_base_url)
            .with_poll_timeout(config.telegram.poll_timeout()),
    )?);

    let recognizer = OcrSpaceRecognizer::new(
        OcrSpaceConfig::new(config.ocr.api_key.clone())
            .with_endpoint(&config.ocr.endpoint)
            .with_timeout(timeout),
    )?;

    let catalog = OpenFoodFactsCatalog::new(
        OpenFoodFactsConfig::default()
            .with_base_url(&config.products.base_url)
            .with_user_agent(&config.products.user_agent)
            .with_timeout(timeout),
    )?;

    let key = ServiceAccountKey::load(&config.calendar.credentials_path)?;
    info!(account = %key.client_email(), "loaded calendar service account");
    let calendar = GoogleCalendarClient::new(
        GoogleCalendarConfig {
            api_base_url: config.calendar.api_base_url.clone(),
            timeout,
        },
        key,
    )?;

    let engine = ConversationEngine::new(
        EngineCollaborators {
            messaging: telegram.clone(),
            recognizer: Arc::new(recognizer),
            decoder: Arc::new(ZbarDecoder::new(&config.barcode.command)),
            products: ProductResolver::new(Arc::new(catalog), timeout),
            scheduler: ReminderScheduler::new(
                Arc::new(calendar),
                &config.calendar.calendar_id,
                config.calendar.tz()?,
                timeout,
            ),
        },
        config.access.access_list()?,
        EngineSettings {
            call_timeout: timeout,
            temp_dir: config.service.temp_dir(),
            recognition: config.ocr.recognition_options(),
        },
    );

    let dispatcher = Dispatcher::new(Arc::new(engine), config.service.session_idle());
    Ok(UpdatePoller::new(telegram, dispatcher))
}
