use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use cardio_risk::config::{LoggingSettings, Settings};
use cardio_risk::routes::{self, AppState};
use cardio_risk::services::ResourceLoader;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging is configured from settings, so load them first
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting cardiovascular risk service...");
    info!("Configuration loaded successfully");

    // No partial startup: every artifact must load before the server binds
    let loader = ResourceLoader::new(&settings.artifacts);
    let artifacts = tokio::task::spawn_blocking(move || loader.load())
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
        .map_err(|e| {
            error!("Failed to load model artifacts from {}: {}", settings.artifacts.dir, e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;

    info!("Model artifacts ready: {:?}", artifacts);

    let app_state = AppState::new(artifacts);

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
