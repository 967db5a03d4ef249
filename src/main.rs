mod classifier;
mod config;
mod error;
mod handlers;
mod labels;
mod models;
mod nutrition;
mod preprocess;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};

use crate::classifier::Classifier;
use crate::config::Config;
use crate::error::StartupError;
use crate::labels::LabelCatalog;
use crate::nutrition::NutritionClient;

/// Process-wide read-only state: built once at startup, shared by every
/// request through `web::Data`.
pub struct AppContext {
    pub labels: LabelCatalog,
    pub classifier: Classifier,
    pub nutrition: NutritionClient,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();

    let labels = LabelCatalog::load(&config.labels_path).map_err(fatal)?;
    log::info!(
        "loaded {} labels from {}",
        labels.len(),
        config.labels_path.display()
    );

    let classifier = Classifier::load(&config.model_path).map_err(fatal)?;
    log::info!("model ready at {}", config.model_path.display());

    let nutrition = NutritionClient::new(&config);
    if !nutrition.has_credentials() {
        log::warn!("Edamam credentials not set, nutrition lookups will report an error");
    }

    let context = web::Data::new(AppContext {
        labels,
        classifier,
        nutrition,
    });

    log::info!("server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(context.clone())
            .wrap(cors)
            .service(web::resource("/").route(web::get().to(handlers::index)))
            .service(web::resource("/predict").route(web::post().to(handlers::predict)))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

/// Startup failures abort before the server binds its socket.
fn fatal(err: StartupError) -> std::io::Error {
    log::error!("startup failed: {}", err);
    std::io::Error::new(std::io::ErrorKind::Other, err)
}
