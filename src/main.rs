use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{error, info};
use subastas_api::config::AppConfig;
use subastas_api::web::app::configure_app;
use subastas_api::web::types::AppState;

// Main application
pub async fn run_app(config: AppConfig) -> std::io::Result<()> {
    let app_state = AppState::new(&config);

    info!(
        "Auctions in {}, users in {}",
        config.auctions_file.display(),
        config.users_file.display()
    );
    info!("Servidor escuchando en http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(Logger::default())
            .configure(configure_app)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err));
        }
    };

    run_app(config).await
}
