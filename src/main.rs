use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use collabhub::{config::Config, routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    if config.token_ttl_hours.is_none() {
        log::warn!("TOKEN_TTL_HOURS=0: issued tokens never expire");
    }
    if !config.strict_task_listing {
        log::info!("Task listing is open to any authenticated user (STRICT_TASK_LISTING=false)");
    }

    let state = web::Data::new(AppState::in_memory(&config));

    log::info!("Starting Team Collaboration Hub at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure(state.clone()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
