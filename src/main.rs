use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::sync::Arc;
use std::time::Duration;

use rusty_archery::AppState;
use rusty_archery::args;
use rusty_archery::controller::session::http_handlers;
use rusty_archery::storage::MemoryStore;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = args::args_checks()?;
    let bind = (args.bind.clone(), args.port);
    log::info!(
        "serving {} rounds on {}:{}",
        args.catalog.rounds.len(),
        bind.0,
        bind.1
    );
    let idle = args.session_idle;
    let state = AppState::new(args, Arc::new(MemoryStore::new()));

    let sweeper = state.clone();
    tokio::spawn(async move {
        let mut every = tokio::time::interval(Duration::from_secs(60));
        loop {
            every.tick().await;
            sweeper.evict_idle(idle).await;
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(state.clone()))
            .configure(http_handlers::configure)
    })
    .bind(bind)?
    .run()
    .await?;
    Ok(())
}
