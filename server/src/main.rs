use dashmap::DashMap;
use minesweeper_server::{
    build,
    cleanup::{CleanupConfig, start_cleanup_task},
    cors::create_cors,
    logic::Games,
    rate_limit::RateLimiter,
};
use rocket::{
    Build, Rocket,
    fairing::{Fairing, Info, Kind},
};
use std::sync::Arc;
use tracing::{error, info, warn};

struct CleanupFairing;

#[rocket::async_trait]
impl Fairing for CleanupFairing {
    fn info(&self) -> Info {
        Info {
            name: "Cleanup Task",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        if let Some(games) = rocket.state::<Games>() {
            let games_for_cleanup = games.clone();
            tokio::spawn(async move {
                start_cleanup_task(games_for_cleanup, CleanupConfig::from_env()).await;
            });
        } else {
            warn!("Failed to get games state for cleanup task");
        }
        Ok(rocket)
    }
}

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    tracing_subscriber::fmt::init();
    info!("Starting minesweeper session server");

    let games: Games = Arc::new(DashMap::new());
    let rocket = build(games, RateLimiter::from_env()).attach(CleanupFairing);

    let rocket = match create_cors() {
        Ok(cors) => rocket.attach(cors),
        Err(e) => {
            error!("Invalid CORS configuration, serving without CORS: {}", e);
            rocket
        }
    };

    info!(
        "Endpoints: POST /create, GET|DELETE /games/<id>, GET /games/<id>/status, GET /games/<id>/cells, POST /games/<id>/{{place-mines,reveal,flag}}"
    );
    rocket
}
