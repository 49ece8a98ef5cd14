use rocket::{Build, Rocket, routes};

use crate::{logic::Games, rate_limit::RateLimiter};

pub mod cleanup;
pub mod cors;
pub mod logic;
pub mod model;
pub mod rate_limit;
pub mod routes;

/// Assembles the session routes over the given registry. CORS and the cleanup task are
/// attached by the binary.
pub fn build(games: Games, rate_limiter: RateLimiter) -> Rocket<Build> {
    rocket::build()
        .manage(games)
        .manage(rate_limiter)
        .mount(
            "/",
            routes![
                routes::create_game,
                routes::board_view,
                routes::game_status,
                routes::cell_at,
                routes::place_mines,
                routes::reveal,
                routes::flag,
                routes::destroy_game,
            ],
        )
}
