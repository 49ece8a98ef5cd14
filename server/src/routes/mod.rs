use std::sync::Arc;

use dashmap::Entry;
use minesweeper_engine::BoardError;
use nanoid::nanoid;
use rocket::{State, delete, get, http::Status, post, serde::json::Json};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::{
    logic::{Game, Games},
    model::{BoardView, Cell, CreateResponse, GameParams, MoveResponse, Pos, StatusResponse},
    rate_limit::{ClientIp, RateLimiter},
};

#[instrument(level = "trace", skip(games, game))]
fn add_game(games: &Games, game: Game) -> String {
    let mut id_length = 5;
    let max_attempts_per_length = 10;

    loop {
        for _ in 0..max_attempts_per_length {
            let id = nanoid!(id_length);
            match games.entry(id.clone()) {
                Entry::Occupied(_) => {
                    debug!("Game ID collision, trying another: {}", id);
                    continue;
                }
                Entry::Vacant(entry) => {
                    entry.insert(Arc::new(Mutex::new(game)));
                    return id;
                }
            }
        }

        warn!(
            "Exhausted ID attempts at length {}, increasing to {}",
            id_length,
            id_length + 1
        );
        id_length += 1;
    }
}

fn find_game(games: &Games, id: &str) -> Result<Arc<Mutex<Game>>, Status> {
    match games.get(id) {
        Some(entry) => Ok(entry.value().clone()),
        None => {
            warn!("Request for non-existent game: {}", id);
            Err(Status::NotFound)
        }
    }
}

fn error_status(id: &str, error: BoardError) -> Status {
    warn!("Rejected request for game {}: {}", id, error);
    match error {
        BoardError::InvalidConfiguration { .. } | BoardError::OutOfBounds { .. } => {
            Status::BadRequest
        }
        BoardError::AlreadyInitialized => Status::Conflict,
    }
}

#[post("/create", data = "<params>")]
#[instrument(level = "trace", skip(games, rate_limiter, client_ip), fields(client_ip = %client_ip.0, width = params.width, height = params.height, mines = params.mines))]
pub fn create_game(
    params: Json<GameParams>,
    games: &State<Games>,
    rate_limiter: &State<RateLimiter>,
    client_ip: ClientIp,
) -> Result<Json<CreateResponse>, Status> {
    rate_limiter.check(client_ip.0)?;

    let game = Game::new(params.into_inner()).map_err(|error| {
        warn!("Rejected game configuration from {}: {}", client_ip.0, error);
        Status::BadRequest
    })?;
    let id = add_game(games, game);

    info!("Created game {} for client {}", id, client_ip.0);
    Ok(Json(CreateResponse { id }))
}

#[get("/games/<id>")]
pub async fn board_view(id: &str, games: &State<Games>) -> Result<Json<BoardView>, Status> {
    let game = find_game(games, id)?;
    let game = game.lock().await;
    Ok(Json(game.view()))
}

#[get("/games/<id>/status")]
pub async fn game_status(id: &str, games: &State<Games>) -> Result<Json<StatusResponse>, Status> {
    let game = find_game(games, id)?;
    let game = game.lock().await;
    Ok(Json(game.status()))
}

#[get("/games/<id>/cells?<x>&<y>")]
pub async fn cell_at(
    id: &str,
    x: usize,
    y: usize,
    games: &State<Games>,
) -> Result<Json<Cell>, Status> {
    let game = find_game(games, id)?;
    let game = game.lock().await;
    game.cell(Pos { x, y })
        .map(Json)
        .map_err(|error| error_status(id, error))
}

#[post("/games/<id>/place-mines", data = "<pos>")]
#[instrument(level = "trace", skip(games), fields(x = pos.x, y = pos.y))]
pub async fn place_mines(
    id: &str,
    pos: Json<Pos>,
    games: &State<Games>,
) -> Result<Json<StatusResponse>, Status> {
    let game = find_game(games, id)?;
    let mut game = game.lock().await;
    game.place_mines(pos.into_inner())
        .map(Json)
        .map_err(|error| error_status(id, error))
}

#[post("/games/<id>/reveal", data = "<pos>")]
#[instrument(level = "trace", skip(games), fields(x = pos.x, y = pos.y))]
pub async fn reveal(
    id: &str,
    pos: Json<Pos>,
    games: &State<Games>,
) -> Result<Json<MoveResponse>, Status> {
    let game = find_game(games, id)?;
    let mut game = game.lock().await;
    let response = game
        .reveal(pos.into_inner())
        .map_err(|error| error_status(id, error))?;

    if response.status.is_terminal() {
        info!("Game {} finished: {:?}", id, response.status);
    }
    Ok(Json(response))
}

#[post("/games/<id>/flag", data = "<pos>")]
#[instrument(level = "trace", skip(games), fields(x = pos.x, y = pos.y))]
pub async fn flag(
    id: &str,
    pos: Json<Pos>,
    games: &State<Games>,
) -> Result<Json<MoveResponse>, Status> {
    let game = find_game(games, id)?;
    let mut game = game.lock().await;
    game.flag(pos.into_inner())
        .map(Json)
        .map_err(|error| error_status(id, error))
}

#[delete("/games/<id>")]
pub fn destroy_game(id: &str, games: &State<Games>) -> Status {
    if games.remove(id).is_some() {
        info!("Destroyed game {}", id);
        Status::NoContent
    } else {
        warn!("Attempted to destroy non-existent game: {}", id);
        Status::NotFound
    }
}
