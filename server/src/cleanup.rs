use std::{env, time::Duration};

use tokio::time;
use tracing::{debug, info};

use crate::logic::Games;

/// Expiry settings for abandoned sessions, all in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CleanupConfig {
    pub interval: u64,
    pub inactive_timeout: u64,
    pub finished_timeout: u64,
    pub active_timeout: u64,
}

fn env_secs(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl CleanupConfig {
    pub fn from_env() -> Self {
        Self {
            interval: env_secs("CLEANUP_INTERVAL_SECONDS", 60),
            inactive_timeout: env_secs("INACTIVE_GAME_TIMEOUT_SECONDS", 600),
            finished_timeout: env_secs("FINISHED_GAME_TIMEOUT_SECONDS", 120),
            active_timeout: env_secs("ACTIVE_GAME_TIMEOUT_SECONDS", 86400),
        }
    }
}

pub async fn start_cleanup_task(games: Games, config: CleanupConfig) {
    let mut interval = time::interval(Duration::from_secs(config.interval.max(1)));

    info!(
        "Started game cleanup task: checking every {}s, inactive timeout: {}s, finished timeout: {}s, active timeout: {}s",
        config.interval, config.inactive_timeout, config.finished_timeout, config.active_timeout
    );

    loop {
        interval.tick().await;
        cleanup_games(&games, &config);
    }
}

/// Drops expired sessions and returns how many were removed.
pub fn cleanup_games(games: &Games, config: &CleanupConfig) -> usize {
    // Sessions locked by a request in flight are not idle; skip them.
    let expired: Vec<String> = games
        .iter()
        .filter(|entry| {
            entry.value().try_lock().is_ok_and(|game| {
                game.should_cleanup(
                    config.inactive_timeout,
                    config.finished_timeout,
                    config.active_timeout,
                )
            })
        })
        .map(|entry| entry.key().clone())
        .collect();

    for game_id in &expired {
        games.remove(game_id);
        debug!("Cleaned up game: {}", game_id);
    }

    if !expired.is_empty() {
        info!("Cleaned up {} expired games", expired.len());
    }
    expired.len()
}
