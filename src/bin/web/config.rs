//! Environment configuration: HOST, PORT, STAFF_IDS, INACTIVITY_HOURS.

use bracket_bot::PlayerId;
use std::collections::HashSet;
use std::env;
use std::time::Duration;

pub struct Config {
    pub host: String,
    pub port: u16,
    /// Users allowed to configure, start, fill, judge and cancel tournaments.
    pub staff: HashSet<PlayerId>,
    /// Communities untouched for this long are dropped.
    pub inactivity: Duration,
}

fn env_default(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_staff(raw: &str) -> HashSet<PlayerId> {
    raw.split(',')
        .filter_map(|id| {
            let id = id.trim();
            match id.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    if !id.is_empty() {
                        log::warn!("ignoring invalid staff id '{}'", id);
                    }
                    None
                }
            }
        })
        .collect()
}

impl Config {
    pub fn from_env() -> Self {
        let host = env_default("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = env_default("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let staff = env_default("STAFF_IDS")
            .map(|raw| parse_staff(&raw))
            .unwrap_or_default();
        let hours: u64 = env_default("INACTIVITY_HOURS")
            .and_then(|h| h.parse().ok())
            .unwrap_or(12);
        if staff.is_empty() {
            log::warn!("STAFF_IDS is empty; nobody can start tournaments");
        }
        Self {
            host,
            port,
            staff,
            inactivity: Duration::from_secs(hours * 3600),
        }
    }
}
