use anyhow::{Result, bail};

use super::{AppConfig, defaults};

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }

    if cfg.database.min_idle > cfg.database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            cfg.database.min_idle, cfg.database.max_connections
        ));
    }

    if cfg.session.secret.trim().is_empty() {
        errors.push("session.secret must not be empty".to_string());
    }

    if cfg.session.ttl_hours <= 0 {
        errors.push("session.ttl_hours must be > 0".to_string());
    }

    if cfg.upstream.timeout_secs == 0 {
        errors.push("upstream.timeout_secs must be > 0".to_string());
    }

    for (name, url) in [
        ("upstream.activity_url", &cfg.upstream.activity_url),
        ("upstream.image_url", &cfg.upstream.image_url),
    ] {
        if reqwest::Url::parse(url).is_err() {
            errors.push(format!("{name} must be an absolute URL (got {url:?})"));
        }
    }

    if cfg.general.production {
        if cfg.session.secret == defaults::DEV_SESSION_SECRET {
            errors.push("session.secret must be set in production".to_string());
        }

        if cfg.upstream.image_access_key.trim().is_empty() {
            errors.push(
                "upstream.image_access_key (or UNSPLASH_ACCESS_KEY) must be set in production"
                    .to_string(),
            );
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
