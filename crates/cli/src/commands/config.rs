use std::env;
use std::fs;
use std::path::Path;

use toml::Value;
use vitrine_core::config::{detect_config_path, AppConfig};

use crate::commands::{load_config, CommandResult};

/// Config keys with the environment variable that overrides each of them.
const FIELDS: &[(&str, &str)] = &[
    ("database.url", "VITRINE_DATABASE_URL"),
    ("database.max_connections", "VITRINE_DATABASE_MAX_CONNECTIONS"),
    ("database.timeout_secs", "VITRINE_DATABASE_TIMEOUT_SECS"),
    ("database.busy_timeout_ms", "VITRINE_DATABASE_BUSY_TIMEOUT_MS"),
    ("server.bind_address", "VITRINE_SERVER_BIND_ADDRESS"),
    ("server.port", "VITRINE_SERVER_PORT"),
    ("server.health_check_port", "VITRINE_SERVER_HEALTH_CHECK_PORT"),
    ("server.graceful_shutdown_secs", "VITRINE_SERVER_GRACEFUL_SHUTDOWN_SECS"),
    ("logging.level", "VITRINE_LOGGING_LEVEL"),
    ("logging.format", "VITRINE_LOGGING_FORMAT"),
];

pub fn run() -> CommandResult {
    let config = match load_config("config") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    CommandResult::success(
        "config",
        render(&config, config_file_doc.as_ref(), config_file_path.as_deref()),
    )
}

fn render(config: &AppConfig, file_doc: Option<&Value>, file_path: Option<&Path>) -> String {
    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, env_key) in FIELDS {
        lines.push(render_line(
            key,
            &field_value(config, key),
            field_source(key, env_key, file_doc, file_path),
        ));
    }
    lines.join("\n")
}

fn field_value(config: &AppConfig, key: &str) -> String {
    match key {
        "database.url" => config.database.url.clone(),
        "database.max_connections" => config.database.max_connections.to_string(),
        "database.timeout_secs" => config.database.timeout_secs.to_string(),
        "database.busy_timeout_ms" => config.database.busy_timeout_ms.to_string(),
        "server.bind_address" => config.server.bind_address.clone(),
        "server.port" => config.server.port.to_string(),
        "server.health_check_port" => config.server.health_check_port.to_string(),
        "server.graceful_shutdown_secs" => config.server.graceful_shutdown_secs.to_string(),
        "logging.level" => config.logging.level.clone(),
        "logging.format" => format!("{:?}", config.logging.format).to_lowercase(),
        _ => "<unknown>".to_string(),
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
