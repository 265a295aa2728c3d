use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ndawonga_core::config::{resolve_config_path, AppConfig};
use toml::Value;

use crate::commands::{load_config, CommandResult};

/// Key path, rendered value, and the env vars that can set it, highest priority first.
type Field = (&'static str, String, &'static [&'static str]);

pub fn run() -> CommandResult {
    let config = match load_config("config") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines =
        vec!["effective config (source precedence: override > env > file > default):".to_string()];
    for (key_path, value, env_keys) in fields(&config) {
        let source =
            field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(render_line(key_path, &value, source));
    }

    let rates_source = field_source(
        "pricing.base_rates",
        &[],
        config_file_doc.as_ref(),
        config_file_path.as_deref(),
    );
    for (category, rate) in &config.pricing.base_rates {
        lines.push(render_line(
            &format!("pricing.base_rates.\"{category}\""),
            &rate.to_string(),
            rates_source.clone(),
        ));
    }
    let multipliers_source = field_source(
        "pricing.complexity_multipliers",
        &[],
        config_file_doc.as_ref(),
        config_file_path.as_deref(),
    );
    for (level, factor) in &config.pricing.complexity_multipliers {
        lines.push(render_line(
            &format!("pricing.complexity_multipliers.{level}"),
            &factor.to_string(),
            multipliers_source.clone(),
        ));
    }

    CommandResult::success("config", lines.join("\n"))
}

fn fields(config: &AppConfig) -> Vec<Field> {
    let optional_path = |path: &Option<PathBuf>| {
        path.as_ref().map_or_else(|| "<unset>".to_string(), |path| path.display().to_string())
    };

    vec![
        field("database.url", config.database.url.clone(), &["NDAWONGA_DATABASE_URL"]),
        field(
            "database.max_connections",
            config.database.max_connections.to_string(),
            &["NDAWONGA_DATABASE_MAX_CONNECTIONS"],
        ),
        field(
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            &["NDAWONGA_DATABASE_TIMEOUT_SECS"],
        ),
        field(
            "server.bind_address",
            config.server.bind_address.clone(),
            &["NDAWONGA_SERVER_BIND_ADDRESS"],
        ),
        field("server.port", config.server.port.to_string(), &["NDAWONGA_SERVER_PORT", "PORT"]),
        field(
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["NDAWONGA_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        field(
            "server.static_dir",
            optional_path(&config.server.static_dir),
            &["NDAWONGA_SERVER_STATIC_DIR"],
        ),
        field(
            "server.uploads_dir",
            optional_path(&config.server.uploads_dir),
            &["NDAWONGA_SERVER_UPLOADS_DIR"],
        ),
        field(
            "logging.level",
            config.logging.level.clone(),
            &["NDAWONGA_LOGGING_LEVEL", "NDAWONGA_LOG_LEVEL"],
        ),
        field(
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            &["NDAWONGA_LOGGING_FORMAT", "NDAWONGA_LOG_FORMAT"],
        ),
        field("pricing.default_category", config.pricing.default_category.clone(), &[]),
        field("pricing.default_complexity", config.pricing.default_complexity.clone(), &[]),
        field(
            "pricing.contingency_factor",
            config.pricing.contingency_factor.to_string(),
            &["NDAWONGA_PRICING_CONTINGENCY_FACTOR"],
        ),
    ]
}

fn field(key_path: &'static str, value: String, env_keys: &'static [&'static str]) -> Field {
    (key_path, value, env_keys)
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
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

#[cfg(test)]
mod tests {
    use super::{contains_path, field_source};

    #[test]
    fn nested_table_paths_are_found() {
        let doc: toml::Value = "[pricing.base_rates]\n\"Road Construction\" = 1000\n"
            .parse()
            .expect("valid toml");

        assert!(contains_path(&doc, "pricing.base_rates"));
        assert!(!contains_path(&doc, "pricing.complexity_multipliers"));
    }

    #[test]
    fn file_source_names_the_file() {
        let doc: toml::Value = "[server]\nport = 8080\n".parse().expect("valid toml");

        let source =
            field_source("server.port", &[], Some(&doc), Some(std::path::Path::new("ndawonga.toml")));

        assert_eq!(source, "file (ndawonga.toml)");
        assert_eq!(field_source("server.bind_address", &[], Some(&doc), None), "default");
    }
}
