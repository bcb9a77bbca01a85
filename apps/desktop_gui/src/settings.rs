//! Layered settings: defaults, then `client.toml` in the user config
//! directory, then environment, then the command-line flag.

use std::{collections::HashMap, env, fs, path::PathBuf};

pub const SERVER_URL_ENV: &str = "ACCESS_DESK_SERVER_URL";

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8888".into(),
        }
    }
}

pub fn load_settings(flag_override: Option<String>) -> Settings {
    let file_value = config_file_path()
        .and_then(|path| fs::read_to_string(path).ok())
        .and_then(|raw| toml::from_str::<HashMap<String, String>>(&raw).ok())
        .and_then(|cfg| cfg.get("server_url").cloned());
    let env_value = env::var(SERVER_URL_ENV).ok();

    Settings {
        server_url: resolve_server_url(
            file_value.as_deref(),
            env_value.as_deref(),
            flag_override.as_deref(),
        ),
    }
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("access-desk").join("client.toml"))
}

fn resolve_server_url(
    file_value: Option<&str>,
    env_value: Option<&str>,
    flag_value: Option<&str>,
) -> String {
    let non_empty = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    non_empty(flag_value)
        .or_else(|| non_empty(env_value))
        .or_else(|| non_empty(file_value))
        .unwrap_or_else(|| Settings::default().server_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_no_layer_is_set() {
        assert_eq!(
            resolve_server_url(None, None, None),
            "http://127.0.0.1:8888"
        );
    }

    #[test]
    fn flag_wins_over_env_wins_over_file() {
        assert_eq!(
            resolve_server_url(Some("http://file"), None, None),
            "http://file"
        );
        assert_eq!(
            resolve_server_url(Some("http://file"), Some("http://env"), None),
            "http://env"
        );
        assert_eq!(
            resolve_server_url(Some("http://file"), Some("http://env"), Some("http://flag")),
            "http://flag"
        );
    }

    #[test]
    fn blank_layers_are_ignored() {
        assert_eq!(
            resolve_server_url(Some("http://file"), Some("   "), Some("")),
            "http://file"
        );
    }
}
