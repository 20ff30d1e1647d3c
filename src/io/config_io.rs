use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::ClientConfig;

/// Error type for reading and editing config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse config.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("unknown config key '{0}'")]
    UnknownKey(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Default location of config.toml
pub fn default_config_path() -> PathBuf {
    super::config_dir().join("config.toml")
}

/// Read the config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Read the raw document for round-trip-safe editing. A missing file yields an
/// empty document.
pub fn read_document(path: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    if !path.exists() {
        return Ok(toml_edit::DocumentMut::new());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(text.parse()?)
}

/// Set a dotted key (`server.url`, `ui.tag_colors.bug`, ...) in the document.
/// Values are typed per key; the result must still parse as a config.
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, value: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = key.split('.').collect();
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    let item = match parts.as_slice() {
        ["server", "url"] | ["server", "token"] => toml_edit::value(value),
        ["server", "timeout_secs"] => {
            let secs: i64 = value.parse().map_err(|_| invalid("expected a whole number of seconds"))?;
            if secs <= 0 {
                return Err(invalid("must be positive"));
            }
            toml_edit::value(secs)
        }
        ["ui", "show_key_hints"] => {
            let flag: bool = value.parse().map_err(|_| invalid("expected true or false"))?;
            toml_edit::value(flag)
        }
        ["ui", "colors", _] | ["ui", "tag_colors", _] => toml_edit::value(value),
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    };

    let (last, tables) = parts.split_last().ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    let mut table = doc.as_table_mut();
    for name in tables {
        if !table.contains_key(name) {
            let mut t = toml_edit::Table::new();
            t.set_implicit(false);
            table.insert(name, toml_edit::Item::Table(t));
        }
        table = table[*name]
            .as_table_mut()
            .ok_or_else(|| invalid(&format!("'{}' is not a table", name)))?;
    }
    table.insert(last, item);

    toml::from_str::<ClientConfig>(&doc.to_string())?;
    Ok(())
}

/// Write the document back to disk, preserving formatting
pub fn write_document(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    super::atomic_write(path, doc.to_string().as_bytes()).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r##"# board server
[server]
url = "https://boards.example.com/api/"
timeout_secs = 5

[ui.tag_colors]
bug = "#FF4444"
"##
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.server.url, "http://localhost:8000/api/");
        assert_eq!(config.server.timeout_secs, 10);
        assert!(config.ui.show_key_hints);
    }

    #[test]
    fn load_parses_sections() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, sample_config()).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.server.url, "https://boards.example.com/api/");
        assert_eq!(config.server.timeout_secs, 5);
        assert!(config.server.token.is_none());
        assert_eq!(config.ui.tag_colors.get("bug").map(String::as_str), Some("#FF4444"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[server\nurl =").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn round_trip_preserves_comments() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, sample_config()).unwrap();

        let mut doc = read_document(&path).unwrap();
        set_value(&mut doc, "server.token", "secret").unwrap();
        write_document(&path, &doc).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# board server"));
        assert!(written.contains("token = \"secret\""));
        assert_eq!(load_config(&path).unwrap().server.token.as_deref(), Some("secret"));
    }

    #[test]
    fn set_value_creates_tables() {
        let mut doc = toml_edit::DocumentMut::new();
        set_value(&mut doc, "ui.colors.background", "#000000").unwrap();
        set_value(&mut doc, "server.timeout_secs", "30").unwrap();
        set_value(&mut doc, "ui.show_key_hints", "false").unwrap();
        let config: ClientConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.ui.colors.get("background").map(String::as_str), Some("#000000"));
        assert_eq!(config.server.timeout_secs, 30);
        assert!(!config.ui.show_key_hints);
    }

    #[test]
    fn set_value_rejects_bad_input() {
        let mut doc = toml_edit::DocumentMut::new();
        assert!(matches!(
            set_value(&mut doc, "server.port", "80"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            set_value(&mut doc, "server.timeout_secs", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_value(&mut doc, "ui.show_key_hints", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
