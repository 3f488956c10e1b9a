//! INI file configuration adapter.

use crate::domain::error::ConfluenceError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfluenceError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| ConfluenceError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, ConfluenceError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| ConfluenceError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// Override a single key, e.g. from a command-line flag.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.config.set(section, key, Some(value.to_string()));
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, ConfluenceError> {
        self.config
            .getint(section, key)
            .map(|value| value.unwrap_or(default))
            .map_err(|reason| not_a_number(section, key, &reason))
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, ConfluenceError> {
        self.config
            .getfloat(section, key)
            .map(|value| value.unwrap_or(default))
            .map_err(|reason| not_a_number(section, key, &reason))
    }
}

fn not_a_number(section: &str, key: &str, reason: &str) -> ConfluenceError {
    ConfluenceError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("{key} is not a number ({reason})"),
    }
}
