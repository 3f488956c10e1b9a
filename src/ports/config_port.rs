//! Configuration access port trait.
//!
//! Typed getters return `default` when a key is missing and
//! `ConfigInvalid` when it is present but does not parse.

use crate::domain::error::ConfluenceError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, ConfluenceError>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, ConfluenceError>;
}
