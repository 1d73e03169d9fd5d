//! Dotted-path configuration lookups with defaulting.
//!
//! Every typed getter follows the same rule: if the path is unset, return
//! the first non-zero default, else the zero value. Keys match exactly
//! first and case-insensitively second, so `Server.ENV` and `server.env`
//! name the same value.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use toml::{Table, Value};

use crate::config::defaults::first_non_zero;
use crate::config::loader::{load_table, ConfigError};

/// Hot-swappable view over a raw TOML table.
pub struct ConfigProvider {
    table: ArcSwap<Table>,
}

impl ConfigProvider {
    pub fn new(table: Table) -> Self {
        Self {
            table: ArcSwap::from_pointee(table),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::new(load_table(path)?))
    }

    /// Replace the whole table. Readers see either the old or the new one.
    pub fn reload(&self, table: Table) {
        self.table.store(Arc::new(table));
    }

    pub fn snapshot(&self) -> Arc<Table> {
        self.table.load_full()
    }

    pub fn is_set(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Raw value at `path`.
    pub fn get(&self, path: &str) -> Option<Value> {
        self.lookup(path)
    }

    pub fn get_string(&self, path: &str, defaults: &[&str]) -> String {
        match self.lookup(path) {
            Some(Value::String(s)) => s,
            Some(Value::Integer(i)) => i.to_string(),
            Some(Value::Float(f)) => f.to_string(),
            Some(Value::Boolean(b)) => b.to_string(),
            Some(Value::Datetime(d)) => d.to_string(),
            Some(_) => String::new(),
            None => first_non_zero(defaults).to_string(),
        }
    }

    pub fn get_int(&self, path: &str, defaults: &[i64]) -> i64 {
        match self.lookup(path) {
            Some(Value::Integer(i)) => i,
            Some(Value::Float(f)) => f as i64,
            Some(Value::Boolean(b)) => i64::from(b),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            Some(_) => 0,
            None => first_non_zero(defaults),
        }
    }

    pub fn get_bool(&self, path: &str, defaults: &[bool]) -> bool {
        match self.lookup(path) {
            Some(Value::Boolean(b)) => b,
            Some(Value::Integer(i)) => i != 0,
            Some(Value::String(s)) => parse_bool(&s).unwrap_or(false),
            Some(_) => false,
            None => first_non_zero(defaults),
        }
    }

    /// Strings use unit suffixes (`"210m"`, `"1h30m"`, `"500ms"`); bare
    /// numbers, quoted or not, are seconds.
    pub fn get_duration(&self, path: &str, defaults: &[Duration]) -> Duration {
        match self.lookup(path) {
            Some(Value::String(s)) => parse_duration(&s).unwrap_or(Duration::ZERO),
            Some(Value::Integer(i)) => Duration::from_secs(u64::try_from(i).unwrap_or(0)),
            Some(Value::Float(f)) if f.is_finite() && f >= 0.0 => Duration::from_secs_f64(f),
            Some(_) => Duration::ZERO,
            None => first_non_zero(defaults),
        }
    }

    /// The array at `path`, empty if unset or of the wrong shape.
    pub fn get_list<T: DeserializeOwned>(&self, path: &str) -> Vec<T> {
        let Some(value) = self.lookup(path) else {
            return Vec::new();
        };
        match Vec::<T>::deserialize(value) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(path, error = %e, "Config value is not a list of the expected type");
                Vec::new()
            }
        }
    }

    /// Set `path`, creating intermediate tables as needed.
    pub fn add(&self, path: &str, value: impl Into<Value>) {
        let value = value.into();
        self.table.rcu(|current| {
            let mut table = Table::clone(current);
            insert_path(&mut table, path, value.clone());
            table
        });
    }

    /// Process environment variable `name`, else the config value at the
    /// same path, else the first non-empty default. Empty values count as
    /// unset at every step.
    pub fn env(&self, name: &str, defaults: &[&str]) -> String {
        if let Some(value) = std::env::var(name).ok().filter(|v| !v.is_empty()) {
            return value;
        }
        let value = self.get_string(name, defaults);
        if value.is_empty() {
            first_non_zero(defaults).to_string()
        } else {
            value
        }
    }

    fn lookup(&self, path: &str) -> Option<Value> {
        let table = self.table.load();
        let mut segments = path.split('.');
        let mut current = find_key(&table, segments.next()?)?;
        for segment in segments {
            current = find_key(current.as_table()?, segment)?;
        }
        Some(current.clone())
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self::new(Table::new())
    }
}

impl FromStr for ConfigProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(toml::from_str(s)?))
    }
}

impl std::fmt::Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProvider")
            .field("keys", &self.table.load().keys().collect::<Vec<_>>())
            .finish()
    }
}

fn existing_key(table: &Table, key: &str) -> Option<String> {
    if table.contains_key(key) {
        return Some(key.to_string());
    }
    table.keys().find(|k| k.eq_ignore_ascii_case(key)).cloned()
}

fn find_key<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
    table.get(&existing_key(table, key)?)
}

fn insert_path(table: &mut Table, path: &str, value: Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return;
    };

    let mut current = table;
    for segment in segments {
        let key = existing_key(current, segment).unwrap_or_else(|| segment.to_string());
        let entry = current.entry(key).or_insert(Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        let Value::Table(next) = entry else {
            return;
        };
        current = next;
    }

    let key = existing_key(current, last).unwrap_or_else(|| last.to_string());
    current.insert(key, value);
}

/// Accepts the spellings `1 t T true TRUE True` and their false twins.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Parse a duration such as `"1h30m"`, `"210m"`, `"500ms"` or `"2days"`.
/// A bare number is seconds.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let s = input.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [Server]
        ENV = "production"
        Port = 8080
        Debug = "t"

        [Database]
        MaxLifetime = "1h30m"
        Parameters = ["sslmode=disable", "timezone=UTC"]
    "#;

    fn provider() -> ConfigProvider {
        SAMPLE.parse().unwrap()
    }

    #[test]
    fn test_get_string_with_defaults() {
        let cfg = provider();
        assert_eq!(cfg.get_string("Server.ENV", &["undefine"]), "production");
        assert_eq!(cfg.get_string("server.env", &[]), "production");
        assert_eq!(cfg.get_string("Server.Port", &[]), "8080");
        assert_eq!(cfg.get_string("Server.Host", &["", "localhost"]), "localhost");
        assert_eq!(cfg.get_string("Server.Host", &[]), "");
    }

    #[test]
    fn test_typed_getters() {
        let cfg = provider();
        assert_eq!(cfg.get_int("Server.Port", &[80]), 8080);
        assert_eq!(cfg.get_int("Server.Missing", &[0, 5432]), 5432);
        assert!(cfg.get_bool("Server.Debug", &[]));
        assert!(cfg.get_bool("Server.Missing", &[true]));
        assert_eq!(
            cfg.get_duration("Database.MaxLifetime", &[]),
            Duration::from_secs(90 * 60)
        );
        assert_eq!(
            cfg.get_duration("Database.Missing", &[Duration::from_secs(7)]),
            Duration::from_secs(7)
        );
    }

    #[test]
    fn test_get_list() {
        let cfg = provider();
        let params: Vec<String> = cfg.get_list("Database.Parameters");
        assert_eq!(params, vec!["sslmode=disable", "timezone=UTC"]);

        let missing: Vec<String> = cfg.get_list("Database.Nothing");
        assert!(missing.is_empty());

        let wrong: Vec<i64> = cfg.get_list("Database.Parameters");
        assert!(wrong.is_empty());
    }

    #[test]
    fn test_add_creates_tables() {
        let cfg = provider();
        cfg.add("Cache.Redis.Host", "127.0.0.1");
        cfg.add("server.env", "staging");

        assert_eq!(cfg.get_string("Cache.Redis.Host", &[]), "127.0.0.1");
        assert_eq!(cfg.get_string("Server.ENV", &[]), "staging");
        assert!(cfg.snapshot()["Server"].as_table().unwrap().contains_key("ENV"));
    }

    #[test]
    fn test_add_replaces_scalar_with_table() {
        let cfg = provider();
        cfg.add("Server.Port.Internal", 9000);
        assert_eq!(cfg.get_int("Server.Port.Internal", &[]), 9000);
    }

    #[test]
    fn test_reload_swaps_table() {
        let cfg = provider();
        cfg.reload(toml::from_str("[Server]\nENV = \"dev\"").unwrap());
        assert_eq!(cfg.get_string("Server.ENV", &[]), "dev");
        assert!(!cfg.is_set("Database.MaxLifetime"));
    }

    #[test]
    fn test_env_defaults() {
        let cfg = ConfigProvider::default();
        assert_eq!(
            cfg.env("DIAGLOG_TEST_SURELY_UNSET_VARIABLE", &["", "fallback"]),
            "fallback"
        );

        cfg.add("DIAGLOG_TEST_SURELY_UNSET_VARIABLE", "");
        assert_eq!(
            cfg.env("DIAGLOG_TEST_SURELY_UNSET_VARIABLE", &["fallback"]),
            "fallback"
        );

        cfg.add("DIAGLOG_TEST_SURELY_UNSET_VARIABLE", "from-config");
        assert_eq!(
            cfg.env("DIAGLOG_TEST_SURELY_UNSET_VARIABLE", &["fallback"]),
            "from-config"
        );
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("210m"), Some(Duration::from_secs(210 * 60)));
        assert_eq!(parse_duration("1h30m"), Some(Duration::from_secs(90 * 60)));
        assert_eq!(parse_duration("1h 30m"), Some(Duration::from_secs(90 * 60)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("2days"), Some(Duration::from_secs(2 * 86_400)));
        assert_eq!(parse_duration("0"), Some(Duration::ZERO));
        assert_eq!(parse_duration(" 10 "), Some(Duration::from_secs(10)));
        assert_eq!(parse_duration("5 parsecs"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn test_get_duration_numeric_forms() {
        let cfg: ConfigProvider = "Timeout = 30\nGrace = \"15\"\nBad = \"soon\"".parse().unwrap();
        assert_eq!(cfg.get_duration("Timeout", &[]), Duration::from_secs(30));
        assert_eq!(cfg.get_duration("Grace", &[]), Duration::from_secs(15));
        assert_eq!(cfg.get_duration("Bad", &[Duration::from_secs(1)]), Duration::ZERO);
    }
}
