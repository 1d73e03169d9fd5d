//! Database connection settings.
//!
//! Read from the `Database` section through a [`ConfigProvider`]:
//!
//! ```toml
//! [Database]
//! Dialect = "postgres"
//! MaxLifetime = "210m"
//! Parameters = ["sslmode=disable"]
//!
//! [Database.Primary]
//! DBName = "app"
//! Host = "10.0.0.5"
//! ```

use std::fmt;
use std::time::Duration;

use crate::config::provider::ConfigProvider;

/// Path of the cluster read when no base is given.
pub const PRIMARY_PATH: &str = "Database.Primary";

/// Pool-wide settings plus the primary cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub dialect: String,
    pub log_mode: bool,

    /// Read/write separation between clusters.
    pub separation: bool,

    pub max_open_conns: i64,
    pub max_idle_conns: i64,
    pub max_lifetime: Duration,

    /// Extra driver parameters (`key=value`).
    pub parameters: Vec<String>,

    pub primary: Cluster,
}

/// Address and credentials of one cluster.
#[derive(Clone, PartialEq, Eq)]
pub struct Cluster {
    pub db_name: String,
    pub host: String,
    pub port: i64,
    pub username: String,
    pub password: String,
}

impl DatabaseConfig {
    /// Build from `provider`, reading the cluster under `base` (or
    /// [`PRIMARY_PATH`]).
    pub fn from_provider(provider: &ConfigProvider, base: Option<&str>) -> Self {
        Self {
            dialect: provider.get_string("Database.Dialect", &["postgres"]),
            log_mode: provider.get_bool("Database.LogMode", &[true]),
            separation: provider.get_bool("Database.Separation", &[true]),
            max_open_conns: provider.get_int("Database.MaxOpenConns", &[100]),
            max_idle_conns: provider.get_int("Database.MaxIdleConns", &[5]),
            max_lifetime: provider
                .get_duration("Database.MaxLifetime", &[Duration::from_secs(210 * 60)]),
            parameters: provider.get_list("Database.Parameters"),
            primary: Cluster::from_provider(provider, base.unwrap_or(PRIMARY_PATH)),
        }
    }
}

impl Cluster {
    pub fn from_provider(provider: &ConfigProvider, base: &str) -> Self {
        let key = |name: &str| format!("{base}.{name}");
        Self {
            db_name: provider.get_string(&key("DBName"), &[]),
            host: provider.get_string(&key("Host"), &[]),
            port: provider.get_int(&key("Port"), &[5432]),
            username: provider.get_string(&key("Username"), &[]),
            password: provider.get_string(&key("Password"), &[]),
        }
    }
}

// Password never reaches logs.
impl fmt::Debug for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cluster")
            .field("db_name", &self.db_name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_section_missing() {
        let config = DatabaseConfig::from_provider(&ConfigProvider::default(), None);
        assert_eq!(config.dialect, "postgres");
        assert!(config.log_mode);
        assert!(config.separation);
        assert_eq!(config.max_open_conns, 100);
        assert_eq!(config.max_idle_conns, 5);
        assert_eq!(config.max_lifetime, Duration::from_secs(12_600));
        assert!(config.parameters.is_empty());
        assert_eq!(config.primary.port, 5432);
        assert_eq!(config.primary.host, "");
    }

    #[test]
    fn test_reads_custom_cluster_path() {
        let provider: ConfigProvider = r#"
            [Database]
            Dialect = "mysql"
            LogMode = false
            MaxLifetime = "1h"
            Parameters = ["charset=utf8"]

            [Database.Replica]
            DBName = "app"
            Host = "replica.local"
            Port = 3306
            Password = "hunter2"
        "#
        .parse()
        .unwrap();

        let config = DatabaseConfig::from_provider(&provider, Some("Database.Replica"));
        assert_eq!(config.dialect, "mysql");
        assert!(!config.log_mode);
        assert_eq!(config.max_lifetime, Duration::from_secs(3600));
        assert_eq!(config.parameters, vec!["charset=utf8"]);
        assert_eq!(config.primary.host, "replica.local");
        assert_eq!(config.primary.port, 3306);
        assert_eq!(config.primary.password, "hunter2");
    }

    #[test]
    fn test_debug_hides_password() {
        let provider: ConfigProvider = "[Database.Primary]\nPassword = \"hunter2\""
            .parse()
            .unwrap();
        let config = DatabaseConfig::from_provider(&provider, None);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }
}
