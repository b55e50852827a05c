use redis::aio::ConnectionManager;

use crate::error::{Error, Result};

/// Configuration for the Redis connection
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis host
    pub host: String,

    /// Redis port
    pub port: u16,

    /// Database index
    pub db: i64,

    /// Optional password
    pub password: Option<String>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
            password: None,
        }
    }
}

impl RedisConfig {
    /// Create a new configuration from a connection URL
    ///
    /// # Example
    ///
    /// ```
    /// use redstream::RedisConfig;
    ///
    /// let config = RedisConfig::from_url("redis://:secret@redis-service:6380/2").unwrap();
    /// assert_eq!(config.host, "redis-service");
    /// assert_eq!(config.port, 6380);
    /// assert_eq!(config.db, 2);
    /// ```
    pub fn from_url(url: &str) -> Result<Self> {
        // Format: redis://[user:password@]host[:port][/db]
        let rest = url
            .strip_prefix("redis://")
            .ok_or_else(|| Error::Config("connection URL must start with redis://".to_string()))?;

        let (auth, location) = match rest.rsplit_once('@') {
            Some((auth, location)) => (Some(auth), location),
            None => (None, rest),
        };

        let password = match auth {
            Some(auth) => {
                let (_user, password) = auth.split_once(':').ok_or_else(|| {
                    Error::Config("credentials must be 'user:password' or ':password'".to_string())
                })?;
                if password.is_empty() {
                    None
                } else {
                    Some(password.to_string())
                }
            }
            None => None,
        };

        let (host_port, db) = match location.split_once('/') {
            Some((host_port, db)) if !db.is_empty() => {
                let db = db
                    .parse::<i64>()
                    .map_err(|_| Error::Config(format!("invalid database index '{}'", db)))?;
                (host_port, db)
            }
            Some((host_port, _)) => (host_port, 0),
            None => (location, 0),
        };

        let (host, port) = match host_port.split_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| Error::Config(format!("invalid port '{}'", port)))?;
                (host.to_string(), port)
            }
            None => (host_port.to_string(), 6379),
        };

        if host.is_empty() {
            return Err(Error::Config("connection URL is missing a host".to_string()));
        }

        Ok(Self {
            host,
            port,
            db,
            password,
        })
    }

    /// Render the configuration back into a connection URL
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                password, self.host, self.port, self.db
            ),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }

    /// Open a managed connection to the configured server
    ///
    /// The manager reconnects on connection loss; clones share the
    /// underlying connection.
    pub(crate) async fn build_manager(&self) -> Result<ConnectionManager> {
        let client =
            redis::Client::open(self.url()).map_err(|e| Error::Config(e.to_string()))?;

        ConnectionManager::new(client)
            .await
            .map_err(|e| Error::Connection(e.to_string()))
    }
}
