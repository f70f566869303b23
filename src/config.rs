use crate::error::{BadEnvVarSnafu, ParseNumberSnafu, ParsePortSnafu, RosterResult, UnknownStoreSnafu};
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::sync::Arc;

const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 15;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_ip: String,
    store: StoreConfig,
}

/// Which backend the student repository runs on.
#[derive(Clone, Debug)]
pub enum StoreConfig {
    Postgres(Arc<DbConfig>),
    Memory,
}

impl RuntimeConfiguration {
    pub fn new() -> RosterResult<Self> {
        let server_ip = var("ROSTER_SERVER_IP").unwrap_or_else(|_| DEFAULT_SERVER_IP.to_string());

        let store = match var("ROSTER_STORE").ok().as_deref() {
            None | Some("postgres") => StoreConfig::Postgres(Arc::new(DbConfig::new()?)),
            Some("memory") => StoreConfig::Memory,
            Some(found) => return UnknownStoreSnafu { found }.fail(),
        };

        Ok(Self { server_ip, store })
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }

    pub const fn store(&self) -> &StoreConfig {
        &self.store
    }
}

#[derive(Debug)]
pub struct DbConfig {
    user: String,
    password: SecretString,
    path: String,
    port: u16,
    database: String,
    max_connections: u32,
}

impl DbConfig {
    pub fn new() -> RosterResult<Self> {
        let get_env_var = |name| var(name).context(BadEnvVarSnafu { name });

        let max_connections = match var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .context(ParseNumberSnafu { original: raw.clone() })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            user: get_env_var("DB_USER")?,
            password: SecretString::from(get_env_var("DB_PASSWORD")?),
            path: get_env_var("DB_PATH")?,
            port: get_env_var("DB_PORT")?.parse().context(ParsePortSnafu)?,
            database: get_env_var("DB_NAME")?,
            max_connections,
        })
    }

    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    pub fn get_db_path(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.path,
            self.port,
            self.database
        )
    }
}
