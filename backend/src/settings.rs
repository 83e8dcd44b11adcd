//! Server configuration loaded via OrthoConfig.
//!
//! Values come from command-line flags, `TICKETING_*` environment variables
//! and configuration files, in that order of precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Settings that cannot be turned into a running server.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("database_url is required (set TICKETING_DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("a JWT secret is required (set TICKETING_JWT_SECRET or TICKETING_JWT_SECRET_FILE)")]
    MissingJwtSecret,
    #[error("failed to read JWT secret from {path}: {source}")]
    JwtSecretFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid host address {host:?}")]
    InvalidHost { host: String },
}

/// HTTP server, database and token settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TICKETING")]
pub struct ServerSettings {
    /// Address to bind (default `0.0.0.0`).
    pub host: Option<String>,
    /// Port to bind (default 8080).
    pub port: Option<u16>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// HS256 secret shared with the identity service.
    pub jwt_secret: Option<String>,
    /// File holding the secret; used when `jwt_secret` is unset.
    pub jwt_secret_file: Option<PathBuf>,
    /// Maximum pooled connections (default 10).
    pub pool_max_size: Option<u32>,
    /// Apply pending migrations on startup (default true).
    pub run_migrations: Option<bool>,
}

impl ServerSettings {
    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip = match self.host.as_deref().map(str::trim) {
            None | Some("") => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Some(host) => host.parse().map_err(|_| SettingsError::InvalidHost {
                host: host.to_owned(),
            })?,
        };
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Whether pending migrations run before the server starts.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Token secret, from the inline value or the secret file.
    pub fn jwt_secret(&self) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        if let Some(secret) = self.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
            return Ok(Zeroizing::new(secret.as_bytes().to_vec()));
        }
        let path = self
            .jwt_secret_file
            .as_ref()
            .ok_or(SettingsError::MissingJwtSecret)?;
        let contents = std::fs::read(path).map_err(|source| SettingsError::JwtSecretFile {
            path: path.clone(),
            source,
        })?;
        let trimmed = contents.trim_ascii_end();
        if trimmed.is_empty() {
            return Err(SettingsError::MissingJwtSecret);
        }
        Ok(Zeroizing::new(trimmed.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::io::Write;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "TICKETING_HOST",
        "TICKETING_PORT",
        "TICKETING_DATABASE_URL",
        "TICKETING_JWT_SECRET",
        "TICKETING_JWT_SECRET_FILE",
        "TICKETING_POOL_MAX_SIZE",
        "TICKETING_RUN_MIGRATIONS",
    ];

    fn load() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("ticketing-backend")])
            .expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(cleared());
        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert_eq!(settings.pool_max_size(), 10);
        assert!(settings.run_migrations());
        assert!(matches!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        ));
        assert!(matches!(
            settings.jwt_secret(),
            Err(SettingsError::MissingJwtSecret)
        ));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let vars = [
            ("TICKETING_HOST", Some("127.0.0.1".to_owned())),
            ("TICKETING_PORT", Some("9090".to_owned())),
            ("TICKETING_DATABASE_URL", Some("postgres://db/ticketing".to_owned())),
            ("TICKETING_JWT_SECRET", Some("s3cret".to_owned())),
            ("TICKETING_JWT_SECRET_FILE", None),
            ("TICKETING_POOL_MAX_SIZE", Some("4".to_owned())),
            ("TICKETING_RUN_MIGRATIONS", Some("false".to_owned())),
        ];
        let _guard = lock_env(vars);
        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("address"),
            SocketAddr::from(([127, 0, 0, 1], 9090))
        );
        assert_eq!(settings.database_url().expect("url"), "postgres://db/ticketing");
        assert_eq!(settings.jwt_secret().expect("secret").as_slice(), b"s3cret");
        assert_eq!(settings.pool_max_size(), 4);
        assert!(!settings.run_migrations());
    }

    #[rstest]
    fn secret_file_is_read_without_trailing_newline() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "from-file").expect("write secret");
        let settings = ServerSettings {
            host: None,
            port: None,
            database_url: None,
            jwt_secret: None,
            jwt_secret_file: Some(file.path().to_path_buf()),
            pool_max_size: None,
            run_migrations: None,
        };
        assert_eq!(settings.jwt_secret().expect("secret").as_slice(), b"from-file");
    }

    #[rstest]
    fn rejects_unparseable_hosts() {
        let settings = ServerSettings {
            host: Some("not a host".into()),
            port: None,
            database_url: None,
            jwt_secret: None,
            jwt_secret_file: None,
            pool_max_size: None,
            run_migrations: None,
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidHost { .. })
        ));
    }
}
