use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;
use validator::{Validate, ValidationErrors};

use super::{Auth, Database, Logging, ParseError};
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport};

#[derive(Debug, Deserialize)]
pub struct Server {
    /// **Environment variables**: `HELPDESK_IP`
    #[serde(default = "Server::default_ip")]
    pub ip: IpAddr,
    /// **Environment variables**: `HELPDESK_PORT` or `PORT`
    #[serde(default = "Server::default_port")]
    pub port: u16,
    /// Amount of HTTP workers. Picks a value based on the
    /// available CPU cores if not set.
    ///
    /// **Environment variables**: `HELPDESK_WORKERS`
    #[serde(default)]
    pub workers: Option<NonZeroUsize>,
    pub db: Database,
    pub auth: Auth,
    #[serde(default)]
    pub logging: Logging,
}

impl Validate for Server {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.db.check(&mut errors);
        self.auth.check(&mut errors);

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Server {
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment()
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config
            .validate()
            .into_validator_report()
            .change_context(ParseError)?;

        Ok(config)
    }
}

impl Server {
    const CONFIG_FILE_ENV: &'static str = "HELPDESK_CONFIG";
    const DEFAULT_CONFIG_FILE: &'static str = "helpdesk.toml";

    const DEFAULT_PORT: u16 = 8080;

    const fn default_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    }

    const fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    /// Creates a default [`Figment`] object to load server
    /// configuration. This function is there for implementing
    /// [`Server::load`] and testing.
    ///
    /// [`Figment`]: figment::Figment
    pub(crate) fn figment() -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        let file = std::env::var(Self::CONFIG_FILE_ENV)
            .unwrap_or_else(|_| Self::DEFAULT_CONFIG_FILE.to_string());

        Figment::new()
            .merge(Toml::file(file))
            // Environment variable aliases
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL", "JWT_SECRET", "PORT"])
                    .map(|v| match v.as_str().to_ascii_lowercase().as_str() {
                        "database_url" => "db.url".into(),
                        "jwt_secret" => "auth.jwt_secret".into(),
                        _ => v.into(),
                    }),
            )
            // Fields with underscores in them make splitting on `_`
            // useless, so only the section prefix is turned into a dot.
            .merge(Env::prefixed("HELPDESK_").map(|v| map_env_key(v.as_str()).into()))
    }
}

fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ["db", "auth", "logging"] {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingStyle;
    use crate::util::validation::describe;
    use figment::Jail;
    use std::num::{NonZeroU32, NonZeroU64};

    #[test]
    fn test_map_env_key() {
        assert_eq!(map_env_key("DB_POOL_SIZE"), "db.pool_size");
        assert_eq!(map_env_key("AUTH_TOKEN_TTL_SECS"), "auth.token_ttl_secs");
        assert_eq!(map_env_key("LOGGING_STYLE"), "logging.style");
        assert_eq!(map_env_key("PORT"), "port");
        assert_eq!(map_env_key("DBX"), "dbx");
    }

    #[test]
    fn env_aliases() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("DATABASE_URL", "postgres://localhost/helpdesk");
            jail.set_env("JWT_SECRET", "a very secret key");
            jail.set_env("PORT", "3000");

            jail.set_env("HELPDESK_DB_MIN_IDLE", "2");
            jail.set_env("HELPDESK_DB_POOL_SIZE", "100");
            jail.set_env("HELPDESK_DB_ENFORCE_TLS", "true");
            jail.set_env("HELPDESK_DB_TIMEOUT_SECS", "3030");
            jail.set_env("HELPDESK_AUTH_TOKEN_TTL_SECS", "60");
            jail.set_env("HELPDESK_LOGGING_STYLE", "json");

            let config: Server = Server::figment().extract()?;
            assert_eq!(config.db.url.as_str(), "postgres://localhost/helpdesk");
            assert_eq!(config.auth.jwt_secret.as_str(), "a very secret key");
            assert_eq!(config.port, 3000);

            assert_eq!(config.db.min_idle, NonZeroU32::new(2));
            assert_eq!(config.db.pool_size, NonZeroU32::new(100).unwrap());
            assert!(config.db.enforce_tls);
            assert_eq!(config.db.timeout_secs, NonZeroU64::new(3030).unwrap());
            assert_eq!(config.auth.token_ttl_secs, NonZeroU64::new(60).unwrap());
            assert_eq!(config.logging.style, LoggingStyle::JSON);

            Ok(())
        });
    }

    #[test]
    fn prefixed_env_overrides_aliases() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("DATABASE_URL", "postgres://alias/helpdesk");
            jail.set_env("HELPDESK_DB_URL", "postgres://prefixed/helpdesk");
            jail.set_env("HELPDESK_AUTH_JWT_SECRET", "a very secret key");
            jail.set_env("PORT", "3000");
            jail.set_env("HELPDESK_PORT", "4000");

            let config: Server = Server::figment().extract()?;
            assert_eq!(config.db.url.as_str(), "postgres://prefixed/helpdesk");
            assert_eq!(config.port, 4000);

            Ok(())
        });
    }

    #[test]
    fn defaults_and_config_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "helpdesk.toml",
                r#"
                port = 9000

                [db]
                url = "postgres://file/helpdesk"

                [auth]
                jwt_secret = "a very secret key"
                "#,
            )?;

            let config: Server = Server::figment().extract()?;
            assert_eq!(config.port, 9000);
            assert_eq!(config.db.url.as_str(), "postgres://file/helpdesk");
            assert_eq!(config.db.pool_size, NonZeroU32::new(5).unwrap());
            assert!(config.db.run_migrations);
            assert!(!config.db.enforce_tls);
            assert_eq!(config.auth.token_ttl().as_secs(), 86_400);
            assert_eq!(config.logging.style, LoggingStyle::Full);
            assert!(config.workers.is_none());

            Ok(())
        });
    }

    #[test]
    fn should_reject_invalid_values() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("DATABASE_URL", "not a url");
            jail.set_env("JWT_SECRET", "short");

            let config: Server = Server::figment().extract()?;
            let errors = describe(&config.validate().unwrap_err());
            assert!(errors.contains("db.url: Invalid Postgres connection URL"), "{errors}");
            assert!(errors.contains("auth.jwt_secret: Invalid JWT secret key"), "{errors}");

            assert!(Server::load().is_err());

            Ok(())
        });
    }
}
