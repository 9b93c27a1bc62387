//! Service Configuration
//!
//! Resolves command-line flags and environment variables into a `ServiceConfig`.
//! Flags win over environment variables, which win over the defaults.
//!
//! | flag           | environment                | default                        |
//! |----------------|----------------------------|--------------------------------|
//! | `--bind`       | `PORT` (port only)         | `0.0.0.0:3000`                 |
//! | `--backend`    | `ISSUE_BACKEND`            | `sqlite`                       |
//! | `--db`         | `ISSUE_DB_PATH`            | `./database/gitlab_issue.db`   |
//! | `--static-dir` | `ISSUE_STATIC_DIR`         | `public`                       |
//! |                | `FIREBASE_DATABASE_URL`    | required for `firebase`        |
//! |                | `FIREBASE_API_KEY`         | optional `auth` parameter      |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::ConfigError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_PATH: &str = "./database/gitlab_issue.db";
pub const DEFAULT_STATIC_DIR: &str = "public";

pub const USAGE: &str = "Usage: issue-service [--bind <addr:port>] \
[--backend sqlite|firebase|memory] [--db <path>] [--static-dir <dir>]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    Firebase,
    Memory,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(BackendKind::Sqlite),
            "firebase" => Ok(BackendKind::Firebase),
            "memory" => Ok(BackendKind::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FirebaseConfig {
    pub database_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub backend: BackendKind,
    pub db_path: PathBuf,
    pub static_dir: PathBuf,
    /// Present whenever `FIREBASE_DATABASE_URL` is set; required for the firebase backend.
    pub firebase: Option<FirebaseConfig>,
}

impl ServiceConfig {
    /// Resolve from the process arguments and environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::resolve(&args, |key| std::env::var(key).ok())
    }

    /// Resolve from explicit arguments (without the program name) and an environment lookup.
    pub fn resolve<E>(args: &[String], env: E) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let mut bind_addr: Option<SocketAddr> = None;
        let mut backend: Option<BackendKind> = None;
        let mut db_path: Option<PathBuf> = None;
        let mut static_dir: Option<PathBuf> = None;

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--bind" | "--backend" | "--db" | "--static-dir" => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))?;
                    match flag {
                        "--bind" => bind_addr = Some(parse_value(flag, value)?),
                        "--backend" => backend = Some(value.parse()?),
                        "--db" => db_path = Some(PathBuf::from(value)),
                        _ => static_dir = Some(PathBuf::from(value)),
                    }
                    i += 2;
                }
                _ => {
                    tracing::warn!("Ignoring unknown argument: {}", flag);
                    i += 1;
                }
            }
        }

        let bind_addr = match bind_addr {
            Some(addr) => addr,
            None => {
                let port = match env("PORT") {
                    Some(port) => parse_value("PORT", &port)?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)
            }
        };

        let backend = match backend {
            Some(backend) => backend,
            None => match env("ISSUE_BACKEND") {
                Some(value) => value.parse()?,
                None => BackendKind::Sqlite,
            },
        };

        let db_path = db_path
            .or_else(|| env("ISSUE_DB_PATH").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));
        let static_dir = static_dir
            .or_else(|| env("ISSUE_STATIC_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let firebase = env("FIREBASE_DATABASE_URL").map(|database_url| FirebaseConfig {
            database_url,
            api_key: env("FIREBASE_API_KEY"),
        });
        if backend == BackendKind::Firebase && firebase.is_none() {
            return Err(ConfigError::MissingFirebaseUrl);
        }

        Ok(Self {
            bind_addr,
            backend,
            db_path,
            static_dir,
            firebase,
        })
    }
}

fn parse_value<T: FromStr>(flag: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}
