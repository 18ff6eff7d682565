//! Logging setup per deployment profile.
//!
//! | Profile | Format | Default level |
//! |---------|--------|---------------|
//! | `local` | text   | debug         |
//! | `dev`   | JSON   | debug         |
//! | `prod`  | text   | info          |
//!
//! `RUST_LOG` overrides the level when set.

use sso_api::config::Env;
use tracing_subscriber::EnvFilter;

pub type InitError = Box<dyn std::error::Error + Send + Sync>;

pub fn init(env: Env) -> Result<(), InitError> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive(env)))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match env {
        Env::Dev => builder.json().try_init(),
        Env::Local | Env::Prod => builder.try_init(),
    }
}

fn default_directive(env: Env) -> &'static str {
    match env {
        Env::Local | Env::Dev => "debug,sqlx=info,hyper=info",
        Env::Prod => "info",
    }
}
