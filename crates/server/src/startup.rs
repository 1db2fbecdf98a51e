use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, auth};
use service::auth::{repo::SeaOrmStore, AuthConfig, AuthService};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Router over an already-built service, used by `run` and by in-process tests.
pub fn build_app(auth: Arc<AuthService>, cfg: &AppConfig) -> Router {
    let state = auth::ServerState { auth, request_timeout: cfg.server.request_timeout() };
    routes::build_router(state, build_cors())
}

/// Connect, migrate and serve until `shutdown` resolves.
pub async fn run<S>(cfg: AppConfig, shutdown: S) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let addr = bind_addr(&cfg)?;

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(format!("migrations: {e}")))?;
    info!(event = "migrations_applied", "database schema up to date");

    let store = Arc::new(SeaOrmStore::new(db));
    let auth = Arc::new(AuthService::with_jwt(
        store.clone(),
        store,
        AuthConfig { token_ttl: cfg.token_ttl() },
    ));
    let app = build_app(auth, &cfg);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, env = %cfg.env, token_ttl_secs = cfg.token_ttl_secs, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!(event = "stopped", "server drained and stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_rejects_bad_host() {
        let mut cfg = configs::parse("token_ttl_secs = 60\n").unwrap();
        cfg.server.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }

    #[test]
    fn bind_addr_uses_configured_port() {
        let cfg = configs::parse("token_ttl_secs = 60\n[server]\nhost = \"127.0.0.1\"\nport = 5050\n").unwrap();
        assert_eq!(bind_addr(&cfg).unwrap().port(), 5050);
    }
}
