use std::sync::Arc;

use authproxy_core::interactors::{PolicyCascade, SessionCascade};
use authproxy_core::repository::{PoliciesRepository, ResourcesRepository, SessionsRepository};
use authproxy_core::validators::{PoliciesValidator, ResourcesValidator, SessionsValidator};
use authproxy_core::{Archiver, AuthEngine, PoliciesInteractor, ResourcesInteractor, SessionsInteractor};
use authproxy_server::{build_router, AppState, ServerConfig};
use authproxy_storage::Store;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let live = Store::open(&config.db_path, config.db_open_timeout).await?;
    let archive = Store::open(&config.archive_path, config.db_open_timeout).await?;

    let resources_repo = ResourcesRepository::new(live.clone());
    let policies_repo = PoliciesRepository::new(live.clone());
    let sessions_repo = SessionsRepository::new(live.clone());

    let sessions_validator = SessionsValidator::new(sessions_repo.clone(), policies_repo.clone());
    let sessions_interactor = Arc::new(SessionsInteractor::new(
        sessions_repo.clone(),
        sessions_validator,
        config.session_validity,
        config.session_token_length,
    ));

    let policies_validator = PoliciesValidator::new(policies_repo.clone(), resources_repo.clone());
    let policies_interactor = Arc::new(PoliciesInteractor::new(
        policies_repo.clone(),
        policies_validator,
        Arc::clone(&sessions_interactor) as Arc<dyn SessionCascade>,
    ));

    let resources_validator = ResourcesValidator::new(resources_repo.clone());
    let resources_interactor = Arc::new(ResourcesInteractor::new(
        resources_repo.clone(),
        resources_validator,
        Arc::clone(&policies_interactor) as Arc<dyn PolicyCascade>,
    ));

    let auth_engine = Arc::new(AuthEngine::new(resources_repo, sessions_repo, policies_repo));

    if let Some(seed_path) = &config.seed_config_path {
        info!(path = %seed_path.display(), "importing seed config");
        authproxy_server::seed::import(seed_path, &live, &resources_interactor, &policies_interactor).await?;
    }
    authproxy_server::seed::ensure_guest_policy(&policies_interactor).await?;

    let archiver = Archiver::new(live, archive);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let archiver_task = tokio::spawn(Arc::clone(&archiver).run(config.archive_sweep_interval, shutdown_rx));

    let state = AppState::new(resources_interactor, policies_interactor, sessions_interactor, auth_engine, &config);
    let router = build_router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    let _ = tokio::time::timeout(config.exit_timeout, archiver_task).await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("shutdown signal received");
}
