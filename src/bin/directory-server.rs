use std::{env, net::SocketAddr, process::exit, sync::Arc};

use resdir::{
    clock::CLOCK_PERIOD,
    config,
    error::{DirectoryError, Result},
    interaction::LoggingNavigator,
    logging::init_logging,
    server::{make_router, PageTemplates},
    session::spawn_session,
    view::DirectoryView,
};
use tracing::{error, info};

async fn serve(config_path: Option<String>) -> Result<()> {
    let config = config::load(config_path.as_deref())?;
    let addr: SocketAddr = config.listen_addr.parse().map_err(|_| {
        DirectoryError::bad_input(format!("bad listen_addr: {}", config.listen_addr))
    })?;

    let templates = Arc::new(PageTemplates::new(config.page)?);
    let view = DirectoryView::new(
        config.catalog,
        Box::new(LoggingNavigator),
        config.view_options,
    );
    let (session, session_task) = spawn_session(view, Some(CLOCK_PERIOD));

    let app = make_router(session.clone(), templates);

    info!(%addr, "listening");
    let served = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await;

    session.shutdown().await;
    let _ = session_task.await;

    served.map_err(|err| DirectoryError::server_problem(format!("server failed: {}", err)))
}

/// Usage: `directory-server [config.json]`.
#[tokio::main]
async fn main() {
    init_logging();

    if let Err(err) = serve(env::args().nth(1)).await {
        error!(%err, "directory-server failed");
        eprintln!("{}", err);
        exit(1);
    }
}
