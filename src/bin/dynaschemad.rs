use std::sync::Arc;

use arrrg::CommandLine;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use dynaschema::{
    AppState, DataStore, InMemoryDataStore, PostgresDataStore, ServerArgs, ServerConfig,
    cli_utils, create_router,
};

const HELP_TEXT: &str = r#"dynaschemad - Dynaschema daemon

USAGE:
    dynaschemad [OPTIONS]

OPTIONS:
    --host <HOST>            Host to bind the HTTP server [env: HOST, default: 127.0.0.1]
    --port <PORT>            Port to bind the HTTP server [env: PORT, default: 5000]
    --database-url <URL>     PostgreSQL database URL [env: DATABASE_URL, default: in memory]
    --max-depth <N>          Maximum schema nesting depth [env: DYNASCHEMA_MAX_DEPTH, default: 32]
    --verbose                Enable verbose logging

DESCRIPTION:
    Serves the schema and instance endpoints under /api/.

    Without a database URL all data is kept in memory and lost on exit. With one, pending
    migrations are applied at startup.

    Log output honours RUST_LOG. The server shuts down gracefully on Ctrl+C.

API ENDPOINTS:
    Schemas:
      GET    /api/schemas                   List all schemas
      POST   /api/schemas                   Create a schema
      GET    /api/schemas/{id}              Get a specific schema
      PUT    /api/schemas/{id}              Update a schema
      DELETE /api/schemas/{id}              Delete a schema and its instances

    Instances:
      GET    /api/schemas/{id}/instances        List instances of a schema
      POST   /api/schemas/{id}/instances        Create an instance
      GET    /api/schemas/{id}/instances/{iid}  Get a specific instance
      PUT    /api/schemas/{id}/instances/{iid}  Update an instance
      DELETE /api/schemas/{id}/instances/{iid}  Delete an instance"#;

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("dynaschema=debug,tower_http=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = ServerArgs::from_command_line("USAGE: dynaschemad [OPTIONS]");

    if !free.is_empty() && free[0] == "help" {
        println!("{}", HELP_TEXT);
        return Ok(());
    }

    let config = match ServerConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => cli_utils::exit_with_usage_error(&e.to_string(), "USAGE: dynaschemad [OPTIONS]"),
    };

    init_tracing(config.verbose);

    let store: Arc<dyn DataStore> = match &config.database_url {
        Some(url) => {
            tracing::info!("connecting to PostgreSQL");
            Arc::new(PostgresDataStore::connect(url).await?)
        }
        None => {
            tracing::warn!("no database URL configured; data is kept in memory");
            Arc::new(InMemoryDataStore::new())
        }
    };

    let state = AppState::new(store).with_limits(config.limits);
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!(
        %addr,
        max_depth = config.limits.max_depth,
        persistent = config.database_url.is_some(),
        "dynaschemad listening"
    );

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!(error = %e, "server error");
                std::process::exit(1);
            }
        }
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutdown signal received, stopping");
        }
    }

    Ok(())
}
