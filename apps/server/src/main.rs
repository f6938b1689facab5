#![warn(clippy::all, clippy::pedantic)]

use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use clap::Parser;
use siteping_service::config::Config;
use siteping_service::monitoring::{ResultsQuery, build_monitor};
use tokio_util::sync::CancellationToken;
use tracing::info;

mod error;
mod routes;

use error::AppError;
use logger::init_tracing;

/// Periodic reachability checks served over HTTP
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file, defaults to $XDG_CONFIG_HOME/siteping/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Bound on receiving a request's head and on keep-alive shutdown
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    init_tracing();
    let args = Args::parse();

    let mut config = Config::from_config(args.config.as_deref())?;
    config.apply_env_overrides();
    config.validate()?;
    info!("{config}");

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)?;

    let cancel = CancellationToken::new();
    let monitor = build_monitor(&config.monitor, cancel.clone())?;
    let monitoring = monitor.scheduler.start()?;

    info!("Starting HTTP check service on {addr}");
    let served = match build_server(listener, monitor.query, CLIENT_TIMEOUT) {
        Ok(server) => server.await.map_err(AppError::from),
        Err(e) => Err(e),
    };

    cancel.cancel();
    if let Err(e) = monitoring.await {
        tracing::error!("Monitoring task ended abnormally: {e}");
    }

    served
}

fn build_server(
    listener: TcpListener,
    query: ResultsQuery,
    client_timeout: Duration,
) -> Result<Server, AppError> {
    let query = web::Data::new(query);

    let server =
        HttpServer::new(move || App::new().app_data(query.clone()).configure(routes::routes))
            .client_request_timeout(client_timeout)
            .client_disconnect_timeout(client_timeout)
            .listen(listener)?
            .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteping_service::monitoring::ResultStore;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    #[actix_web::test]
    async fn test_stalled_request_head_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let query = ResultsQuery::new(Arc::new(ResultStore::new()));
        let server = build_server(listener, query, Duration::from_millis(200)).unwrap();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET /ping HTTP/1.1\r\n").await.unwrap();

        let mut response = Vec::new();
        tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
            .await
            .expect("server kept the stalled connection open")
            .unwrap();

        assert!(
            response.starts_with(b"HTTP/1.1 408"),
            "got {:?}",
            String::from_utf8_lossy(&response)
        );
        handle.stop(false).await;
    }
}
