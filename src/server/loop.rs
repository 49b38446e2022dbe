// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config;
use crate::logger;

/// Accept connections on `listener` until `shutdown` is notified.
///
/// In-flight connections keep running on their own tasks inside the caller's
/// `LocalSet`; see `drain_connections`.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => {
                drop(listener);
                logger::log_shutdown(active_connections.load(Ordering::SeqCst));
                return;
            }
        }
    }
}

/// Wait until every accepted connection has finished, or `grace` elapses
pub async fn drain_connections(active_connections: &AtomicUsize, grace: Duration) {
    let deadline = tokio::time::Instant::now() + grace;
    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown grace period over, dropping {} connection(s)",
                active_connections.load(Ordering::SeqCst)
            ));
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::testing;
    use crate::server::create_reusable_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn roundtrip(addr: std::net::SocketAddr, request: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let dir = tempfile::TempDir::new().unwrap();
        let state = testing::state(dir.path());
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let local = tokio::task::LocalSet::new();
        let server = local.spawn_local(start_server_loop(
            listener,
            state,
            Arc::clone(&counter),
            Arc::clone(&shutdown),
        ));

        local
            .run_until(async {
                let form = "body=hello+world";
                let save = roundtrip(
                    addr,
                    &format!(
                        "POST /save/Greeting HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
                         Content-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{form}",
                        form.len()
                    ),
                )
                .await;
                assert!(save.starts_with("HTTP/1.1 302"), "{save}");
                assert!(save.contains("location: /view/Greeting"), "{save}");

                let view = roundtrip(
                    addr,
                    "GET /view/Greeting HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(view.starts_with("HTTP/1.1 200"), "{view}");
                assert!(view.contains("<div>hello world</div>"), "{view}");

                shutdown.notify_one();
                server.await.unwrap();
            })
            .await;

        assert!(std::fs::read(dir.path().join("Greeting.txt")).is_ok());
    }

    #[tokio::test]
    async fn test_drain_returns_when_idle() {
        let counter = AtomicUsize::new(0);
        drain_connections(&counter, Duration::from_secs(5)).await;
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_grace() {
        let counter = AtomicUsize::new(1);
        let started = tokio::time::Instant::now();
        drain_connections(&counter, Duration::from_millis(120)).await;
        assert!(started.elapsed() >= Duration::from_millis(120));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
