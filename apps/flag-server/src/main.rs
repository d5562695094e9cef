use std::sync::Arc;

use flags::{router, FlagStore};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3030";

#[tokio::main]
async fn main() {
    env_logger::init();

    let bind_addr = std::env::var("FLAG_SERVER_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let store = Arc::new(FlagStore::new());
    let app = router(store);

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            // A bind failure is logged and non-fatal to any engine session
            // already running; this process has no engine to fall back to,
            // so it exits, but still avoids panicking.
            log::error!("failed to bind flag control plane on {bind_addr}: {err}");
            return;
        }
    };

    log::info!("flag control plane listening on {bind_addr}");
    if let Err(err) = axum::serve(listener, app).await {
        log::error!("flag control plane exited: {err}");
    }
}
