use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerFileConfig;

/// Run the HTTP arithmetic backend until Ctrl-C.
pub async fn serve_command(server: &ServerFileConfig) -> Result<()> {
    let bind = format!("{}:{}", server.host, server.port);
    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    let addr = listener.local_addr()?;

    // Scripts (and port 0 users) read the real address from stdout.
    println!("CALC_ADDR={addr}");
    info!(%addr, "arithmetic backend listening");

    arithmetic_backend::serve(listener, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutting down");
    })
    .await
}
