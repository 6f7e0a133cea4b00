use anyhow::Result;
use calc_core::{ArithmeticService, Key, Snapshot, spawn_session};
use std::sync::Arc;
use tracing::debug;

/// Replay `keys` against a fresh session and print where it ends up.
pub async fn press_command<S: ArithmeticService>(service: S, keys: Vec<Key>, json: bool) -> Result<()> {
    let snapshot = run_keys(service, &keys).await?;
    println!("{}", render(&snapshot, json)?);
    Ok(())
}

pub(crate) async fn run_keys<S: ArithmeticService>(service: S, keys: &[Key]) -> Result<Snapshot> {
    let session = spawn_session(Arc::new(service));
    let mut snapshot = session.snapshot().await?;
    for &key in keys {
        snapshot = session.press_settled(key).await?;
        debug!(%key, display = %snapshot.state.display, "pressed");
    }
    Ok(snapshot)
}

fn render(snapshot: &Snapshot, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(snapshot)?)
    } else {
        Ok(snapshot.state.display.clone())
    }
}
