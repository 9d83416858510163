//! # Hot Reload Module
//!
//! Watches the contract directory and rebuilds the registry snapshot when
//! documents change, without restarting the server.
//!
//! A failed reload keeps the previous snapshot serving: readers always see
//! a complete, consistent registry, and a temporarily invalid document
//! never takes the mock server down.

use crate::registry::SpecRegistry;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Watch `dir` for contract changes and reload the registry on each one.
///
/// The returned watcher must be kept alive for watching to continue. The
/// optional `default` name is re-applied on every reload so the configured
/// default survives document edits.
pub fn watch_dir(
    dir: impl AsRef<Path>,
    registry: Arc<SpecRegistry>,
    default: Option<String>,
) -> notify::Result<RecommendedWatcher> {
    let dir: PathBuf = dir.as_ref().to_path_buf();
    let watch_dir = dir.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) {
                    match registry.load_dir(&watch_dir, default.as_deref()) {
                        Ok(()) => {
                            info!(dir = %watch_dir.display(), "hot-reload: registry snapshot replaced");
                        }
                        Err(err) => {
                            warn!(
                                dir = %watch_dir.display(),
                                error = %err,
                                "hot-reload failed, previous snapshot stays live"
                            );
                        }
                    }
                }
            }
            Err(e) => warn!(error = %e, "spec watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
