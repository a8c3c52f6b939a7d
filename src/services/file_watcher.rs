//! File watcher for watch mode.
//!
//! Monitors a set of files (the source image, the parameter file) and
//! broadcasts a debounced event whenever any of them is written.

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::{BTreeSet, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Quiet period before a burst of writes is reported as one event
pub const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);

/// Event sent when watched files change
#[derive(Debug, Clone)]
pub struct FileChangeEvent {
    /// Paths that changed
    pub paths: Vec<PathBuf>,
}

/// File watcher over a fixed set of files
pub struct FileWatcher {
    sender: broadcast::Sender<FileChangeEvent>,
    /// Handle to the watcher (kept alive)
    _watcher: Option<RecommendedWatcher>,
    active: bool,
}

impl FileWatcher {
    /// Watch the given files. Must be called inside a tokio runtime.
    ///
    /// Editors often replace a file instead of writing it in place, so the
    /// parent directories are watched and events are filtered by file name.
    /// Files that do not exist yet are still watched by name.
    pub fn new(files: &[PathBuf]) -> Self {
        let (sender, _) = broadcast::channel(16);

        let (watcher, active) = if files.is_empty() {
            tracing::debug!("No files to watch, file watching disabled");
            (None, false)
        } else {
            match Self::start_watcher(files, sender.clone()) {
                Ok(watcher) => {
                    tracing::info!(files = ?files, "File watcher started");
                    (Some(watcher), true)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to start file watcher");
                    (None, false)
                }
            }
        };

        Self {
            sender,
            _watcher: watcher,
            active,
        }
    }

    fn start_watcher(
        files: &[PathBuf],
        sender: broadcast::Sender<FileChangeEvent>,
    ) -> Result<RecommendedWatcher, notify::Error> {
        let names: HashSet<OsString> = files
            .iter()
            .filter_map(|f| f.file_name().map(|n| n.to_os_string()))
            .collect();
        let dirs: BTreeSet<PathBuf> = files.iter().map(|f| watch_dir(f)).collect();

        let (tx, rx) = mpsc::channel::<PathBuf>(100);
        tokio::spawn(debounce(rx, sender));

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                let Ok(event) = res else { return };
                if event.kind.is_access() {
                    return;
                }
                for path in event.paths {
                    let watched = path
                        .file_name()
                        .map(|n| names.contains(n))
                        .unwrap_or(false);
                    if watched {
                        let _ = tx.blocking_send(path);
                    }
                }
            },
            Config::default(),
        )?;

        for dir in &dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }

        Ok(watcher)
    }

    /// Subscribe to file change events
    pub fn subscribe(&self) -> broadcast::Receiver<FileChangeEvent> {
        self.sender.subscribe()
    }

    /// Check if the watcher is active
    pub fn is_active(&self) -> bool {
        self.active
    }
}

fn watch_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Collect raw paths until the stream has been quiet for [`WATCH_DEBOUNCE`],
/// then broadcast them as one event.
async fn debounce(mut rx: mpsc::Receiver<PathBuf>, sender: broadcast::Sender<FileChangeEvent>) {
    while let Some(first) = rx.recv().await {
        let mut pending = BTreeSet::from([first]);
        loop {
            tokio::select! {
                _ = tokio::time::sleep(WATCH_DEBOUNCE) => break,
                next = rx.recv() => match next {
                    Some(path) => {
                        pending.insert(path);
                    }
                    None => break,
                },
            }
        }
        let paths: Vec<PathBuf> = pending.into_iter().collect();
        tracing::debug!(paths = ?paths, "Files changed (debounced)");
        let _ = sender.send(FileChangeEvent { paths });
    }
}
