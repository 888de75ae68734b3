use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug)]
pub enum FileEvent {
    /// The store slot changed on disk (another qa process wrote it).
    StoreChanged(PathBuf),
}

/// Watches the `qa/` directory for writes to the store slot.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl StoreWatcher {
    /// Start watching `qa_dir` for changes to `store_file`.
    /// Call `poll()` each tick to drain pending events.
    pub fn start(qa_dir: &Path, store_file: &str) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let store_path = qa_dir.join(store_file);
        let store_name = store_file.to_string();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                // Atomic writes land as a rename onto the slot name
                let touched = event.paths.iter().any(|p| {
                    p.file_name().and_then(|n| n.to_str()) == Some(store_name.as_str())
                });
                if touched {
                    let _ = tx.send(FileEvent::StoreChanged(store_path.clone()));
                }
            },
            Config::default(),
        )?;

        watcher.watch(qa_dir, RecursiveMode::NonRecursive)?;
        Ok(StoreWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll for pending file events.
    pub fn poll(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }
}
