use crate::config::{self, Config, ConfigError};
use crate::events::AppEvent;
use async_channel::Sender;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::Path;

/// Watches the config file and sends every valid, changed revision to the UI loop.
///
/// Parsing happens here so the UI thread only ever sees a validated [`Config`]. Invalid edits
/// are logged and skipped; the ruler keeps its current configuration.
pub async fn watch_config(tx: Sender<AppEvent>) -> Result<(), ConfigError> {
    let path = config::config_path()?;
    let dir = path.parent().ok_or(ConfigError::ConfigDirNotFound)?;
    fs_err::create_dir_all(dir)?;

    let (fs_tx, fs_rx) = async_channel::unbounded();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = fs_tx.send_blocking(res);
    })?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    log::debug!("watching {}", path.display());

    let mut current = None;
    while let Ok(res) = fs_rx.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                log::error!("Watch error: {}", ConfigError::from(e));
                continue;
            }
        };
        if !touches_config(&event, &path) {
            continue;
        }
        if let Some(config) = reload(&path, &mut current)
            && tx.send(AppEvent::ConfigReload(Box::new(config))).await.is_err()
        {
            break;
        }
    }
    Ok(())
}

fn touches_config(event: &Event, path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == path)
}

/// Loads `path`, returning the config only when it differs from the last one sent. Editors
/// tend to fire several events per save.
fn reload(path: &Path, current: &mut Option<Config>) -> Option<Config> {
    match config::load_config_from(path) {
        Ok(config) if current.as_ref() == Some(&config) => None,
        Ok(config) => {
            *current = Some(config.clone());
            Some(config)
        }
        Err(e) => {
            log::error!("Ignoring invalid config: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use std::path::PathBuf;

    #[test]
    fn test_only_changes_to_the_config_file_count() {
        let path = PathBuf::from("/home/user/.config/scale-ruler/config.toml");
        let other = PathBuf::from("/home/user/.config/scale-ruler/config.toml~");

        let modified = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(path.clone());
        let created = Event::new(EventKind::Create(CreateKind::File)).add_path(path.clone());
        let read = Event::new(EventKind::Access(AccessKind::Any)).add_path(path.clone());
        let backup = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(other);

        assert!(touches_config(&modified, &path));
        assert!(touches_config(&created, &path));
        assert!(!touches_config(&read, &path));
        assert!(!touches_config(&backup, &path));
    }

    #[test]
    fn test_unchanged_config_is_not_resent() {
        let path = std::env::temp_dir().join("scale-ruler-watch-missing/config.toml");
        let mut current = None;
        assert!(reload(&path, &mut current).is_some());
        assert!(current.is_some());
        assert!(reload(&path, &mut current).is_none());
    }
}
