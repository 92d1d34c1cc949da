use crate::events::AppEvent;
use crate::sys::{server, watcher};
use async_channel::Sender;
use std::thread;

/// Runs the control socket and the config watcher on a tokio runtime owned by a dedicated
/// thread. Both only talk to the UI loop through `tx`.
pub fn start_background_services(tx: Sender<AppEvent>) {
    let spawned = thread::Builder::new()
        .name("ruler-services".into())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create Tokio runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async move {
                let config_tx = tx.clone();
                tokio::join!(server::run_server(tx), async move {
                    if let Err(e) = watcher::watch_config(config_tx).await {
                        log::error!("Config watcher stopped: {}", e);
                    }
                });
            });
        });

    if let Err(e) = spawned {
        log::error!("Failed to start background services: {}", e);
    }
}
