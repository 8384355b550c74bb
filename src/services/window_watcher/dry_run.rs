use crate::config::Config;
use crate::error::Result;
use crate::events::{WindowEvent, WindowId, WindowInfo};
use crate::services::host::MemoryHost;
use crate::services::process_tree::StaticProcessTree;
use crate::services::swallow::SwallowCoordinator;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, Duration};
use tracing::info;

use super::r#trait::WindowWatcherTrait;

const TERMINAL: WindowId = WindowId(0x0100);
const PLAYER: WindowId = WindowId(0x0200);

/// Эмуляция: терминал (pid 100) запускает оболочку 150, та запускает плеер 160
pub struct DryRunWatcher {
    host: MemoryHost,
    coordinator: SwallowCoordinator,
}

impl DryRunWatcher {
    pub fn new(config: Arc<Config>) -> Self {
        let tree = StaticProcessTree::new()
            .with_parent(160, 150)
            .with_parent(150, 100)
            .with_parent(100, 1)
            .with_parent(1, 0);

        Self {
            host: MemoryHost::new(),
            coordinator: SwallowCoordinator::new(config.swallow.clone(), Box::new(tree)),
        }
    }

    fn scenario() -> Vec<WindowEvent> {
        let terminal = WindowInfo::new(TERMINAL, "st - dry_run".to_string())
            .with_class("St".to_string())
            .with_pid(100);
        let player = WindowInfo::new(PLAYER, "mpv - dry_run".to_string())
            .with_class("mpv".to_string())
            .with_pid(160);

        vec![
            WindowEvent::created(terminal.clone()),
            WindowEvent::created(player.clone()),
            WindowEvent::destroyed(player),
            WindowEvent::destroyed(terminal),
        ]
    }

    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!("Dry-run режим - WindowWatcher работает в режиме эмуляции");

        let scenario = Self::scenario();
        let mut step = 0;
        let mut interval = interval(Duration::from_secs(2));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let event = &scenario[step];
                    info!("Dry-run: эмулируем событие {}", event);
                    self.coordinator.handle_event(&mut self.host, event)?;
                    step = (step + 1) % scenario.len();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        let restored = self.coordinator.restore_all(&mut self.host);
        info!("Dry-run завершён, показано скрытых окон: {}", restored);
        Ok(())
    }
}

#[async_trait::async_trait]
impl WindowWatcherTrait for DryRunWatcher {
    async fn run(mut self: Box<Self>, shutdown: watch::Receiver<bool>) -> Result<()> {
        (*self).run(shutdown).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::host::WindowHost;

    #[test]
    fn scenario_swallows_and_restores_terminal() {
        let mut watcher = DryRunWatcher::new(Arc::new(Config::default()));

        let mut states = Vec::new();
        for event in DryRunWatcher::scenario() {
            watcher.coordinator.handle_event(&mut watcher.host, &event).unwrap();
            states.push(watcher.host.is_minimized(TERMINAL));
        }

        assert_eq!(states, vec![false, true, false, false]);
        assert_eq!(watcher.host.windows().count(), 0);
        assert_eq!(watcher.host.visibility_log(), &[(TERMINAL, true), (TERMINAL, false)]);
    }

    #[tokio::test]
    async fn stops_on_shutdown_signal() {
        let watcher = Box::new(DryRunWatcher::new(Arc::new(Config::default())));
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { WindowWatcherTrait::run(watcher, rx).await });
        tx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(matches!(result, Ok(Ok(Ok(())))));
    }
}
