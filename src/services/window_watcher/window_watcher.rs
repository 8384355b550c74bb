use crate::config::Config;
use crate::error::Result;
use crate::events::{WindowEvent, WindowInfo};
use crate::services::host::wmctrl::WmctrlClient;
use crate::services::host::{WindowHost, WindowTable, X11Host};
use crate::services::process_tree::SysinfoProcessTree;
use crate::services::swallow::SwallowCoordinator;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::r#trait::WindowWatcherTrait;

pub struct RealWindowWatcher {
    config: Arc<Config>,
    host: X11Host,
    coordinator: SwallowCoordinator,
    wmctrl: WmctrlClient,
}

impl RealWindowWatcher {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        info!("Инициализация RealWindowWatcher (бэкенд: {})", config.host.backend);

        let coordinator = SwallowCoordinator::new(
            config.swallow.clone(),
            Box::new(SysinfoProcessTree::new()),
        );

        Ok(Self {
            config,
            host: X11Host::new(),
            coordinator,
            wmctrl: WmctrlClient::new(),
        })
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        self.wmctrl.test()?;
        self.adopt_existing()?;

        let period = Duration::from_millis(self.config.host.polling_interval_ms);
        info!("RealWindowWatcher запущен, опрос каждые {:?}", period);

        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.poll_once() {
                        warn!("Опрос списка окон не удался: {}", e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        let restored = self.coordinator.restore_all(&mut self.host);
        info!("RealWindowWatcher остановлен, показано скрытых окон: {}", restored);
        Ok(())
    }

    /// Окна, открытые до запуска, отслеживаются, но никого не проглатывают
    fn adopt_existing(&mut self) -> Result<()> {
        let windows = self.wmctrl.list_windows()?;
        let count = windows.len();
        for window in windows {
            self.host.insert(window);
        }
        info!("Отслеживается {} уже открытых окон", count);
        Ok(())
    }

    fn poll_once(&mut self) -> Result<()> {
        let current = self.wmctrl.list_windows()?;

        for event in diff_windows(self.host.table(), &current) {
            debug!("Событие окна: {}", event);
            if let Err(e) = self.coordinator.handle_event(&mut self.host, &event) {
                warn!("Не удалось обработать событие {}: {}", event, e);
            }
        }
        Ok(())
    }
}

/// Сравнить известные окна с текущим списком хоста.
/// Сначала идут закрытые окна, затем новые, каждая группа по возрастанию id.
pub fn diff_windows(known: &WindowTable, current: &[WindowInfo]) -> Vec<WindowEvent> {
    let current_ids: HashSet<_> = current.iter().map(|w| w.id).collect();

    let destroyed = known
        .iter()
        .filter(|w| !current_ids.contains(&w.id))
        .map(|w| WindowEvent::destroyed(w.clone()));

    let mut created: Vec<&WindowInfo> = current.iter().filter(|w| !known.contains(w.id)).collect();
    created.sort_by_key(|w| w.id);

    destroyed
        .chain(created.into_iter().map(|w| WindowEvent::created(w.clone())))
        .collect()
}

impl Drop for RealWindowWatcher {
    fn drop(&mut self) {
        info!("RealWindowWatcher завершает работу");
    }
}

#[async_trait::async_trait]
impl WindowWatcherTrait for RealWindowWatcher {
    async fn run(self: Box<Self>, shutdown: watch::Receiver<bool>) -> Result<()> {
        (*self).run(shutdown).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{WindowEventType, WindowId};

    fn window(id: u64, pid: u32) -> WindowInfo {
        WindowInfo::new(WindowId(id), format!("w{}", id)).with_pid(pid)
    }

    #[test]
    fn diff_reports_destroyed_before_created() {
        let mut known = WindowTable::new();
        known.insert(window(1, 100));
        known.insert(window(2, 160));

        let current = vec![window(3, 170), window(1, 100)];
        let events = diff_windows(&known, &current);

        let summary: Vec<_> = events.iter().map(|e| (e.event_type, e.window.id)).collect();
        assert_eq!(
            summary,
            vec![
                (WindowEventType::Destroyed, WindowId(2)),
                (WindowEventType::Created, WindowId(3)),
            ]
        );
    }

    #[test]
    fn diff_keeps_annotations_of_destroyed_window() {
        let mut known = WindowTable::new();
        let mut child = window(2, 160);
        child.parent = Some(WindowId(1));
        known.insert(child);

        let events = diff_windows(&known, &[]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].window.parent, Some(WindowId(1)));
    }

    #[test]
    fn diff_of_identical_lists_is_empty() {
        let mut known = WindowTable::new();
        known.insert(window(1, 100));
        assert!(diff_windows(&known, &[window(1, 100)]).is_empty());
    }
}
