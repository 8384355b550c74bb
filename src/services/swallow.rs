//! Window swallowing: hide a launcher window while a program it spawned has
//! its own window open, and show the launcher again when that window closes.
//!
//! Both handlers run to completion on the caller's thread. The only state
//! threaded between them is the `parent` annotation on the child window.

use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::rules::{self, SwallowConfig};
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{WindowEvent, WindowEventType, WindowId};
use crate::services::host::WindowHost;
use crate::services::process_tree::{ParentLookup, ProcessTree};

/// Сколько предков процесса проверяется при поиске родительского окна
pub const MAX_ANCESTOR_DEPTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwallowOutcome {
    /// Предок на глубине `depth` владеет окном `parent`; оно скрыто
    Swallowed { parent: WindowId, depth: usize },
    /// Ни один из `MAX_ANCESTOR_DEPTH` предков не владеет окном
    NoMatch,
    /// Цепочка предков оборвалась на шаге `depth` (корень или процесс исчез)
    AncestryEnded { depth: usize },
    /// Окно неизвестно хосту или не сообщило pid
    NoPid,
    /// У окна уже записан родитель
    AlreadySwallowed,
    /// Окно попало под `swallow.ignore`
    Ignored,
    /// Проглатывание выключено в конфигурации
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnswallowOutcome {
    Restored(WindowId),
    NotSwallowed,
    /// Родитель закрылся раньше ребёнка; показывать нечего
    ParentVanished(WindowId),
}

/// Результат обхода предков
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AncestorWalk {
    Matched { window: WindowId, depth: usize },
    Ended { depth: usize },
    Exhausted,
}

/// Индекс pid -> окно по текущему набору окон.
///
/// Строится заново на каждое событие. Если у нескольких окон один pid,
/// побеждает окно с меньшим идентификатором.
pub fn pid_index<H: WindowHost + ?Sized>(host: &H, exclude: WindowId) -> HashMap<u32, WindowId> {
    let mut index = HashMap::new();
    for window in host.windows() {
        if window.id == exclude {
            continue;
        }
        if let Some(pid) = window.pid {
            index.entry(pid).or_insert(window.id);
        }
    }
    index
}

/// Подняться по родителям `pid` не дальше `MAX_ANCESTOR_DEPTH` шагов и найти
/// первого предка, владеющего окном из `index`.
pub fn walk_ancestors(
    tree: &dyn ProcessTree,
    index: &HashMap<u32, WindowId>,
    pid: u32,
) -> AncestorWalk {
    let mut chain: SmallVec<[u32; MAX_ANCESTOR_DEPTH]> = SmallVec::new();
    let mut current = pid;

    for depth in 1..=MAX_ANCESTOR_DEPTH {
        let ppid = match tree.parent_of(current) {
            ParentLookup::Found(ppid) => ppid,
            ParentLookup::Root | ParentLookup::Gone => {
                debug_if_enabled!("Цепочка предков {} оборвалась: {:?}", pid, chain);
                return AncestorWalk::Ended { depth };
            }
        };
        chain.push(ppid);

        if let Some(&window) = index.get(&ppid) {
            debug_if_enabled!("Предки {}: {:?} -> окно {}", pid, chain, window);
            return AncestorWalk::Matched { window, depth };
        }
        current = ppid;
    }

    debug_if_enabled!("Предки {}: {:?}, совпадений нет", pid, chain);
    AncestorWalk::Exhausted
}

pub struct SwallowCoordinator {
    config: SwallowConfig,
    process_tree: Box<dyn ProcessTree>,
}

impl SwallowCoordinator {
    pub fn new(config: SwallowConfig, process_tree: Box<dyn ProcessTree>) -> Self {
        Self {
            config,
            process_tree,
        }
    }

    /// Доставить событие хоста: создание регистрирует окно и ищет родителя,
    /// уничтожение восстанавливает родителя и удаляет окно.
    pub fn handle_event<H: WindowHost + ?Sized>(&self, host: &mut H, event: &WindowEvent) -> Result<()> {
        let id = event.window.id;
        match event.event_type {
            WindowEventType::Created => {
                host.insert(event.window.clone());
                let outcome = self.on_window_created(host, id)?;
                debug!("Окно {} создано: {:?}", event.window, outcome);
            }
            WindowEventType::Destroyed => {
                let outcome = self.on_window_destroyed(host, id)?;
                host.remove(id);
                debug!("Окно {} закрыто: {:?}", event.window, outcome);
            }
        }
        Ok(())
    }

    pub fn on_window_created<H: WindowHost + ?Sized>(&self, host: &mut H, id: WindowId) -> Result<SwallowOutcome> {
        if !self.config.enabled {
            return Ok(SwallowOutcome::Disabled);
        }

        let Some(window) = host.window(id) else {
            return Ok(SwallowOutcome::NoPid);
        };
        if window.parent.is_some() {
            return Ok(SwallowOutcome::AlreadySwallowed);
        }
        if rules::matches_any(&self.config.ignore, window) {
            debug!("Окно {} в списке исключений", window);
            return Ok(SwallowOutcome::Ignored);
        }
        let Some(pid) = window.pid else {
            return Ok(SwallowOutcome::NoPid);
        };

        let index = pid_index(&*host, id);
        let (parent, depth) = match walk_ancestors(self.process_tree.as_ref(), &index, pid) {
            AncestorWalk::Matched { window, depth } => (window, depth),
            AncestorWalk::Ended { depth } => return Ok(SwallowOutcome::AncestryEnded { depth }),
            AncestorWalk::Exhausted => return Ok(SwallowOutcome::NoMatch),
        };

        host.set_parent(id, Some(parent))?;
        if let Err(e) = host.set_minimized(parent, true) {
            // Не оставляем связь без скрытого родителя
            host.set_parent(id, None)?;
            return Err(e);
        }

        info!("Окно {} проглотило {} (глубина {})", id, parent, depth);
        Ok(SwallowOutcome::Swallowed { parent, depth })
    }

    pub fn on_window_destroyed<H: WindowHost + ?Sized>(&self, host: &mut H, id: WindowId) -> Result<UnswallowOutcome> {
        // Закрывшийся родитель: дети больше не должны на него ссылаться
        for child in host.children_of(id) {
            host.set_parent(child, None)?;
            debug!("Связь {} -> {} снята: родитель закрыт", child, id);
        }

        let Some(parent) = host.window(id).and_then(|w| w.parent) else {
            return Ok(UnswallowOutcome::NotSwallowed);
        };

        if host.window(parent).is_none() {
            host.set_parent(id, None)?;
            warn!("Родитель {} окна {} уже закрыт", parent, id);
            return Ok(UnswallowOutcome::ParentVanished(parent));
        }

        // Связь снимается только после того, как родитель снова виден
        host.set_minimized(parent, false)?;
        host.set_parent(id, None)?;
        info!("Окно {} закрыто, {} снова видно", id, parent);
        Ok(UnswallowOutcome::Restored(parent))
    }

    /// Показать всех скрытых родителей и снять все связи. Вызывается при остановке.
    pub fn restore_all<H: WindowHost + ?Sized>(&self, host: &mut H) -> usize {
        let relations: Vec<(WindowId, WindowId)> = host
            .windows()
            .filter_map(|w| w.parent.map(|parent| (w.id, parent)))
            .collect();

        let mut restored = 0;
        for (child, parent) in relations {
            let hidden = host.window(parent).is_some_and(|w| w.minimized);
            if hidden {
                if let Err(e) = host.set_minimized(parent, false) {
                    // Связь остаётся, следующий вызов попробует снова
                    warn!("Не удалось показать окно {}: {}", parent, e);
                    continue;
                }
                restored += 1;
            }
            if let Err(e) = host.set_parent(child, None) {
                warn!("Не удалось снять связь {} -> {}: {}", child, parent, e);
            }
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::rules::WindowMatch;
    use crate::error::TilercError;
    use crate::events::WindowInfo;
    use crate::services::host::MemoryHost;
    use crate::services::process_tree::StaticProcessTree;

    const TERMINAL: WindowId = WindowId(1);
    const CHILD: WindowId = WindowId(2);

    fn window(id: WindowId, title: &str, pid: u32) -> WindowInfo {
        WindowInfo::new(id, title.to_string()).with_pid(pid)
    }

    /// Терминал A (pid 100) -> 150 -> 160, окно B принадлежит 160
    fn example_tree() -> StaticProcessTree {
        StaticProcessTree::new()
            .with_parent(160, 150)
            .with_parent(150, 100)
            .with_parent(100, 1)
            .with_parent(1, 0)
    }

    fn coordinator(tree: StaticProcessTree) -> SwallowCoordinator {
        SwallowCoordinator::new(SwallowConfig::default(), Box::new(tree))
    }

    fn host_with_terminal() -> MemoryHost {
        MemoryHost::new().with_window(window(TERMINAL, "st", 100))
    }

    /// Хост, у которого первые `hide_failures` скрытий и `show_failures`
    /// показов заканчиваются ошибкой, как у упавшего xdotool
    struct FailingHost {
        inner: MemoryHost,
        hide_failures: usize,
        show_failures: usize,
    }

    impl FailingHost {
        fn new(inner: MemoryHost) -> Self {
            Self {
                inner,
                hide_failures: 0,
                show_failures: 0,
            }
        }
    }

    impl WindowHost for FailingHost {
        fn window(&self, id: WindowId) -> Option<&WindowInfo> {
            self.inner.window(id)
        }

        fn windows(&self) -> Box<dyn Iterator<Item = &WindowInfo> + '_> {
            self.inner.windows()
        }

        fn insert(&mut self, window: WindowInfo) {
            self.inner.insert(window);
        }

        fn remove(&mut self, id: WindowId) -> Option<WindowInfo> {
            self.inner.remove(id)
        }

        fn set_minimized(&mut self, id: WindowId, minimized: bool) -> Result<()> {
            let failures = if minimized {
                &mut self.hide_failures
            } else {
                &mut self.show_failures
            };
            if *failures > 0 {
                *failures -= 1;
                return Err(crate::tilerc_error!(host, "xdotool вернул ошибку для {}", id));
            }
            self.inner.set_minimized(id, minimized)
        }

        fn set_parent(&mut self, id: WindowId, parent: Option<WindowId>) -> Result<Option<WindowId>> {
            self.inner.set_parent(id, parent)
        }
    }

    /// Цепочка 1000 -> 1001 -> ... -> 1000+depth, где 1000+depth владеет терминалом
    fn chain_tree(depth: u32) -> StaticProcessTree {
        let mut tree = StaticProcessTree::new();
        for i in 0..depth {
            tree = tree.with_parent(1000 + i, 1000 + i + 1);
        }
        tree.with_parent(1000 + depth, 1).with_parent(1, 0)
    }

    #[test]
    fn player_from_terminal_swallow_and_restore() {
        let coordinator = coordinator(example_tree());
        let mut host = host_with_terminal();

        coordinator
            .handle_event(&mut host, &WindowEvent::created(window(CHILD, "mpv", 160)))
            .unwrap();

        assert!(host.is_minimized(TERMINAL));
        assert_eq!(host.parent_of(CHILD), Some(TERMINAL));
        assert_eq!(host.visibility_log(), &[(TERMINAL, true)]);

        coordinator
            .handle_event(&mut host, &WindowEvent::destroyed(window(CHILD, "mpv", 160)))
            .unwrap();

        assert!(!host.is_minimized(TERMINAL));
        assert!(host.window(CHILD).is_none());
        assert_eq!(host.visibility_log(), &[(TERMINAL, true), (TERMINAL, false)]);
    }

    #[test]
    fn immediate_parent_is_depth_one() {
        let coordinator = coordinator(StaticProcessTree::new().with_parent(200, 100));
        let mut host = host_with_terminal().with_window(window(CHILD, "zathura", 200));

        let outcome = coordinator.on_window_created(&mut host, CHILD).unwrap();
        assert_eq!(outcome, SwallowOutcome::Swallowed { parent: TERMINAL, depth: 1 });
        assert_eq!(host.visibility_log().len(), 1);
    }

    #[test]
    fn match_within_max_depth_swallows() {
        for depth in 1..=MAX_ANCESTOR_DEPTH as u32 {
            let coordinator = coordinator(chain_tree(depth));
            let mut host = MemoryHost::new()
                .with_window(window(TERMINAL, "st", 1000 + depth))
                .with_window(window(CHILD, "child", 1000));

            let outcome = coordinator.on_window_created(&mut host, CHILD).unwrap();
            assert_eq!(
                outcome,
                SwallowOutcome::Swallowed { parent: TERMINAL, depth: depth as usize }
            );
            assert!(host.is_minimized(TERMINAL));
        }
    }

    #[test]
    fn match_beyond_max_depth_is_ignored() {
        let depth = MAX_ANCESTOR_DEPTH as u32 + 1;
        let coordinator = coordinator(chain_tree(depth));
        let mut host = MemoryHost::new()
            .with_window(window(TERMINAL, "st", 1000 + depth))
            .with_window(window(CHILD, "child", 1000));

        let outcome = coordinator.on_window_created(&mut host, CHILD).unwrap();
        assert_eq!(outcome, SwallowOutcome::NoMatch);
        assert!(!host.is_minimized(TERMINAL));
        assert_eq!(host.parent_of(CHILD), None);
        assert!(host.visibility_log().is_empty());
    }

    #[test]
    fn vanished_ancestor_stops_walk() {
        let mut tree = example_tree();
        tree.remove(150);
        let coordinator = coordinator(tree);
        let mut host = host_with_terminal().with_window(window(CHILD, "mpv", 160));

        let outcome = coordinator.on_window_created(&mut host, CHILD).unwrap();
        assert_eq!(outcome, SwallowOutcome::AncestryEnded { depth: 2 });
        assert!(!host.is_minimized(TERMINAL));
        assert_eq!(host.parent_of(CHILD), None);
    }

    #[test]
    fn root_of_tree_stops_walk() {
        let coordinator = coordinator(StaticProcessTree::new().with_parent(300, 1).with_parent(1, 0));
        let mut host = host_with_terminal().with_window(window(CHILD, "daemon", 300));

        let outcome = coordinator.on_window_created(&mut host, CHILD).unwrap();
        assert_eq!(outcome, SwallowOutcome::AncestryEnded { depth: 2 });
        assert!(host.visibility_log().is_empty());
    }

    #[test]
    fn destroy_twice_restores_once() {
        let coordinator = coordinator(example_tree());
        let mut host = host_with_terminal().with_window(window(CHILD, "mpv", 160));
        coordinator.on_window_created(&mut host, CHILD).unwrap();

        assert_eq!(
            coordinator.on_window_destroyed(&mut host, CHILD).unwrap(),
            UnswallowOutcome::Restored(TERMINAL)
        );
        assert_eq!(
            coordinator.on_window_destroyed(&mut host, CHILD).unwrap(),
            UnswallowOutcome::NotSwallowed
        );
        assert_eq!(host.visibility_log(), &[(TERMINAL, true), (TERMINAL, false)]);
    }

    #[test]
    fn destroy_unswallowed_window_is_noop() {
        let coordinator = coordinator(example_tree());
        let mut host = host_with_terminal().with_window(window(CHILD, "firefox", 4242));

        assert_eq!(
            coordinator.on_window_destroyed(&mut host, CHILD).unwrap(),
            UnswallowOutcome::NotSwallowed
        );
        assert!(host.visibility_log().is_empty());
    }

    #[test]
    fn created_twice_keeps_single_parent() {
        let coordinator = coordinator(example_tree());
        let mut host = host_with_terminal().with_window(window(CHILD, "mpv", 160));

        coordinator.on_window_created(&mut host, CHILD).unwrap();
        assert_eq!(
            coordinator.on_window_created(&mut host, CHILD).unwrap(),
            SwallowOutcome::AlreadySwallowed
        );
        assert_eq!(host.visibility_log().len(), 1);
    }

    #[test]
    fn closing_parent_first_clears_relation() {
        let coordinator = coordinator(example_tree());
        let mut host = host_with_terminal();
        coordinator
            .handle_event(&mut host, &WindowEvent::created(window(CHILD, "mpv", 160)))
            .unwrap();

        coordinator
            .handle_event(&mut host, &WindowEvent::destroyed(window(TERMINAL, "st", 100)))
            .unwrap();
        assert_eq!(host.parent_of(CHILD), None);

        assert_eq!(
            coordinator.on_window_destroyed(&mut host, CHILD).unwrap(),
            UnswallowOutcome::NotSwallowed
        );
    }

    #[test]
    fn window_without_pid_is_untouched() {
        let coordinator = coordinator(example_tree());
        let mut host =
            host_with_terminal().with_window(WindowInfo::new(CHILD, "no pid".to_string()));

        assert_eq!(
            coordinator.on_window_created(&mut host, CHILD).unwrap(),
            SwallowOutcome::NoPid
        );
    }

    #[test]
    fn ignore_rules_and_disabled() {
        let config = SwallowConfig {
            enabled: true,
            ignore: vec![WindowMatch::title("mpv")],
        };
        let coordinator = SwallowCoordinator::new(config, Box::new(example_tree()));
        let mut host = host_with_terminal().with_window(window(CHILD, "mpv", 160));
        assert_eq!(
            coordinator.on_window_created(&mut host, CHILD).unwrap(),
            SwallowOutcome::Ignored
        );

        let config = SwallowConfig {
            enabled: false,
            ignore: Vec::new(),
        };
        let coordinator = SwallowCoordinator::new(config, Box::new(example_tree()));
        assert_eq!(
            coordinator.on_window_created(&mut host, CHILD).unwrap(),
            SwallowOutcome::Disabled
        );
        assert!(host.visibility_log().is_empty());
    }

    #[test]
    fn restore_all_shows_hidden_parents() {
        let coordinator = coordinator(example_tree());
        let mut host = host_with_terminal().with_window(window(CHILD, "mpv", 160));
        coordinator.on_window_created(&mut host, CHILD).unwrap();

        assert_eq!(coordinator.restore_all(&mut host), 1);
        assert!(!host.is_minimized(TERMINAL));
        assert_eq!(host.parent_of(CHILD), None);
        assert_eq!(coordinator.restore_all(&mut host), 0);
    }

    #[test]
    fn failed_hide_rolls_back_parent() {
        let coordinator = coordinator(example_tree());
        let mut host = FailingHost::new(host_with_terminal().with_window(window(CHILD, "mpv", 160)));
        host.hide_failures = 1;

        assert!(matches!(
            coordinator.on_window_created(&mut host, CHILD),
            Err(TilercError::Host(_))
        ));
        assert_eq!(host.inner.parent_of(CHILD), None);
        assert!(!host.inner.is_minimized(TERMINAL));

        // Повторное событие создания проходит как обычно
        assert_eq!(
            coordinator.on_window_created(&mut host, CHILD).unwrap(),
            SwallowOutcome::Swallowed { parent: TERMINAL, depth: 2 }
        );
    }

    #[test]
    fn failed_restore_keeps_relation_for_retry() {
        let coordinator = coordinator(example_tree());
        let mut host = FailingHost::new(host_with_terminal());
        let child = window(CHILD, "mpv", 160);
        coordinator
            .handle_event(&mut host, &WindowEvent::created(child.clone()))
            .unwrap();

        host.show_failures = 1;
        assert!(coordinator
            .handle_event(&mut host, &WindowEvent::destroyed(child.clone()))
            .is_err());
        assert!(host.inner.is_minimized(TERMINAL));
        assert_eq!(host.inner.parent_of(CHILD), Some(TERMINAL));

        // Окно всё ещё в таблице, следующий опрос повторит закрытие
        coordinator
            .handle_event(&mut host, &WindowEvent::destroyed(child))
            .unwrap();
        assert!(!host.inner.is_minimized(TERMINAL));
        assert!(host.window(CHILD).is_none());
    }

    #[test]
    fn restore_all_retries_after_failure() {
        let coordinator = coordinator(example_tree());
        let mut host = FailingHost::new(host_with_terminal().with_window(window(CHILD, "mpv", 160)));
        coordinator.on_window_created(&mut host, CHILD).unwrap();

        host.show_failures = 1;
        assert_eq!(coordinator.restore_all(&mut host), 0);
        assert!(host.inner.is_minimized(TERMINAL));
        assert_eq!(host.inner.parent_of(CHILD), Some(TERMINAL));

        assert_eq!(coordinator.restore_all(&mut host), 1);
        assert!(!host.inner.is_minimized(TERMINAL));
        assert_eq!(host.inner.parent_of(CHILD), None);
    }

    #[test]
    fn pid_index_excludes_self_and_prefers_lower_id() {
        let host = MemoryHost::new()
            .with_window(window(WindowId(5), "a", 100))
            .with_window(window(WindowId(3), "b", 100))
            .with_window(window(WindowId(9), "self", 160));

        let index = pid_index(&host, WindowId(9));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&100), Some(&WindowId(3)));
    }
}
