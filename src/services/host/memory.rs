use tracing::debug;

use super::{WindowHost, WindowTable};
use crate::error::Result;
use crate::events::{WindowId, WindowInfo};

/// Хост без реального оконного сервера: состояние только в памяти.
/// Каждое изменение видимости записывается в журнал.
#[derive(Debug, Default)]
pub struct MemoryHost {
    table: WindowTable,
    visibility_log: Vec<(WindowId, bool)>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(mut self, window: WindowInfo) -> Self {
        self.table.insert(window);
        self
    }

    /// Журнал изменений видимости `(окно, minimized)` в порядке применения
    pub fn visibility_log(&self) -> &[(WindowId, bool)] {
        &self.visibility_log
    }

    pub fn is_minimized(&self, id: WindowId) -> bool {
        self.table.get(id).is_some_and(|w| w.minimized)
    }

    pub fn parent_of(&self, id: WindowId) -> Option<WindowId> {
        self.table.get(id).and_then(|w| w.parent)
    }
}

impl WindowHost for MemoryHost {
    fn window(&self, id: WindowId) -> Option<&WindowInfo> {
        self.table.get(id)
    }

    fn windows(&self) -> Box<dyn Iterator<Item = &WindowInfo> + '_> {
        Box::new(self.table.iter())
    }

    fn insert(&mut self, window: WindowInfo) {
        self.table.insert(window);
    }

    fn remove(&mut self, id: WindowId) -> Option<WindowInfo> {
        self.table.remove(id)
    }

    fn set_minimized(&mut self, id: WindowId, minimized: bool) -> Result<()> {
        self.table.get_mut(id)?.minimized = minimized;
        self.visibility_log.push((id, minimized));
        debug!("MemoryHost: {} minimized={}", id, minimized);
        Ok(())
    }

    fn set_parent(&mut self, id: WindowId, parent: Option<WindowId>) -> Result<Option<WindowId>> {
        self.table.set_parent(id, parent)
    }
}
