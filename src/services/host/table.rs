use std::collections::BTreeMap;

use crate::error::{Result, TilercError};
use crate::events::{WindowId, WindowInfo};

/// Реестр открытых окон, на котором построены все хосты
#[derive(Debug, Clone, Default)]
pub struct WindowTable {
    windows: BTreeMap<WindowId, WindowInfo>,
}

impl WindowTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowInfo> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Result<&mut WindowInfo> {
        self.windows
            .get_mut(&id)
            .ok_or(TilercError::WindowNotFound(id))
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowInfo> {
        self.windows.values()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn insert(&mut self, window: WindowInfo) {
        self.windows.insert(window.id, window);
    }

    pub fn remove(&mut self, id: WindowId) -> Option<WindowInfo> {
        self.windows.remove(&id)
    }

    pub fn set_parent(&mut self, id: WindowId, parent: Option<WindowId>) -> Result<Option<WindowId>> {
        let window = self.get_mut(id)?;
        Ok(std::mem::replace(&mut window.parent, parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_remove_and_annotate() {
        let mut table = WindowTable::new();
        table.insert(WindowInfo::new(WindowId(1), "st".to_string()).with_pid(100));
        table.insert(WindowInfo::new(WindowId(2), "mpv".to_string()).with_pid(160));

        assert_eq!(table.len(), 2);
        assert_eq!(table.set_parent(WindowId(2), Some(WindowId(1))).unwrap(), None);
        assert_eq!(table.set_parent(WindowId(2), None).unwrap(), Some(WindowId(1)));

        assert!(table.remove(WindowId(2)).is_some());
        assert!(!table.contains(WindowId(2)));
        assert!(matches!(
            table.set_parent(WindowId(2), None),
            Err(TilercError::WindowNotFound(WindowId(2)))
        ));
    }
}
