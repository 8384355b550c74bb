use tracing::warn;

use super::xdotool::XdotoolClient;
use super::{WindowHost, WindowTable};
use crate::error::Result;
use crate::events::{WindowId, WindowInfo};

/// Хост поверх X11: видимость меняется через xdotool, аннотации хранятся в таблице
pub struct X11Host {
    table: WindowTable,
    xdotool: XdotoolClient,
}

impl Default for X11Host {
    fn default() -> Self {
        Self::new()
    }
}

impl X11Host {
    pub fn new() -> Self {
        Self {
            table: WindowTable::new(),
            xdotool: XdotoolClient::new(),
        }
    }

    pub fn table(&self) -> &WindowTable {
        &self.table
    }
}

impl WindowHost for X11Host {
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
        let window = self.table.get_mut(id)?;

        let applied = if minimized {
            self.xdotool.minimize(id)
        } else {
            self.xdotool.restore(id)
        };

        if let Err(e) = applied {
            warn!("Не удалось изменить видимость окна {}: {}", id, e);
            return Err(e);
        }

        window.minimized = minimized;
        Ok(())
    }

    fn set_parent(&mut self, id: WindowId, parent: Option<WindowId>) -> Result<Option<WindowId>> {
        self.table.set_parent(id, parent)
    }
}
