//! Window host: responsibility and boundaries
//!
//! The host owns window state. This module exposes only what the swallow
//! coordinator needs: the set of open windows with their pids, and two writable
//! annotations per window (`minimized`, `parent`). Layouts, focus and rendering
//! stay with the window manager itself.

mod memory;
mod table;
mod x11;
pub mod wmctrl;
pub mod xdotool;

pub use memory::MemoryHost;
pub use table::WindowTable;
pub use x11::X11Host;

use crate::error::Result;
use crate::events::{WindowId, WindowInfo};

pub trait WindowHost {
    fn window(&self, id: WindowId) -> Option<&WindowInfo>;

    fn windows(&self) -> Box<dyn Iterator<Item = &WindowInfo> + '_>;

    /// Начать отслеживать окно
    fn insert(&mut self, window: WindowInfo);

    /// Перестать отслеживать окно
    fn remove(&mut self, id: WindowId) -> Option<WindowInfo>;

    /// Скрыть или показать окно
    fn set_minimized(&mut self, id: WindowId, minimized: bool) -> Result<()>;

    /// Записать обратную ссылку на родителя; возвращает предыдущее значение
    fn set_parent(&mut self, id: WindowId, parent: Option<WindowId>) -> Result<Option<WindowId>>;

    /// Окна, у которых записан родитель `id`
    fn children_of(&self, id: WindowId) -> Vec<WindowId> {
        self.windows()
            .filter(|w| w.parent == Some(id))
            .map(|w| w.id)
            .collect()
    }
}
