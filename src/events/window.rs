use serde::{Deserialize, Serialize};
use std::fmt;

/// Непрозрачный идентификатор окна, выданный хостом
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl WindowId {
    /// Разобрать X11-идентификатор вида `0x03a00003`
    pub fn parse_hex(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))?;
        u64::from_str_radix(digits, 16).ok().map(Self)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Информация об окне
///
/// `minimized` и `parent` принадлежат хосту; координатор проглатывания
/// только аннотирует их.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub id: WindowId,
    pub title: String,
    pub class: String,
    pub pid: Option<u32>,
    pub minimized: bool,
    pub parent: Option<WindowId>,
}

impl WindowInfo {
    pub fn new(id: WindowId, title: String) -> Self {
        Self {
            id,
            title,
            class: String::new(),
            pid: None,
            minimized: false,
            parent: None,
        }
    }

    pub fn with_class(mut self, class: String) -> Self {
        self.class = class;
        self
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class.is_empty() {
            write!(f, "{} \"{}\"", self.id, self.title)
        } else {
            write!(f, "{} \"{}\" ({})", self.id, self.title, self.class)
        }
    }
}

/// Событие жизненного цикла окна
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEvent {
    pub window: WindowInfo,
    pub timestamp: std::time::Instant,
    pub event_type: WindowEventType,
}

impl WindowEvent {
    pub fn new(window: WindowInfo, event_type: WindowEventType) -> Self {
        Self {
            window,
            timestamp: std::time::Instant::now(),
            event_type,
        }
    }

    pub fn created(window: WindowInfo) -> Self {
        Self::new(window, WindowEventType::Created)
    }

    pub fn destroyed(window: WindowInfo) -> Self {
        Self::new(window, WindowEventType::Destroyed)
    }
}

impl fmt::Display for WindowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}: {} ({}ms ago)",
            self.event_type,
            self.window,
            self.timestamp.elapsed().as_millis()
        )
    }
}

/// Тип события окна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowEventType {
    Created,
    Destroyed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_info_creation() {
        let window = WindowInfo::new(WindowId(7), "Test Window".to_string())
            .with_class("TestApp".to_string())
            .with_pid(1234);

        assert_eq!(window.title, "Test Window");
        assert_eq!(window.class, "TestApp");
        assert_eq!(window.pid, Some(1234));
        assert!(!window.minimized);
        assert_eq!(window.parent, None);
    }

    #[test]
    fn test_window_id_hex() {
        assert_eq!(WindowId::parse_hex("0x03a00003"), Some(WindowId(0x03a00003)));
        assert_eq!(WindowId::parse_hex("03a00003"), None);
        assert_eq!(WindowId::parse_hex("0xzz"), None);
        assert_eq!(WindowId(0x03a00003).to_string(), "0x03a00003");
    }

    #[test]
    fn test_window_event_creation() {
        let window = WindowInfo::new(WindowId(3), "Test".to_string());
        let event = WindowEvent::destroyed(window.clone());

        assert_eq!(event.window, window);
        assert_eq!(event.event_type, WindowEventType::Destroyed);
    }
}
