use crate::error::{Result, TilercError};
use crate::events::{WindowId, WindowInfo};
use std::process::Command;
use tracing::debug;

pub struct WmctrlClient;

impl Default for WmctrlClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WmctrlClient {
    pub fn new() -> Self {
        Self
    }

    pub fn test(&self) -> Result<()> {
        let output = Command::new("wmctrl").args(["-m"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(TilercError::ServiceUnavailable(
                "wmctrl не может подключиться к оконному менеджеру".to_string(),
            ))
        }
    }

    /// Список всех управляемых окон с pid и классом (`wmctrl -lpx`)
    pub fn list_windows(&self) -> Result<Vec<WindowInfo>> {
        let output = Command::new("wmctrl")
            .args(["-lpx"])
            .output()
            .map_err(|e| TilercError::Host(format!("wmctrl не найден: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TilercError::Host(format!("wmctrl вернул ошибку: {}", stderr.trim())));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let windows: Vec<WindowInfo> = stdout.lines().filter_map(parse_wmctrl_line).collect();
        debug!("wmctrl вернул {} окон", windows.len());
        Ok(windows)
    }
}

/// Разобрать строку `wmctrl -lpx`:
/// `0x03a00003  0 12345  st-256color.st-256color  host  Title words`
///
/// pid 0 означает, что окно не выставило `_NET_WM_PID`.
pub fn parse_wmctrl_line(line: &str) -> Option<WindowInfo> {
    let mut parts = line.split_whitespace();

    let id = WindowId::parse_hex(parts.next()?)?;
    let _desktop = parts.next()?;
    let pid: u32 = parts.next()?.parse().ok()?;
    let class = parts.next()?;
    let _host = parts.next()?;
    let title = parts.collect::<Vec<_>>().join(" ");

    // WM_CLASS выводится как instance.class
    let class = class.rsplit('.').next().unwrap_or(class).to_string();

    let window = WindowInfo::new(id, title).with_class(class);
    Some(if pid == 0 { window } else { window.with_pid(pid) })
}
