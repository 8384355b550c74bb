use crate::error::{Result, TilercError};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Внешние утилиты, через которые X11-хост работает с окнами
pub const REQUIRED_TOOLS: [&str; 2] = ["wmctrl", "xdotool"];

/// Проверить окружение X11 перед запуском демона
pub fn check_x11_environment() -> Result<()> {
    info!("Проверка окружения X11...");

    match std::env::var("DISPLAY") {
        Ok(value) if !value.is_empty() => info!("DISPLAY={}", value),
        _ => {
            return Err(TilercError::ServiceUnavailable(
                "DISPLAY не задан, X-сервер недоступен".to_string(),
            ))
        }
    }

    if std::env::var("XDG_SESSION_TYPE").is_ok_and(|s| s == "wayland") {
        warn!("Сессия Wayland: окна XWayland будут отслеживаться, нативные - нет");
    }

    let path = std::env::var_os("PATH").unwrap_or_default();
    let search: Vec<PathBuf> = std::env::split_paths(&path).collect();
    for tool in REQUIRED_TOOLS {
        match find_executable(tool, &search) {
            Some(found) => info!("Найден {}: {}", tool, found.display()),
            None => {
                return Err(TilercError::ServiceUnavailable(format!(
                    "{} не найден в PATH. Установите пакет {}",
                    tool, tool
                )))
            }
        }
    }

    info!("Проверка окружения завершена успешно");
    Ok(())
}

/// Найти исполняемый файл в списке каталогов
pub fn find_executable(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
