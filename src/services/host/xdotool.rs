use crate::error::{Result, TilercError};
use crate::tilerc_error;
use crate::events::WindowId;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

pub struct XdotoolClient {
    program: PathBuf,
}

impl Default for XdotoolClient {
    fn default() -> Self {
        Self::new()
    }
}

impl XdotoolClient {
    pub fn new() -> Self {
        Self::with_program("xdotool")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn minimize(&self, id: WindowId) -> Result<()> {
        self.run(&["windowminimize", &id.to_string()])
    }

    /// EWMH-менеджеры разворачивают окно только по `_NET_ACTIVE_WINDOW`
    pub fn restore(&self, id: WindowId) -> Result<()> {
        let id = id.to_string();
        self.run(&["windowmap", &id])?;
        self.run(&["windowactivate", &id])
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        debug!("xdotool {}", args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| {
                debug!("xdotool не найден или не работает: {}", e);
                TilercError::Host(format!("xdotool не найден: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("xdotool вернул ошибку: {}", stderr);
            return Err(tilerc_error!(host, "xdotool {} вернул ошибку: {}", args.join(" "), stderr.trim()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    /// Скрипт вместо xdotool: пишет аргументы в журнал и завершается с `code`
    fn fake_xdotool(dir: &std::path::Path, code: i32) -> (PathBuf, PathBuf) {
        let log = dir.join("calls.log");
        let script = dir.join("xdotool");
        fs::write(
            &script,
            format!("#!/bin/sh\necho \"$@\" >> '{}'\nexit {}\n", log.display(), code),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        (script, log)
    }

    #[test]
    fn restore_maps_then_activates() {
        let dir = tempfile::tempdir().unwrap();
        let (script, log) = fake_xdotool(dir.path(), 0);
        let client = XdotoolClient::with_program(script);

        client.minimize(WindowId(0x03a00003)).unwrap();
        client.restore(WindowId(0x03a00003)).unwrap();

        assert_eq!(
            fs::read_to_string(log).unwrap(),
            "windowminimize 0x03a00003\nwindowmap 0x03a00003\nwindowactivate 0x03a00003\n"
        );
    }

    #[test]
    fn failed_command_is_host_error() {
        let dir = tempfile::tempdir().unwrap();
        let (script, log) = fake_xdotool(dir.path(), 1);
        let client = XdotoolClient::with_program(script);

        assert!(matches!(client.restore(WindowId(7)), Err(TilercError::Host(_))));
        // После неудачного windowmap активация не запускается
        assert_eq!(fs::read_to_string(log).unwrap(), "windowmap 0x00000007\n");
    }

    #[test]
    fn missing_binary_is_host_error() {
        let client = XdotoolClient::with_program("/nonexistent/xdotool");
        assert!(matches!(client.minimize(WindowId(7)), Err(TilercError::Host(_))));
    }
}
