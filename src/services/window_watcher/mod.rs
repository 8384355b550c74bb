//! WindowWatcher service: responsibility and boundaries
//!
//! This module and its submodules turn the host's window list into serialized
//! `Created` / `Destroyed` events and deliver them, one at a time, to the
//! swallow coordinator. It MUST NOT decide anything about swallowing itself;
//! that belongs to `services::swallow`.

mod dry_run;
mod window_watcher;
mod r#trait;

pub use self::r#trait::{create_window_watcher, WindowWatcherTrait};
