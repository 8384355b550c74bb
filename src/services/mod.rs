pub mod host;
pub mod process_tree;
pub mod swallow;
pub mod window_watcher;

pub use window_watcher::create_window_watcher;
