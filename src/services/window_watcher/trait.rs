use crate::config::Config;
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::watch;

/// Trait for window watchers that can run in different modes
#[async_trait::async_trait]
pub trait WindowWatcherTrait {
    /// Run the watcher until `shutdown` flips to `true`, then restore every
    /// window it hid.
    async fn run(self: Box<Self>, shutdown: watch::Receiver<bool>) -> Result<()>;
}

/// Factory function to create an appropriate window watcher based on the dry_run flag
pub fn create_window_watcher(
    config: Arc<Config>,
    dry_run: bool,
) -> Result<Box<dyn WindowWatcherTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_run::DryRunWatcher::new(config)))
    } else {
        Ok(Box::new(super::window_watcher::RealWindowWatcher::new(config)?))
    }
}
