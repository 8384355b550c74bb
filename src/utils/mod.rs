pub mod tools;

// ✅ Макросы условного логирования: аргументы не форматируются, если уровень выключен
#[macro_export]
macro_rules! debug_if_enabled {
    ($($arg:tt)*) => {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}
