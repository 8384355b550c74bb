use thiserror::Error;

use crate::events::WindowId;

#[derive(Error, Debug)]
pub enum TilercError {
    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Окно не найдено: {0}")]
    WindowNotFound(WindowId),

    #[error("Ошибка хоста окон: {0}")]
    Host(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),
}

pub type Result<T> = std::result::Result<T, TilercError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! tilerc_error {
    (host, $($arg:tt)*) => {
        $crate::error::TilercError::Host(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::TilercError::ServiceUnavailable(format!($($arg)*))
    };
}
