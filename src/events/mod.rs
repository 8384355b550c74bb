pub mod keyboard;
pub mod window;

pub use keyboard::{KeyChord, Modifiers};
pub use window::{WindowEvent, WindowEventType, WindowId, WindowInfo};
