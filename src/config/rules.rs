use serde::{Deserialize, Serialize};

use super::appearance::ColorRef;
use crate::events::WindowInfo;

/// Правило сопоставления окна. Все заданные поля должны совпасть
/// (регистронезависимая подстрока).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WindowMatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub wm_class: Option<String>,
}

impl WindowMatch {
    pub fn title(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            wm_class: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.wm_class.is_none()
    }

    pub fn matches(&self, window: &WindowInfo) -> bool {
        if self.is_empty() {
            return false;
        }
        let contains = |haystack: &str, needle: &str| {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        };
        self.title.as_deref().map_or(true, |t| contains(&window.title, t))
            && self.wm_class.as_deref().map_or(true, |c| contains(&window.class, c))
    }
}

/// Проверить, соответствует ли окно любому из правил
pub fn matches_any(rules: &[WindowMatch], window: &WindowInfo) -> bool {
    rules.iter().any(|rule| rule.matches(window))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FloatingConfig {
    #[serde(default)]
    pub rules: Vec<WindowMatch>,
    pub border_width: u32,
    #[serde(default)]
    pub border_focus: Option<ColorRef>,
    #[serde(default)]
    pub border_normal: Option<ColorRef>,
}

impl Default for FloatingConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            border_width: 2,
            border_focus: None,
            border_normal: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SwallowConfig {
    pub enabled: bool,
    /// Окна, которые никогда не проглатывают своего родителя
    #[serde(default)]
    pub ignore: Vec<WindowMatch>,
}

impl Default for SwallowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ignore: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusActivation {
    Smart,
    Focus,
    Urgent,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BehaviorConfig {
    pub follow_mouse_focus: bool,
    pub bring_front_click: bool,
    pub floats_kept_above: bool,
    pub cursor_warp: bool,
    pub auto_fullscreen: bool,
    pub focus_on_window_activation: FocusActivation,
    pub reconfigure_screens: bool,
    pub auto_minimize: bool,
    pub wmname: String,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            follow_mouse_focus: true,
            bring_front_click: false,
            floats_kept_above: true,
            cursor_warp: false,
            auto_fullscreen: true,
            focus_on_window_activation: FocusActivation::Smart,
            reconfigure_screens: true,
            auto_minimize: true,
            wmname: "LG3D".to_string(),
        }
    }
}
