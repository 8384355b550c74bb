use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Команды текущей раскладки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommand {
    Left,
    Right,
    Up,
    Down,
    Next,
    ShuffleLeft,
    ShuffleRight,
    ShuffleUp,
    ShuffleDown,
    GrowLeft,
    GrowRight,
    GrowUp,
    GrowDown,
    Normalize,
    ToggleSplit,
}

/// Действие, которое хост выполняет по сочетанию клавиш или кнопке мыши
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Spawn { command: String },
    NextLayout,
    KillWindow,
    ToggleFullscreen,
    ToggleFloating,
    Shutdown,
    ReloadConfig,
    Layout { command: LayoutCommand },
    ToScreen { group: String },
    ToGroup {
        group: String,
        #[serde(default)]
        switch_group: bool,
    },
    SetPositionFloating,
    SetSizeFloating,
    GetPosition,
    GetSize,
    BringToFront,
}

impl Action {
    /// Группа, на которую ссылается действие (если есть)
    pub fn group(&self) -> Option<&str> {
        match self {
            Action::ToScreen { group } | Action::ToGroup { group, .. } => Some(group),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Spawn { command } => write!(f, "spawn `{}`", command),
            Action::Layout { command } => write!(f, "layout.{:?}", command),
            Action::ToScreen { group } => write!(f, "group[{}].toscreen", group),
            Action::ToGroup { group, switch_group } => {
                write!(f, "window.togroup({}, switch_group={})", group, switch_group)
            }
            other => write!(f, "{:?}", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyBinding {
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub key: String,
    pub action: Action,
    #[serde(default)]
    pub desc: String,
}

impl KeyBinding {
    pub fn new(modifiers: &[&str], key: &str, action: Action, desc: impl Into<String>) -> Self {
        Self {
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            key: key.to_string(),
            action,
            desc: desc.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseKind {
    Drag,
    Click,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MouseBinding {
    pub kind: MouseKind,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub button: String,
    pub action: Action,
    /// Для drag: действие, снимающее начальное состояние
    #[serde(default)]
    pub start: Option<Action>,
}

/// Номер кнопки мыши из имени `Button1`..`Button9`
pub fn parse_button(name: &str) -> Option<u8> {
    let n: u8 = name.strip_prefix("Button")?.parse().ok()?;
    (1..=9).contains(&n).then_some(n)
}

/// Сгенерировать привязки для групп: `mod+имя` переключает, `mod+shift+имя` переносит окно
pub fn group_bindings(groups: &[String]) -> Vec<KeyBinding> {
    groups
        .iter()
        .flat_map(|name| {
            [
                KeyBinding::new(
                    &["mod"],
                    name,
                    Action::ToScreen { group: name.clone() },
                    format!("Switch to group {}", name),
                ),
                KeyBinding::new(
                    &["mod", "shift"],
                    name,
                    Action::ToGroup {
                        group: name.clone(),
                        switch_group: false,
                    },
                    format!("Switch to & move focused window to group {}", name),
                ),
            ]
        })
        .collect()
}

/// Подставить `{имя}` из таблицы приложений. Фигурные скобки вокруг
/// чего-то, что не похоже на идентификатор, остаются как есть.
/// Ошибка содержит имя неизвестного приложения.
pub fn expand_command(template: &str, apps: &BTreeMap<String, String>) -> Result<String, String> {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_placeholder(&after[..close]) => {
                let name = &after[..close];
                let value = apps.get(name).ok_or_else(|| name.to_string())?;
                result.push_str(value);
                rest = &after[close + 1..];
            }
            _ => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    Ok(result)
}

fn is_placeholder(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
