use serde::{Deserialize, Serialize};
use std::fmt;

/// Модификаторы клавиш в терминах X11 (`mod4` = Super, `mod1` = Alt)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub lock: bool,
    pub control: bool,
    pub mod1: bool,
    pub mod2: bool,
    pub mod3: bool,
    pub mod4: bool,
    pub mod5: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str) -> Option<Self> {
        match name {
            "shift" => self.shift = true,
            "lock" => self.lock = true,
            "control" | "ctrl" => self.control = true,
            "mod1" | "alt" => self.mod1 = true,
            "mod2" => self.mod2 = true,
            "mod3" => self.mod3 = true,
            "mod4" | "super" => self.mod4 = true,
            "mod5" => self.mod5 = true,
            _ => return None,
        }
        Some(self)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn to_vec(&self) -> Vec<&'static str> {
        let mut result = Vec::new();
        if self.mod1 { result.push("mod1"); }
        if self.mod2 { result.push("mod2"); }
        if self.mod3 { result.push("mod3"); }
        if self.mod4 { result.push("mod4"); }
        if self.mod5 { result.push("mod5"); }
        if self.control { result.push("control"); }
        if self.shift { result.push("shift"); }
        if self.lock { result.push("lock"); }
        result
    }

    /// Собрать модификаторы из имён конфигурации; `mod` раскрывается в `mod_key`.
    /// Возвращает первое нераспознанное имя как ошибку.
    pub fn from_names(names: &[String], mod_key: &str) -> Result<Self, String> {
        names.iter().try_fold(Self::new(), |acc, name| {
            let name = name.to_lowercase();
            let resolved = if name == "mod" { mod_key } else { name.as_str() };
            acc.with(resolved).ok_or_else(|| name.clone())
        })
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.to_vec();
        if modifiers.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", modifiers.join("+"))
        }
    }
}

/// Сочетание клавиш: модификаторы + keysym
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub modifiers: Modifiers,
    pub keysym: String,
}

impl KeyChord {
    pub fn new(modifiers: Modifiers, keysym: impl Into<String>) -> Self {
        Self {
            modifiers,
            keysym: keysym.into(),
        }
    }

    /// Получить уникальный идентификатор комбинации клавиш
    pub fn combination_id(&self) -> String {
        if self.modifiers.is_empty() {
            self.keysym.clone()
        } else {
            format!("{}+{}", self.modifiers, self.keysym)
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.combination_id())
    }
}
