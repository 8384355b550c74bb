use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Маппинг между именами X11 keysym и их значениями
pub struct KeysymMap;

// Статическая таблица keysym, которые реально встречаются в привязках
static KEYSYMS: Lazy<Vec<(&'static str, u32)>> = Lazy::new(|| {
    let mut table = Vec::new();

    // Буквенные клавиши (a = 0x61 .. z = 0x7a)
    const LETTERS: [&str; 26] = [
        "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r",
        "s", "t", "u", "v", "w", "x", "y", "z",
    ];
    for (i, name) in LETTERS.iter().enumerate() {
        table.push((*name, 0x61 + i as u32));
    }

    // Цифровые клавиши (0 = 0x30 .. 9 = 0x39)
    const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
    for (i, name) in DIGITS.iter().enumerate() {
        table.push((*name, 0x30 + i as u32));
    }

    // Функциональные клавиши (F1 = 0xffbe .. F12 = 0xffc9)
    const FUNCTION: [&str; 12] = [
        "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
    ];
    for (i, name) in FUNCTION.iter().enumerate() {
        table.push((*name, 0xffbe + i as u32));
    }

    table.extend_from_slice(&[
        // Специальные клавиши
        ("space", 0x0020),
        ("Return", 0xff0d),
        ("Tab", 0xff09),
        ("BackSpace", 0xff08),
        ("Escape", 0xff1b),
        ("Delete", 0xffff),
        ("Insert", 0xff63),
        ("Print", 0xff61),
        ("Home", 0xff50),
        ("End", 0xff57),
        ("Prior", 0xff55),
        ("Next", 0xff56),
        // Стрелки
        ("Left", 0xff51),
        ("Up", 0xff52),
        ("Right", 0xff53),
        ("Down", 0xff54),
        // Пунктуация
        ("grave", 0x0060),
        ("apostrophe", 0x0027),
        ("minus", 0x002d),
        ("equal", 0x003d),
        ("comma", 0x002c),
        ("period", 0x002e),
        ("slash", 0x002f),
        ("backslash", 0x005c),
        ("semicolon", 0x003b),
        ("bracketleft", 0x005b),
        ("bracketright", 0x005d),
        // Мультимедиа
        ("XF86AudioRaiseVolume", 0x1008ff13),
        ("XF86AudioLowerVolume", 0x1008ff11),
        ("XF86AudioMute", 0x1008ff12),
        ("XF86AudioMicMute", 0x1008ffb2),
        ("XF86AudioPlay", 0x1008ff14),
        ("XF86AudioStop", 0x1008ff15),
        ("XF86AudioPrev", 0x1008ff16),
        ("XF86AudioNext", 0x1008ff17),
        ("XF86MonBrightnessUp", 0x1008ff02),
        ("XF86MonBrightnessDown", 0x1008ff03),
    ]);

    table
});

// Поиск без учёта регистра: "Space" и "space" это один keysym
static NAME_INDEX: Lazy<HashMap<String, (&'static str, u32)>> = Lazy::new(|| {
    KEYSYMS
        .iter()
        .map(|&(name, value)| (name.to_lowercase(), (name, value)))
        .collect()
});

static VALUE_INDEX: Lazy<HashMap<u32, &'static str>> =
    Lazy::new(|| KEYSYMS.iter().map(|&(name, value)| (value, name)).collect());

impl KeysymMap {
    /// Получить значение keysym по имени
    #[allow(dead_code)]
    pub fn get_keysym(name: &str) -> Result<u32, String> {
        NAME_INDEX
            .get(&name.to_lowercase())
            .map(|&(_, value)| value)
            .ok_or_else(|| format!("Unknown keysym: {}", name))
    }

    /// Каноническое написание имени keysym
    pub fn canonical(name: &str) -> Option<&'static str> {
        NAME_INDEX.get(&name.to_lowercase()).map(|&(canonical, _)| canonical)
    }

    /// Получить имя keysym по значению
    #[allow(dead_code)]
    pub fn get_name(value: u32) -> Option<&'static str> {
        VALUE_INDEX.get(&value).copied()
    }
}
