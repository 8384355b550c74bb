use serde::{Deserialize, Serialize};
use std::fmt;

/// Пара цветов палитры `[основной, дополнительный]` (второй используется для градиентов)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColorPair(pub String, pub String);

impl ColorPair {
    pub fn solid(hex: &str) -> Self {
        Self(hex.to_string(), hex.to_string())
    }

    pub fn primary(&self) -> &str {
        &self.0
    }
}

/// Ссылка на цвет: индекс в палитре `colors` или литерал `#rrggbb[aa]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ColorRef {
    Index(usize),
    Hex(String),
}

impl fmt::Display for ColorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorRef::Index(i) => write!(f, "colors[{}]", i),
            ColorRef::Hex(hex) => write!(f, "{}", hex),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Разобрать `#rrggbb` или `#rrggbbaa` (решётка необязательна)
pub fn parse_hex_color(raw: &str) -> Option<Rgba> {
    let hex = raw.strip_prefix('#').unwrap_or(raw);
    if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgba {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
        a: if hex.len() == 8 { channel(6)? } else { 0xff },
    })
}

/// Разрешить ссылку на цвет относительно палитры
pub fn resolve_color<'a>(color: &'a ColorRef, palette: &'a [ColorPair]) -> Result<&'a str, String> {
    match color {
        ColorRef::Index(i) => palette
            .get(*i)
            .map(ColorPair::primary)
            .ok_or_else(|| format!("индекс палитры {} вне диапазона (всего {})", i, palette.len())),
        ColorRef::Hex(hex) => Ok(hex.as_str()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    MonadTall,
    MonadWide,
    Max,
    Columns,
    Stack,
    Bsp,
    Matrix,
    RatioTile,
    Tile,
    TreeTab,
    VerticalTile,
    Zoomy,
}

/// Общие параметры раскладок (`my_layout` в классических конфигах)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LayoutParams {
    #[serde(default)]
    pub border_width: Option<u32>,
    #[serde(default)]
    pub margin: Option<u32>,
    #[serde(default)]
    pub border_focus: Option<ColorRef>,
    #[serde(default)]
    pub border_normal: Option<ColorRef>,
    #[serde(default)]
    pub ratio: Option<f64>,
}

impl LayoutParams {
    /// Наложить собственные параметры поверх `base`
    pub fn overlay(&self, base: &LayoutParams) -> LayoutParams {
        LayoutParams {
            border_width: self.border_width.or(base.border_width),
            margin: self.margin.or(base.margin),
            border_focus: self.border_focus.clone().or_else(|| base.border_focus.clone()),
            border_normal: self.border_normal.clone().or_else(|| base.border_normal.clone()),
            ratio: self.ratio.or(base.ratio),
        }
    }

    pub fn colors(&self) -> impl Iterator<Item = &ColorRef> {
        self.border_focus.iter().chain(self.border_normal.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LayoutSpec {
    pub kind: LayoutKind,
    /// Подмешать `layout_defaults` перед собственными параметрами
    #[serde(default)]
    pub use_defaults: bool,
    #[serde(default)]
    pub params: LayoutParams,
}

impl LayoutSpec {
    pub fn new(kind: LayoutKind) -> Self {
        Self {
            kind,
            use_defaults: false,
            params: LayoutParams::default(),
        }
    }

    pub fn effective(&self, defaults: &LayoutParams) -> LayoutParams {
        if self.use_defaults {
            self.params.overlay(defaults)
        } else {
            self.params.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WidgetDefaults {
    pub font: String,
    pub fontsize: u32,
    pub padding: u32,
}

impl Default for WidgetDefaults {
    fn default() -> Self {
        Self {
            font: "monospace".to_string(),
            fontsize: 12,
            padding: 5,
        }
    }
}

/// Виджет панели. Параметры повторяют то, что понимает хост.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    TextBox {
        #[serde(default)]
        text: String,
        #[serde(default)]
        fontsize: Option<u32>,
        #[serde(default)]
        foreground: Option<ColorRef>,
        #[serde(default)]
        on_click: Option<super::bindings::Action>,
    },
    GroupBox {
        #[serde(default)]
        highlight_method: Option<String>,
        #[serde(default)]
        active: Option<ColorRef>,
        #[serde(default)]
        inactive: Option<ColorRef>,
        #[serde(default)]
        borderwidth: Option<u32>,
        #[serde(default)]
        highlight_color: Option<ColorRef>,
        #[serde(default)]
        this_current_screen_border: Option<ColorRef>,
        #[serde(default)]
        disable_drag: bool,
    },
    CurrentLayoutIcon,
    CurrentLayout,
    WindowName {
        #[serde(default)]
        foreground: Option<ColorRef>,
    },
    Cpu,
    Memory,
    CryptoTicker {
        crypto: String,
        api: String,
        format: String,
    },
    Backlight {
        backlight_name: String,
    },
    Net {
        format: String,
    },
    Battery {
        #[serde(default)]
        battery: u32,
        #[serde(default)]
        charge_char: Option<String>,
        #[serde(default)]
        discharge_char: Option<String>,
        #[serde(default)]
        empty_char: Option<String>,
        format: String,
    },
    Clock {
        format: String,
    },
}

impl Widget {
    pub fn name(&self) -> &'static str {
        match self {
            Widget::TextBox { .. } => "TextBox",
            Widget::GroupBox { .. } => "GroupBox",
            Widget::CurrentLayoutIcon => "CurrentLayoutIcon",
            Widget::CurrentLayout => "CurrentLayout",
            Widget::WindowName { .. } => "WindowName",
            Widget::Cpu => "CPU",
            Widget::Memory => "Memory",
            Widget::CryptoTicker { .. } => "CryptoTicker",
            Widget::Backlight { .. } => "Backlight",
            Widget::Net { .. } => "Net",
            Widget::Battery { .. } => "Battery",
            Widget::Clock { .. } => "Clock",
        }
    }

    /// Все ссылки на цвета внутри виджета
    pub fn colors(&self) -> Vec<&ColorRef> {
        match self {
            Widget::TextBox { foreground, .. } | Widget::WindowName { foreground } => {
                foreground.iter().collect()
            }
            Widget::GroupBox {
                active,
                inactive,
                highlight_color,
                this_current_screen_border,
                ..
            } => [active, inactive, highlight_color, this_current_screen_border]
                .into_iter()
                .flatten()
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Проверить обязательные строковые параметры; возвращает описание первой проблемы
    pub fn check_params(&self) -> Result<(), String> {
        match self {
            Widget::CryptoTicker { crypto, api, format } => {
                if crypto.is_empty() || api.is_empty() || format.is_empty() {
                    return Err("CryptoTicker требует crypto, api и format".to_string());
                }
            }
            Widget::Backlight { backlight_name } if backlight_name.is_empty() => {
                return Err("Backlight требует backlight_name".to_string());
            }
            Widget::Net { format } | Widget::Clock { format } if format.is_empty() => {
                return Err(format!("{} требует непустой format", self.name()));
            }
            Widget::Battery {
                charge_char,
                discharge_char,
                empty_char,
                format,
                ..
            } => {
                if format.is_empty() {
                    return Err("Battery требует непустой format".to_string());
                }
                for c in [charge_char, discharge_char, empty_char].into_iter().flatten() {
                    if c.chars().count() != 1 {
                        return Err(format!("Battery: '{}' должен быть одним символом", c));
                    }
                }
            }
            Widget::GroupBox {
                highlight_method: Some(method),
                ..
            } => match method.as_str() {
                "border" | "block" | "text" | "line" => {}
                other => return Err(format!("GroupBox: неизвестный highlight_method '{}'", other)),
            },
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BarConfig {
    pub size: u32,
    pub background: ColorRef,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            size: 20,
            background: ColorRef::Index(0),
            widgets: vec![
                Widget::GroupBox {
                    highlight_method: None,
                    active: None,
                    inactive: None,
                    borderwidth: None,
                    highlight_color: None,
                    this_current_screen_border: None,
                    disable_drag: false,
                },
                Widget::CurrentLayout,
                Widget::WindowName { foreground: None },
                Widget::Clock {
                    format: "%Y-%m-%d %a %I:%M %p".to_string(),
                },
            ],
        }
    }
}
