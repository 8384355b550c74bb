pub mod appearance;
pub mod bindings;
pub mod rules;

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::events::{KeyChord, Modifiers};
use crate::mappings::KeysymMap;

pub use appearance::{
    BarConfig, ColorPair, ColorRef, LayoutKind, LayoutParams, LayoutSpec, Widget, WidgetDefaults,
};
pub use bindings::{Action, KeyBinding, MouseBinding, MouseKind};
pub use rules::{BehaviorConfig, FloatingConfig, SwallowConfig};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub host: HostConfig,
    pub swallow: SwallowConfig,
    /// Модификатор, который в привязках записывается как `mod`
    pub mod_key: String,
    #[serde(default)]
    pub apps: BTreeMap<String, String>,
    #[serde(default)]
    pub keys: Vec<KeyBinding>,
    #[serde(default)]
    pub mouse: Vec<MouseBinding>,
    #[serde(default)]
    pub groups: Vec<String>,
    pub layout_defaults: LayoutParams,
    #[serde(default)]
    pub layouts: Vec<LayoutSpec>,
    pub floating: FloatingConfig,
    pub widget_defaults: WidgetDefaults,
    pub bar: BarConfig,
    #[serde(default)]
    pub colors: Vec<ColorPair>,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HostConfig {
    pub backend: String,
    pub polling_interval_ms: u64,
}

/// Привязка клавиши после раскрытия `mod`, плейсхолдеров и групп
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    pub chord: KeyChord,
    pub action: Action,
    pub desc: String,
}

impl Default for Config {
    fn default() -> Self {
        let mut apps = BTreeMap::new();
        apps.insert("terminal".to_string(), "xterm".to_string());

        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                filter: "tilerc=info".to_string(),
            },
            host: HostConfig {
                backend: "x11".to_string(),
                polling_interval_ms: 500,
            },
            swallow: SwallowConfig::default(),
            mod_key: "mod4".to_string(),
            apps,
            keys: Vec::new(),
            mouse: Vec::new(),
            groups: "123456789".chars().map(|c| c.to_string()).collect(),
            layout_defaults: LayoutParams {
                border_width: Some(2),
                margin: Some(8),
                border_focus: Some(ColorRef::Index(1)),
                border_normal: Some(ColorRef::Index(0)),
                ratio: Some(0.5),
            },
            layouts: vec![
                LayoutSpec {
                    use_defaults: true,
                    ..LayoutSpec::new(LayoutKind::MonadTall)
                },
                LayoutSpec::new(LayoutKind::Max),
            ],
            floating: FloatingConfig::default(),
            widget_defaults: WidgetDefaults::default(),
            bar: BarConfig::default(),
            colors: vec![ColorPair::solid("#161818"), ColorPair::solid("#eeeeee")],
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Self::base_figment()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("TILERC_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;
        Ok(config)
    }

    /// Загрузить конфигурацию из TOML-строки (без переменных окружения)
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Config = Self::base_figment()
            .merge(Toml::string(toml))
            .extract()
            .context("Не удалось разобрать конфигурацию")?;

        config.validate()?;
        Ok(config)
    }

    fn base_figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
    }

    /// Все привязки клавиш: явные и сгенерированные для групп
    pub fn resolved_keys(&self) -> Result<Vec<ResolvedBinding>> {
        let generated = bindings::group_bindings(&self.groups);

        self.keys
            .iter()
            .chain(generated.iter())
            .enumerate()
            .map(|(i, binding)| {
                self.resolve_binding(binding)
                    .with_context(|| format!("Привязка #{} ({})", i + 1, binding.key))
            })
            .collect()
    }

    fn resolve_binding(&self, binding: &KeyBinding) -> Result<ResolvedBinding> {
        let modifiers = Modifiers::from_names(&binding.modifiers, &self.mod_key)
            .map_err(|m| anyhow::anyhow!("Неверный модификатор '{}'", m))?;

        let keysym = KeysymMap::canonical(&binding.key)
            .ok_or_else(|| anyhow::anyhow!("Неизвестная клавиша '{}'", binding.key))?;

        Ok(ResolvedBinding {
            chord: KeyChord::new(modifiers, keysym),
            action: self.resolve_action(&binding.action)?,
            desc: binding.desc.clone(),
        })
    }

    /// Раскрыть плейсхолдеры `{app}` в команде запуска
    pub fn resolve_action(&self, action: &Action) -> Result<Action> {
        match action {
            Action::Spawn { command } => {
                let command = bindings::expand_command(command, &self.apps).map_err(|name| {
                    anyhow::anyhow!("Неизвестное приложение '{{{}}}' в команде '{}'", name, command)
                })?;
                if command.trim().is_empty() {
                    anyhow::bail!("Пустая команда запуска");
                }
                Ok(Action::Spawn { command })
            }
            other => Ok(other.clone()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация хоста
        match self.host.backend.as_str() {
            "x11" => {}
            _ => anyhow::bail!("Неизвестный бэкенд хоста: {}", self.host.backend),
        }

        if self.host.polling_interval_ms < 100 {
            anyhow::bail!("polling_interval_ms должно быть минимум 100");
        }

        if Modifiers::new().with(&self.mod_key).is_none() {
            anyhow::bail!("Неверный mod_key: {}", self.mod_key);
        }

        self.validate_groups()?;
        self.validate_keys()?;
        self.validate_mouse()?;
        self.validate_colors()?;
        self.validate_layouts()?;

        for (i, rule) in self.floating.rules.iter().enumerate() {
            if rule.is_empty() {
                anyhow::bail!("Пустое правило плавающих окон #{}", i + 1);
            }
        }

        for (i, rule) in self.swallow.ignore.iter().enumerate() {
            if rule.is_empty() {
                anyhow::bail!("Пустое правило swallow.ignore #{}", i + 1);
            }
        }

        Ok(())
    }

    fn validate_groups(&self) -> Result<()> {
        if self.groups.is_empty() {
            anyhow::bail!("Нужна хотя бы одна группа");
        }

        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.is_empty() {
                anyhow::bail!("Пустое имя группы");
            }
            if !seen.insert(group.as_str()) {
                anyhow::bail!("Группа '{}' объявлена дважды", group);
            }
        }
        Ok(())
    }

    fn validate_keys(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for resolved in self.resolved_keys()? {
            if !seen.insert(resolved.chord.clone()) {
                anyhow::bail!("Сочетание {} назначено дважды", resolved.chord);
            }
            if let Some(group) = resolved.action.group() {
                if !self.groups.iter().any(|g| g == group) {
                    anyhow::bail!("Сочетание {} ссылается на неизвестную группу '{}'", resolved.chord, group);
                }
            }
        }
        Ok(())
    }

    fn validate_mouse(&self) -> Result<()> {
        for (i, binding) in self.mouse.iter().enumerate() {
            Modifiers::from_names(&binding.modifiers, &self.mod_key).map_err(|m| {
                anyhow::anyhow!("Неверный модификатор '{}' в привязке мыши #{}", m, i + 1)
            })?;

            if bindings::parse_button(&binding.button).is_none() {
                anyhow::bail!("Неверная кнопка мыши '{}' в привязке #{}", binding.button, i + 1);
            }

            if binding.kind == MouseKind::Click && binding.start.is_some() {
                anyhow::bail!("start допустим только для drag (привязка мыши #{})", i + 1);
            }

            self.resolve_action(&binding.action)?;
        }
        Ok(())
    }

    /// Все ссылки на цвета в конфигурации с указанием места
    fn color_refs(&self) -> Vec<(String, &ColorRef)> {
        let mut refs: Vec<(String, &ColorRef)> = Vec::new();

        refs.push(("bar.background".to_string(), &self.bar.background));
        for color in self.layout_defaults.colors() {
            refs.push(("layout_defaults".to_string(), color));
        }
        for (i, layout) in self.layouts.iter().enumerate() {
            for color in layout.params.colors() {
                refs.push((format!("layouts[{}]", i), color));
            }
        }
        for color in self.floating.border_focus.iter().chain(self.floating.border_normal.iter()) {
            refs.push(("floating".to_string(), color));
        }
        for (i, widget) in self.bar.widgets.iter().enumerate() {
            for color in widget.colors() {
                refs.push((format!("bar.widgets[{}] {}", i, widget.name()), color));
            }
        }
        refs
    }

    fn validate_colors(&self) -> Result<()> {
        for (i, pair) in self.colors.iter().enumerate() {
            for hex in [&pair.0, &pair.1] {
                if appearance::parse_hex_color(hex).is_none() {
                    anyhow::bail!("Неверный цвет '{}' в colors[{}]", hex, i);
                }
            }
        }

        for (place, color) in self.color_refs() {
            let hex = appearance::resolve_color(color, &self.colors)
                .map_err(|e| anyhow::anyhow!("{}: {}", place, e))?;
            if appearance::parse_hex_color(hex).is_none() {
                anyhow::bail!("{}: неверный цвет '{}'", place, hex);
            }
        }
        Ok(())
    }

    fn validate_layouts(&self) -> Result<()> {
        if self.layouts.is_empty() {
            anyhow::bail!("Нужна хотя бы одна раскладка");
        }

        for (i, layout) in self.layouts.iter().enumerate() {
            if let Some(ratio) = layout.effective(&self.layout_defaults).ratio {
                if !(ratio > 0.0 && ratio < 1.0) {
                    anyhow::bail!("ratio раскладки #{} должно быть в (0, 1): {}", i + 1, ratio);
                }
            }
        }

        for (i, widget) in self.bar.widgets.iter().enumerate() {
            if let Err(e) = widget.check_params() {
                anyhow::bail!("Виджет #{}: {}", i + 1, e);
            }
            if let Widget::TextBox { on_click: Some(action), .. } = widget {
                self.resolve_action(action)?;
            }
        }
        Ok(())
    }
}
