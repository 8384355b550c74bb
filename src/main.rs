use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};
use std::sync::Arc;
mod config;
mod error;
mod events;
mod mappings;
mod services;
mod utils;

use config::{Config, LoggingConfig};
use services::create_window_watcher;

#[derive(Parser, Debug)]
#[command(name = "tilerc")]
#[command(about = "Конфигурация тайлингового WM и демон проглатывания окон терминала")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "tilerc.toml")]
    config: String,

    /// Режим сухого запуска (без реальных окон)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.level)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Запустить демон проглатывания окон (по умолчанию)
    Run,
    /// Проверить конфигурацию и вывести сводку
    Check,
    /// Вывести полную таблицу привязок клавиш
    Keys,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);

    // Инициализация системы логирования
    init_tracing(&config.logging, args.log_level.as_deref())?;

    match args.command.unwrap_or(Command::Run) {
        Command::Run => run_daemon(config, &args).await,
        Command::Check => print_summary(&config, &args.config),
        Command::Keys => print_keys(&config),
    }
}

async fn run_daemon(config: Arc<Config>, args: &Args) -> Result<()> {
    info!("Запуск tilerc v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные окна не трогаем");
    } else {
        // Проверка окружения X11
        utils::tools::check_x11_environment()?;
    }

    let window_watcher = create_window_watcher(config.clone(), args.dry_run)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut window_handle = tokio::spawn(async move {
        if let Err(e) = window_watcher.run(shutdown_rx).await {
            error!("Ошибка в WindowWatcher: {}", e);
        }
    });

    info!("Все сервисы запущены");

    // Ожидание сигнала завершения или падения наблюдателя
    tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
            Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
        },
        _ = &mut window_handle => {
            warn!("WindowWatcher завершился раньше времени");
            return Ok(());
        }
    }

    info!("Завершение работы...");

    // Наблюдатель сам показывает скрытые окна перед выходом
    let _ = shutdown_tx.send(true);

    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    match tokio::time::timeout(shutdown_timeout, window_handle).await {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    info!("tilerc завершил работу");
    Ok(())
}

fn print_summary(config: &Config, path: &str) -> Result<()> {
    let keys = config.resolved_keys()?;

    println!("Конфигурация {} корректна", path);
    println!("  привязки клавиш: {} (из них групповых: {})", keys.len(), config.groups.len() * 2);
    println!("  привязки мыши:   {}", config.mouse.len());
    println!("  группы:          {}", config.groups.join(" "));
    println!(
        "  раскладки:       {}",
        config
            .layouts
            .iter()
            .map(|l| format!("{:?}", l.kind))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  панель:          {} px, {} виджетов",
        config.bar.size,
        config.bar.widgets.len()
    );
    println!("  палитра:         {} цветов", config.colors.len());
    println!("  плавающие окна:  {} правил", config.floating.rules.len());
    println!(
        "  проглатывание:   {} (исключений: {})",
        if config.swallow.enabled { "включено" } else { "выключено" },
        config.swallow.ignore.len()
    );
    Ok(())
}

fn print_keys(config: &Config) -> Result<()> {
    for binding in config.resolved_keys()? {
        println!(
            "{:<32} {:<48} {}",
            binding.chord.to_string(),
            binding.action.to_string(),
            binding.desc
        );
    }
    Ok(())
}

fn init_tracing(logging: &LoggingConfig, level_override: Option<&str>) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let directive = match level_override {
        Some(level) => level.to_string(),
        None => format!("{},{}", logging.level, logging.filter),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directive))?;

    let fmt_layer = match logging.format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().boxed(),
        "compact" => tracing_subscriber::fmt::layer().compact().boxed(),
        _ => tracing_subscriber::fmt::layer().pretty().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
