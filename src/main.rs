mod gateway;
mod i18n;
mod prefs;
mod router;
#[cfg(test)]
mod testutil;

use clap::{Parser, Subcommand};
use prefs::PreferenceStore;
use router::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tarjimon_channels::telegram::TelegramChannel;
use tarjimon_core::{
    config::{self, BotConfig, Config, ConfigSource},
    traits::{Channel, Translator, AUTO_DETECT},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "tarjimon", version, about = "Tarjimon: Telegram translation bot")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Telegram bot token (overrides the config file).
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    bot_token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Show the effective configuration and channel readiness.
    Status,
    /// Translate text once and print the result.
    Translate {
        /// Target language code (defaults to the configured default).
        #[arg(short, long)]
        to: Option<String>,
        /// The text to translate.
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut cfg, source) = config::load(&cli.config)?;
    cfg.apply_bot_token(cli.bot_token.clone());

    let _log_guard = init_logging(&cfg.bot)?;
    report_config_source(&cli.config, source);
    cfg.validate()?;

    match cli.command {
        Commands::Start => start(cfg).await?,
        Commands::Status => status(&cli.config, &cfg),
        Commands::Translate { to, text } => {
            if text.is_empty() {
                anyhow::bail!("no text provided. Usage: tarjimon translate [--to <code>] <text>");
            }
            let target = to
                .map(|c| c.to_lowercase())
                .unwrap_or_else(|| cfg.languages.default.clone());
            if !cfg.languages.contains(&target) {
                anyhow::bail!(
                    "unsupported language '{target}'. Supported: {}",
                    cfg.languages.codes()
                );
            }

            let translator = tarjimon_translators::build(&cfg.translator)?;
            let translated = translator
                .translate(AUTO_DETECT, &target, &text.join(" "))
                .await?;
            println!("{} {translated}", cfg.languages.flag(&target));
        }
    }

    Ok(())
}

/// Log to stdout and, unless disabled, to the configured log file.
///
/// The returned guard flushes the file writer on drop; keep it alive.
fn init_logging(bot: &BotConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&bot.log_level));

    let (file_layer, guard) = if bot.log_file.is_empty() {
        (None, None)
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&bot.log_file)
            .map_err(|e| anyhow::anyhow!("cannot open log file {}: {e}", bot.log_file))?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        (
            Some(fmt::layer().with_ansi(false).with_writer(writer)),
            Some(guard),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

fn report_config_source(path: &str, source: ConfigSource) {
    if source == ConfigSource::Defaults {
        tracing::info!("Config file not found at {path}, using defaults");
    }
}

/// Build the collaborators and run the gateway until shutdown.
async fn start(cfg: Config) -> anyhow::Result<()> {
    let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();

    if let Some(ref tg) = cfg.channel.telegram {
        if tg.enabled {
            if tg.bot_token.trim().is_empty() {
                anyhow::bail!(
                    "Telegram is enabled but bot_token is empty. \
                     Set it in config.toml or the BOT_TOKEN env var."
                );
            }
            let menu = vec![
                (cfg.commands.start.clone(), i18n::t("menu_start").to_string()),
                (
                    cfg.commands.set_language.clone(),
                    i18n::t("menu_set_language").to_string(),
                ),
            ];
            let channel = TelegramChannel::new(tg).with_menu(menu);
            channels.insert(channel.name().to_string(), Arc::new(channel));
        }
    }

    if channels.is_empty() {
        anyhow::bail!("No channels enabled. Enable at least one channel in config.toml.");
    }

    let translator: Arc<dyn Translator> =
        Arc::from(tarjimon_translators::build(&cfg.translator)?);
    let prefs = Arc::new(PreferenceStore::new(cfg.languages.default.clone()));
    let router = Router::new(prefs, translator, cfg.languages, cfg.commands);

    tracing::info!("{} starting...", cfg.bot.name);
    let gw = Arc::new(gateway::Gateway::new(Arc::new(router), channels));
    gw.run().await
}

fn status(config_path: &str, cfg: &Config) {
    println!("{} - Status Check\n", cfg.bot.name);
    println!("Config: {config_path}");
    println!(
        "Log: {}",
        if cfg.bot.log_file.is_empty() {
            "stdout only"
        } else {
            cfg.bot.log_file.as_str()
        }
    );
    println!(
        "Commands: {} | {} <code>",
        cfg.commands.start, cfg.commands.set_language
    );
    println!(
        "Translator: {} ({}s timeout)",
        cfg.translator.backend, cfg.translator.timeout_secs
    );
    println!("Default language: {}", cfg.languages.default);
    for lang in &cfg.languages.supported {
        println!("  {} {} ({})", lang.flag, lang.name, lang.code);
    }
    println!();

    match cfg.channel.telegram {
        Some(ref tg) => println!(
            "  telegram: {}",
            if tg.enabled && !tg.bot_token.is_empty() {
                "configured"
            } else if tg.enabled {
                "enabled but missing bot_token"
            } else {
                "disabled"
            }
        ),
        None => println!("  telegram: not configured"),
    }
}
