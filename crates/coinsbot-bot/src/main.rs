mod chat;
mod compose;
mod context;
mod dispatch;
mod messages;
mod pipeline;
mod pool;
mod telegram;
mod transport;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use coinsbot_core::{AppConfig, RunMode};
use teloxide::Bot;
use tracing_subscriber::EnvFilter;

use crate::context::AppContext;
use crate::telegram::TelegramChat;

#[derive(Debug, Parser)]
#[command(name = "coinsbot")]
#[command(about = "Telegram bot turning AliExpress product links into affiliate offers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the bot in the configured transport mode (default).
    Serve,
    /// Process one product link and print the reply that would be sent.
    Check {
        /// Product or share link.
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = coinsbot_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let context = AppContext::build(&config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config, &context).await,
        Commands::Check { url } => check(&context, &url).await,
    }
}

async fn serve(config: &AppConfig, context: &AppContext) -> anyhow::Result<()> {
    let bot = Bot::new(&config.telegram_bot_token);
    let dispatcher = Arc::new(context.dispatcher(Arc::new(TelegramChat::new(bot.clone()))));

    if config.run_mode == RunMode::Webhook && config.webhook_url.is_none() {
        tracing::warn!("RUN_MODE=webhook without WEBHOOK_URL; falling back to polling");
    }

    match config.effective_run_mode() {
        RunMode::Webhook => transport::webhook::run(bot, config, dispatcher).await,
        RunMode::Polling => {
            transport::polling::run(bot, dispatcher).await;
            Ok(())
        }
    }
}

async fn check(context: &AppContext, url: &str) -> anyhow::Result<()> {
    let message = context.pipeline.run(url).await?;
    println!("{}", message.text);
    if let Some(image_url) = message.image_url {
        println!();
        println!("image: {image_url}");
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
