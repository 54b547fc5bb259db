mod browser;
mod chat;
mod error;
mod extract;
mod models;
mod output;
mod pipeline;
mod utils;

use std::io::{self, Write};

use clap::Parser;
use colored::Colorize;
use eyre::Result;
use log::info;

use crate::browser::{Browser, WebDriverBrowser};
use crate::chat::client::ChatCompletionClient;
use crate::pipeline::Pipeline;
use crate::utils::cli::{Args, Command};
use crate::utils::config::{Config, config};
use crate::utils::log::Logger;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    Logger::init(args.verbosity);

    info!(
        "starting talent-scout {}",
        format!("v{}", env!("CARGO_PKG_VERSION")).magenta()
    );

    let config: Config = config(args.config)?;

    match args.command {
        Command::Login => login(&config).await,
        Command::Run {
            query,
            location,
            max_profiles,
        } => run(&config, &query, &location, max_profiles).await,
    }
}

async fn login(config: &Config) -> Result<()> {
    let mut browser_config = config.browser.clone();
    browser_config.headless = false;

    let browser = WebDriverBrowser::launch(&browser_config).await?;
    let captured = browser.capture_login(wait_for_enter).await;
    Box::new(browser).close().await?;

    captured?.save(&config.browser.session_file)
}

fn wait_for_enter() -> Result<()> {
    print!(
        "{}",
        "Log in using the browser window, then press Enter here to save the session: ".cyan()
    );
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(())
}

async fn run(config: &Config, query: &str, location: &str, max_profiles: usize) -> Result<()> {
    // a missing model id must stop the run before the browser starts
    let client = ChatCompletionClient::from_config(&config.llm)?;
    let pipeline = Pipeline::new(config, client)?;

    let browser = WebDriverBrowser::with_session(&config.browser).await?;
    let report = pipeline
        .run(Box::new(browser), query, location, max_profiles)
        .await?;

    for profile in &report.profiles {
        info!(
            "{} ({} experience entries)",
            profile.name,
            profile.experience_entries.len()
        );
    }

    let summary = report.summary;
    println!("\n{}", "=== Final Results ===".cyan().bold());
    println!("{} {}", "profiles visited:".bold(), summary.profiles_visited);
    println!("{} {}", "shortlisted:".green(), summary.shortlisted);
    println!("{} {}", "rejected:".red(), summary.rejected);
    if summary.failed > 0 {
        println!("{} {}", "not analyzed:".yellow(), summary.failed);
    }
    println!(
        "results saved to {} and {}",
        config.output.shortlisted.display(),
        config.output.rejected.display()
    );

    Ok(())
}
