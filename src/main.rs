use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use box_office::{
    AppState,
    config::Config,
    controllers::{self, session::CashierSession, Cli, Command, Reply},
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    // stdout занят выводом кассы, логи - в stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Command::Book { no_open: true, .. } = cli.command {
        config.tickets.open_after_render = false;
    }
    let lang = cli.lang.unwrap_or(config.app.lang);

    info!("Starting box office, database {}", config.database.url);
    let state = AppState::new(config).await?;

    if let Command::Session = cli.command {
        let stdin = io::stdin();
        CashierSession::new(state, lang)
            .run(stdin.lock(), io::stdout())
            .await?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut stdout = io::stdout();
    match controllers::dispatch(&state, lang, cli.command).await? {
        Reply::Done(text) => {
            write!(stdout, "{text}")?;
            if !text.ends_with('\n') {
                writeln!(stdout)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Reply::Rejected(status) => {
            eprintln!("{status}");
            Ok(ExitCode::FAILURE)
        }
    }
}
