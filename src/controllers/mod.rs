//! Терминальный фронт кассы: подкоманды CLI и интерактивная сессия.
//!
//! Обработчики возвращают готовый текст. Доменные ошибки превращаются
//! в строку статуса на языке кассира, инфраструктурные уходят наверх.

pub mod admin;
pub mod analytics;
pub mod bookings;
pub mod session;

use clap::{Args, Parser, Subcommand};

use crate::error::Result;
use crate::i18n::Lang;
use crate::AppState;

#[derive(Debug, Parser)]
#[command(name = "box-office", version, about = "Cinema box office: seats, bookings, PDF tickets")]
pub struct Cli {
    /// Language of status messages (en, bg); overrides APP_LANG
    #[arg(long, global = true)]
    pub lang: Option<Lang>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    #[arg(long)]
    pub movie: String,
    #[arg(long)]
    pub hall: String,
    #[arg(long)]
    pub time: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List movies with their number of shows
    Movies,
    /// Halls and showtimes of one movie
    Shows { title: String },
    /// Seat map of one show
    Seats(ShowArgs),
    /// Book seats and print the ticket
    Book {
        #[command(flatten)]
        show: ShowArgs,
        #[arg(long)]
        client: String,
        /// Seat such as A5; repeat for several seats
        #[arg(long = "seat")]
        seats: Vec<String>,
        #[arg(long, default_value = "regular")]
        ticket_type: String,
        /// Do not open the PDF after printing
        #[arg(long)]
        no_open: bool,
    },
    /// Cancel a booking by its code
    Cancel { code: String },
    /// Show a booking by its code
    Booking {
        code: String,
        #[arg(long)]
        json: bool,
    },
    /// Add a movie
    AddMovie { title: String },
    /// Add a showtime for an existing movie
    AddShow(ShowArgs),
    /// Tickets per movie
    Stats,
    /// Interactive cashier session on stdin/stdout
    Session,
}

/// Выполняет одну подкоманду (кроме `session`) и возвращает текст для вывода.
/// `Reply::Rejected` - отказ, понятный кассиру; `Err` - сбой.
pub async fn dispatch(state: &AppState, lang: Lang, command: Command) -> Result<Reply> {
    let result = match command {
        Command::Movies => admin::movies(state, lang).await,
        Command::Shows { title } => admin::shows(state, lang, &title).await,
        Command::AddMovie { title } => admin::add_movie(state, lang, &title).await,
        Command::AddShow(show) => admin::add_show(state, lang, &show).await,
        Command::Seats(show) => bookings::seat_map(state, lang, &show).await,
        Command::Book { show, client, seats, ticket_type, .. } => {
            bookings::book(state, lang, &show, &client, &seats, &ticket_type).await
        }
        Command::Cancel { code } => bookings::cancel(state, lang, &code).await,
        Command::Booking { code, json } => bookings::lookup(state, lang, &code, json).await,
        Command::Stats => analytics::stats(state, lang).await,
        Command::Session => Ok(String::new()),
    };

    match result {
        Ok(text) => Ok(Reply::Done(text)),
        Err(e) if e.is_user_facing() => {
            tracing::info!("rejected: {}", e);
            Ok(Reply::Rejected(lang.status(&e)))
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Done(String),
    Rejected(String),
}
