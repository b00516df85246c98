//! Интерактивная касса: одна строка - одно действие кассира.
//!
//! Повторяет поток окна кассы: фильм -> зал -> время -> места -> имя ->
//! подтверждение. Выбор мест живёт только в этой сессии.

use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::controllers::{admin, analytics, bookings};
use crate::error::{BoxOfficeError, Result};
use crate::i18n::Lang;
use crate::models::seat::{join_seat_list, parse_seat_list};
use crate::models::{NewBooking, TicketType};
use crate::services::SeatSelection;
use crate::AppState;

const HELP: &str = "\
commands:
  movies                  list movies
  movie <title>           pick a movie
  hall <hall>             pick a hall
  time <time>             pick a showtime and show the seat map
  seat <A1> [B2 ...]      toggle seats
  map                     seat map
  name <client>           client name
  type <regular|student|child>
  summary                 current reservation
  confirm                 book selected seats
  cancel <code>           cancel a booking
  booking <code>          show a booking
  stats                   tickets per movie
  lang <en|bg>
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionReply {
    Text(String),
    Quit,
}

pub struct CashierSession {
    state: AppState,
    lang: Lang,
    movie: Option<String>,
    hall: Option<String>,
    time: Option<String>,
    client_name: String,
    ticket_type: TicketType,
    selection: SeatSelection,
}

impl CashierSession {
    pub fn new(state: AppState, lang: Lang) -> Self {
        Self {
            state,
            lang,
            movie: None,
            hall: None,
            time: None,
            client_name: String::new(),
            ticket_type: TicketType::default(),
            selection: SeatSelection::new(),
        }
    }

    pub fn selection(&self) -> &SeatSelection {
        &self.selection
    }

    /// Крутит сессию до `quit` или конца ввода.
    pub async fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        let m = self.lang.messages();
        writeln!(output, "{}\n{}\n(help for commands)", m.app_title, m.subtitle)?;

        for line in input.lines() {
            let line = line?;
            match self.handle(&line).await? {
                SessionReply::Text(text) if text.is_empty() => {}
                SessionReply::Text(text) => writeln!(output, "{text}")?,
                SessionReply::Quit => break,
            }
            output.flush()?;
        }
        info!("Cashier session closed");
        Ok(())
    }

    pub async fn handle(&mut self, line: &str) -> Result<SessionReply> {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        debug!("session command {:?} {:?}", command, arg);

        let result = match command.to_lowercase().as_str() {
            "" => Ok(String::new()),
            "help" | "?" => Ok(HELP.to_string()),
            "quit" | "exit" => return Ok(SessionReply::Quit),
            "movies" => admin::movies(&self.state, self.lang).await,
            "movie" => self.pick_movie(arg).await,
            "hall" => self.pick_hall(arg).await,
            "time" => self.pick_time(arg).await,
            "seat" | "seats" => self.toggle_seats(arg),
            "map" => self.seat_map(),
            "name" => {
                self.client_name = arg.to_string();
                Ok(self.summary())
            }
            "type" => arg.parse::<TicketType>().map(|t| {
                self.ticket_type = t;
                self.summary()
            }),
            "summary" => Ok(self.summary()),
            "confirm" => self.confirm().await,
            "cancel" => self.cancel(arg).await,
            "booking" => bookings::lookup(&self.state, self.lang, arg, false).await,
            "stats" => analytics::stats(&self.state, self.lang).await,
            "lang" => match arg.parse::<Lang>() {
                Ok(lang) => {
                    self.lang = lang;
                    Ok(self.summary())
                }
                Err(e) => Ok(e),
            },
            other => Ok(format!("unknown command {other:?}\n{HELP}")),
        };

        match result {
            Ok(text) => Ok(SessionReply::Text(text)),
            Err(e) if e.is_user_facing() => Ok(SessionReply::Text(self.lang.status(&e))),
            Err(e) => Err(e),
        }
    }

    /* ---------- выбор прожекции ---------- */

    async fn pick_movie(&mut self, title: &str) -> Result<String> {
        if self.state.schedule.find_movie(title).await?.is_none() {
            return Err(BoxOfficeError::MovieNotFound(title.to_string()));
        }
        self.movie = Some(title.to_string());
        self.hall = None;
        self.time = None;
        self.selection.set_show(None, Default::default());

        let halls = self.state.schedule.halls_for_movie(title).await?;
        Ok(format!("{}: {}", self.lang.messages().hall_label, halls.join(", ")))
    }

    async fn pick_hall(&mut self, hall: &str) -> Result<String> {
        let movie = self.movie.clone().ok_or(BoxOfficeError::NoShowSelected)?;
        let halls = self.state.schedule.halls_for_movie(&movie).await?;
        if !halls.iter().any(|h| h == hall) {
            return Err(BoxOfficeError::NoShowSelected);
        }
        self.hall = Some(hall.to_string());
        self.time = None;
        self.selection.set_show(None, Default::default());

        let times = self.state.schedule.show_times(&movie, hall).await?;
        Ok(format!("{}: {}", self.lang.messages().time_label, times.join(", ")))
    }

    async fn pick_time(&mut self, time: &str) -> Result<String> {
        let (movie, hall) = match (&self.movie, &self.hall) {
            (Some(movie), Some(hall)) => (movie.clone(), hall.clone()),
            _ => return Err(BoxOfficeError::NoShowSelected),
        };
        let times = self.state.schedule.show_times(&movie, &hall).await?;
        if !times.iter().any(|t| t == time) {
            return Err(BoxOfficeError::NoShowSelected);
        }

        let key = self.state.schedule.resolve_show(&movie, &hall, time).await?;
        let taken = self.state.bookings.taken_seats(&key).await?;
        self.time = Some(time.to_string());
        self.selection.set_show(Some(key), taken);
        self.seat_map()
    }

    /* ---------- места ---------- */

    fn toggle_seats(&mut self, arg: &str) -> Result<String> {
        if self.selection.show().is_none() {
            return Err(BoxOfficeError::NoShowSelected);
        }
        let seats = parse_seat_list(&arg.replace(char::is_whitespace, ","))?;
        if seats.is_empty() {
            return Err(BoxOfficeError::InvalidSeat(arg.to_string()));
        }
        // команда применяется целиком или не применяется вовсе
        if let Some(taken) = seats.iter().find(|seat| self.selection.is_taken(seat)) {
            return Err(BoxOfficeError::SeatTaken(*taken));
        }
        for seat in seats {
            self.selection.toggle(seat)?;
        }
        Ok(self.summary())
    }

    fn seat_map(&self) -> Result<String> {
        if self.selection.show().is_none() {
            return Err(BoxOfficeError::NoShowSelected);
        }
        Ok(format!("{}{}", self.selection.render_grid(), self.lang.messages().seat_legend))
    }

    /* ---------- бронь ---------- */

    async fn confirm(&mut self) -> Result<String> {
        let (movie, hall, time) = match (&self.movie, &self.hall, &self.time) {
            (Some(movie), Some(hall), Some(time)) => (movie.clone(), hall.clone(), time.clone()),
            _ => return Err(BoxOfficeError::NoShowSelected),
        };

        let request = NewBooking {
            movie_title: movie,
            hall,
            show_time: time,
            client_name: self.client_name.clone(),
            seats: self.selection.selected(),
            ticket_type: self.ticket_type,
        };

        let confirmed = match self.state.bookings.confirm(request).await {
            Ok(confirmed) => confirmed,
            Err(e @ BoxOfficeError::SeatsTaken(_)) => {
                // кто-то успел раньше - подтягиваем свежую схему зала
                self.reload_taken().await?;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        self.selection.clear();
        self.client_name.clear();
        self.reload_taken().await?;
        Ok(bookings::confirmed_text(self.lang, &confirmed))
    }

    async fn cancel(&mut self, code: &str) -> Result<String> {
        let text = bookings::cancel(&self.state, self.lang, code).await?;
        self.reload_taken().await?;
        Ok(text)
    }

    async fn reload_taken(&mut self) -> Result<()> {
        if let Some(show) = self.selection.show().cloned() {
            let taken = self.state.bookings.taken_seats(&show).await?;
            self.selection.reload_taken(taken);
        }
        Ok(())
    }

    fn summary(&self) -> String {
        let m = self.lang.messages();
        let dash = "—";
        let seats = self.selection.selected();
        let seats = if seats.is_empty() { dash.to_string() } else { join_seat_list(&seats, ", ") };
        let client = if self.client_name.trim().is_empty() { dash } else { self.client_name.trim() };

        format!(
            "{}: {}\n{}: {}\n{}: {}\n{}: {}\n{}: {}\n{}: {}",
            m.movie_label,
            self.movie.as_deref().unwrap_or(dash),
            m.hall_label,
            self.hall.as_deref().unwrap_or(dash),
            m.time_label,
            self.time.as_deref().unwrap_or(dash),
            m.client_summary,
            client,
            m.seats_summary,
            seats,
            m.ticket_type_label,
            self.ticket_type,
        )
    }
}
