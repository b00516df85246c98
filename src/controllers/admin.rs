use crate::controllers::ShowArgs;
use crate::error::{BoxOfficeError, Result};
use crate::i18n::Lang;
use crate::AppState;

// Таблица фильмов с числом прожекций
pub async fn movies(state: &AppState, lang: Lang) -> Result<String> {
    let m = lang.messages();
    let rows = state.schedule.movies_with_show_counts().await?;

    let width = rows
        .iter()
        .map(|r| r.title.chars().count())
        .chain(std::iter::once(m.stats_movie_column.chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = format!("{:<width$}  {}\n", m.stats_movie_column, m.admin_shows_column);
    for row in rows {
        out.push_str(&format!("{:<width$}  {}\n", row.title, row.shows));
    }
    Ok(out)
}

pub async fn shows(state: &AppState, lang: Lang, title: &str) -> Result<String> {
    let m = lang.messages();
    if state.schedule.find_movie(title).await?.is_none() {
        return Err(BoxOfficeError::MovieNotFound(title.trim().to_string()));
    }

    let mut out = format!("{}: {}\n", m.movie_label, title.trim());
    for hall in state.schedule.halls_for_movie(title).await? {
        let times = state.schedule.show_times(title, &hall).await?;
        out.push_str(&format!("  {}: {}\n", hall, times.join(", ")));
    }
    Ok(out)
}

pub async fn add_movie(state: &AppState, lang: Lang, title: &str) -> Result<String> {
    let added = state.schedule.add_movie(title).await?;
    if !added.inserted {
        return Ok(lang.movie_exists(&added.movie_id));
    }
    Ok(lang.movie_added(title.trim(), &added.movie_id))
}

pub async fn add_show(state: &AppState, lang: Lang, show: &ShowArgs) -> Result<String> {
    let added = state.schedule.add_show(&show.movie, &show.hall, &show.time).await?;
    Ok(lang.show_added(show.movie.trim(), &added.hall, &added.show_time))
}
