//! Отчёт "билеты по фильмам" для кассы.

use crate::error::Result;
use crate::i18n::Lang;
use crate::AppState;

pub async fn stats(state: &AppState, lang: Lang) -> Result<String> {
    let m = lang.messages();
    let rows = state.stats.by_movie().await?;

    let width = rows
        .iter()
        .map(|r| r.title.chars().count())
        .chain(std::iter::once(m.stats_movie_column.chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = format!("{}\n", m.stats_title);
    out.push_str(&format!(
        "{:<width$}  {:>7}  {:>9}\n",
        m.stats_movie_column, m.stats_tickets_column, m.total_label
    ));
    for row in rows {
        out.push_str(&format!("{:<width$}  {:>7}  {:>9.2}\n", row.title, row.tickets, row.revenue));
    }
    Ok(out)
}
