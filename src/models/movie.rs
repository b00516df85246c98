use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Movie {
    pub movie_id: String,
    pub title: String,
}

// Строка админской таблицы: фильм и сколько у него прожекций
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct MovieShowCount {
    pub title: String,
    pub shows: i64,
}

/// Slug из названия: нижний регистр, пробелы -> `_`, только `[a-z0-9_]`.
/// Если ничего не осталось - `movie`.
pub fn make_slug(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|ch| matches!(ch, 'a'..='z' | '0'..='9' | '_'))
        .collect();

    if cleaned.is_empty() {
        "movie".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn slug_examples() {
        assert_eq!(make_slug("True Romance 2"), "true_romance_2");
        assert_eq!(make_slug("  Pulp Fiction  "), "pulp_fiction");
        assert_eq!(make_slug("Amélie: Part II"), "amlie_part_ii");
        assert_eq!(make_slug("Кръстникът"), "movie");
        assert_eq!(make_slug(""), "movie");
    }

    proptest! {
        #[test]
        fn slug_is_never_empty_and_stays_in_alphabet(title in "\\PC{0,40}") {
            let slug = make_slug(&title);
            prop_assert!(!slug.is_empty());
            prop_assert!(slug.chars().all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_')));
        }

        #[test]
        fn slug_is_idempotent(title in "[A-Za-z0-9 ]{1,30}") {
            let once = make_slug(&title);
            prop_assert_eq!(make_slug(&once), once.clone());
        }
    }
}
