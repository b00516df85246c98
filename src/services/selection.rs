use std::collections::BTreeSet;

use crate::error::{BoxOfficeError, Result};
use crate::models::seat::{NUM_COLUMNS, ROWS};
use crate::models::{SeatId, ShowKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatState {
    Free,
    Selected,
    Taken,
}

/// Выбор мест кассиром. Живёт только в текущей сессии и сверяется
/// с taken_seats при каждой смене прожекции и после каждой брони.
#[derive(Debug, Default, Clone)]
pub struct SeatSelection {
    show: Option<ShowKey>,
    taken: BTreeSet<SeatId>,
    selected: BTreeSet<SeatId>,
}

impl SeatSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self) -> Option<&ShowKey> {
        self.show.as_ref()
    }

    /// Смена прожекции сбрасывает выбор.
    pub fn set_show(&mut self, show: Option<ShowKey>, taken: BTreeSet<SeatId>) {
        self.show = show;
        self.selected.clear();
        self.taken = if self.show.is_some() { taken } else { BTreeSet::new() };
    }

    /// Свежий снимок занятых мест. Выбранные места, которые успели занять,
    /// из выбора выпадают.
    pub fn reload_taken(&mut self, taken: BTreeSet<SeatId>) {
        self.selected.retain(|seat| !taken.contains(seat));
        self.taken = taken;
    }

    /// Переключает место. Возвращает true, если место теперь выбрано.
    pub fn toggle(&mut self, seat: SeatId) -> Result<bool> {
        if self.show.is_none() {
            return Err(BoxOfficeError::NoShowSelected);
        }
        if self.taken.contains(&seat) {
            return Err(BoxOfficeError::SeatTaken(seat));
        }
        if self.selected.remove(&seat) {
            Ok(false)
        } else {
            self.selected.insert(seat);
            Ok(true)
        }
    }

    pub fn is_taken(&self, seat: &SeatId) -> bool {
        self.taken.contains(seat)
    }

    pub fn state(&self, seat: &SeatId) -> SeatState {
        if self.taken.contains(seat) {
            SeatState::Taken
        } else if self.selected.contains(seat) {
            SeatState::Selected
        } else {
            SeatState::Free
        }
    }

    pub fn selected(&self) -> Vec<SeatId> {
        self.selected.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Сетка зала по рядам.
    pub fn grid(&self) -> Vec<(char, Vec<(SeatId, SeatState)>)> {
        ROWS.iter()
            .map(|&row| {
                let cells = SeatId::all()
                    .filter(|seat| seat.row() == row)
                    .map(|seat| (seat, self.state(&seat)))
                    .collect();
                (row, cells)
            })
            .collect()
    }

    /// Текстовая схема зала для терминала.
    pub fn render_grid(&self) -> String {
        let mut out = String::from("    ");
        for col in 1..=NUM_COLUMNS {
            out.push_str(&format!("{col:>4}"));
        }
        out.push('\n');
        for (row, cells) in self.grid() {
            out.push_str(&format!("{row:>3} "));
            for (_, state) in cells {
                out.push_str(match state {
                    SeatState::Free => " [ ]",
                    SeatState::Selected => " [x]",
                    SeatState::Taken => " [#]",
                });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(s: &str) -> SeatId {
        s.parse().unwrap()
    }

    fn show() -> Option<ShowKey> {
        Some(ShowKey::new("lost_highway", "Hall 4", "19:00"))
    }

    #[test]
    fn toggling_requires_a_show() {
        let mut selection = SeatSelection::new();
        assert!(matches!(selection.toggle(seat("A1")), Err(BoxOfficeError::NoShowSelected)));
    }

    #[test]
    fn taken_seat_is_not_selectable() {
        let mut selection = SeatSelection::new();
        selection.set_show(show(), BTreeSet::from([seat("A1")]));

        assert!(matches!(selection.toggle(seat("A1")), Err(BoxOfficeError::SeatTaken(_))));
        assert!(selection.selected().is_empty());
        assert_eq!(selection.state(&seat("A1")), SeatState::Taken);
    }

    #[test]
    fn toggle_flips_selection() {
        let mut selection = SeatSelection::new();
        selection.set_show(show(), BTreeSet::new());

        assert!(selection.toggle(seat("A10")).unwrap());
        assert!(selection.toggle(seat("A2")).unwrap());
        assert_eq!(selection.selected(), vec![seat("A2"), seat("A10")]);

        assert!(!selection.toggle(seat("A10")).unwrap());
        assert_eq!(selection.selected(), vec![seat("A2")]);
    }

    #[test]
    fn reload_drops_seats_taken_meanwhile() {
        let mut selection = SeatSelection::new();
        selection.set_show(show(), BTreeSet::new());
        selection.toggle(seat("B3")).unwrap();
        selection.toggle(seat("B4")).unwrap();

        selection.reload_taken(BTreeSet::from([seat("B4")]));
        assert_eq!(selection.selected(), vec![seat("B3")]);
        assert!(selection.is_taken(&seat("B4")));
    }

    #[test]
    fn changing_show_clears_selection() {
        let mut selection = SeatSelection::new();
        selection.set_show(show(), BTreeSet::new());
        selection.toggle(seat("C1")).unwrap();

        selection.set_show(Some(ShowKey::new("godfather", "VIP Hall", "20:30")), BTreeSet::new());
        assert!(selection.selected().is_empty());

        selection.set_show(None, BTreeSet::from([seat("C1")]));
        assert!(!selection.is_taken(&seat("C1")));
    }

    #[test]
    fn grid_marks_every_state() {
        let mut selection = SeatSelection::new();
        selection.set_show(show(), BTreeSet::from([seat("A1")]));
        selection.toggle(seat("A2")).unwrap();

        let grid = selection.grid();
        assert_eq!(grid.len(), ROWS.len());
        assert_eq!(grid[0].1[0].1, SeatState::Taken);
        assert_eq!(grid[0].1[1].1, SeatState::Selected);
        assert_eq!(grid[0].1[2].1, SeatState::Free);

        let text = selection.render_grid();
        assert!(text.contains(" A  [#] [x] [ ]"));
    }
}
