//! tickets.rs
//!
//! PDF билет на одну бронь: A6 альбомная, фиксированная раскладка.
//!
//! Билет пишется в `{dir}/{code}.pdf` и, если включено в конфиге,
//! открывается системным просмотрщиком. Ошибка открытия только логируется.

use chrono::{Local, NaiveDateTime};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use crate::config::TicketConfig;
use crate::error::Result;
use crate::models::Booking;

// A6 landscape, мм
const PAGE_W: f32 = 148.0;
const PAGE_H: f32 = 105.0;
const MARGIN: f32 = 3.5;
const HEADER_H: f32 = 8.5;
const PADDING: f32 = 5.5;

const BG_PAGE: u32 = 0xe5e7eb;
const CARD_BG: u32 = 0xffffff;
const BORDER: u32 = 0xd1d5db;
const ACCENT: u32 = 0x2563eb;
const ACCENT_SOFT: u32 = 0xdbeafe;
const TEXT_MAIN: u32 = 0x111827;
const TEXT_MUTED: u32 = 0x6b7280;

/// Поля билета - снимок брони на момент печати.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketData {
    pub booking_code: String,
    pub movie_title: String,
    pub hall: String,
    pub show_time: String,
    pub client_name: String,
    pub seats: Vec<String>,
}

impl From<&Booking> for TicketData {
    fn from(booking: &Booking) -> Self {
        TicketData {
            booking_code: booking.booking_code.clone(),
            movie_title: booking.movie_title.clone(),
            hall: booking.hall.clone(),
            show_time: booking.show_time.clone(),
            client_name: booking.client_name.clone(),
            seats: booking
                .seats
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TicketRenderer {
    dir: PathBuf,
    open_after_render: bool,
}

impl TicketRenderer {
    pub fn new(config: &TicketConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            open_after_render: config.open_after_render,
        }
    }

    pub fn path_for(&self, booking_code: &str) -> PathBuf {
        self.dir.join(format!("{booking_code}.pdf"))
    }

    /// Рендерит и сохраняет билет, затем пытается его открыть.
    pub fn issue(&self, booking: &Booking) -> Result<PathBuf> {
        let ticket = TicketData::from(booking);
        let bytes = render_ticket(&ticket, Local::now().naive_local())?;

        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&ticket.booking_code);
        fs::write(&path, bytes)?;
        info!("Ticket written to {}", path.display());

        if self.open_after_render {
            open_with_default_viewer(&path);
        }
        Ok(path)
    }
}

/// Одна страница, раскладка не зависит от данных - длинные поля обрезаются.
pub fn render_ticket(ticket: &TicketData, issued_at: NaiveDateTime) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Ticket {}", ticket.booking_code),
        Mm(PAGE_W),
        Mm(PAGE_H),
        "ticket",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    // фон и карта
    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG_PAGE);
    layer.set_outline_color(color(BORDER));
    layer.set_outline_thickness(1.0);
    layer.set_fill_color(color(CARD_BG));
    layer.add_rect(
        Rect::new(Mm(MARGIN), Mm(MARGIN), Mm(PAGE_W - MARGIN), Mm(PAGE_H - MARGIN))
            .with_mode(PaintMode::FillStroke),
    );

    // шапка
    let header_y = PAGE_H - MARGIN - HEADER_H;
    fill_rect(&layer, MARGIN, header_y, PAGE_W - MARGIN, PAGE_H - MARGIN, ACCENT_SOFT);

    let left = MARGIN + PADDING;
    let right = PAGE_W - MARGIN - PADDING;

    text(&layer, "CINEMA TICKET", 11.0, left, header_y + 2.5, &bold, ACCENT);
    text_right(&layer, &ticket.booking_code, 16.0, right, header_y + 2.8, &bold, TEXT_MAIN);

    let seats = ticket.seats.join(", ");
    let hall_time = format!("{}  ·  {}", ticket.hall, ticket.show_time);
    let fields: [(&str, String, f32, &IndirectFontRef); 4] = [
        ("Movie", truncate(&ticket.movie_title, 40), 12.0, &bold),
        ("Hall / Time", hall_time, 11.0, &regular),
        ("Seats", truncate(&seats, 50), 11.0, &regular),
        ("Client", truncate(&ticket.client_name, 40), 11.0, &regular),
    ];

    let mut y = header_y - 5.0;
    for (label, value, size, font) in fields {
        text(&layer, label, 8.0, left, y, &regular, TEXT_MUTED);
        y -= 4.6;
        text(&layer, &value, size, left, y, font, TEXT_MAIN);
        y -= 6.3;
    }

    // подвал
    let footer_y = MARGIN + 4.2;
    let issued = format!("Issued: {}", issued_at.format("%Y-%m-%d %H:%M"));
    text(&layer, &issued, 7.0, left, footer_y, &regular, TEXT_MUTED);
    text_right(&layer, "Cinema Desktop System", 7.0, right, footer_y, &regular, TEXT_MUTED);

    Ok(doc.save_to_bytes()?)
}

/// Открыть файл программой по умолчанию. Не критично: при ошибке только warn.
pub fn open_with_default_viewer(path: &Path) {
    let spawned = if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", ""]).arg(path).spawn()
    } else if cfg!(target_os = "macos") {
        Command::new("open").arg(path).spawn()
    } else {
        Command::new("xdg-open").arg(path).spawn()
    };

    match spawned {
        Ok(_) => debug!("Opened {} in default viewer", path.display()),
        Err(e) => warn!("Could not open PDF automatically: {}", e),
    }
}

/* ---------- drawing helpers ---------- */

fn color(hex: u32) -> Color {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    Color::Rgb(Rgb::new(channel(16), channel(8), channel(0), None))
}

fn fill_rect(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32, fill: u32) {
    layer.set_fill_color(color(fill));
    layer.add_rect(Rect::new(Mm(x1), Mm(y1), Mm(x2), Mm(y2)).with_mode(PaintMode::Fill));
}

fn text(layer: &PdfLayerReference, value: &str, size: f32, x: f32, y: f32, font: &IndirectFontRef, fill: u32) {
    layer.set_fill_color(color(fill));
    layer.use_text(value, size, Mm(x), Mm(y), font);
}

fn text_right(layer: &PdfLayerReference, value: &str, size: f32, right: f32, y: f32, font: &IndirectFontRef, fill: u32) {
    let x = right - approx_text_width_mm(value, size);
    text(layer, value, size, x, y, font, fill);
}

// Метрик шрифта у builtin Helvetica под рукой нет - берём средние ширины глифов
fn approx_text_width_mm(value: &str, size: f32) -> f32 {
    let em: f32 = value
        .chars()
        .map(|c| match c {
            '0'..='9' => 0.556,
            'A'..='Z' => 0.70,
            ' ' => 0.278,
            _ => 0.5,
        })
        .sum();
    em * size * 25.4 / 72.0
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> TicketData {
        TicketData {
            booking_code: "AB12CD34".into(),
            movie_title: "Lost Highway".into(),
            hall: "Hall 4".into(),
            show_time: "19:00".into(),
            client_name: "Pete Dayton".into(),
            seats: vec!["C5".into(), "C6".into()],
        }
    }

    #[test]
    fn renders_a_pdf_document() {
        let issued = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(18, 30, 0))
            .unwrap();
        let bytes = render_ticket(&sample(), issued).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn truncates_by_chars_not_bytes() {
        assert_eq!(truncate("Кръстникът", 4), "Кръс");
        assert_eq!(truncate("short", 40), "short");
    }

    #[test]
    fn wider_text_is_wider() {
        assert!(approx_text_width_mm("WWWW", 10.0) > approx_text_width_mm("1111", 10.0));
    }
}
