pub mod catalog;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod i18n;
pub mod models;
pub mod services;

use crate::error::Result;
use crate::services::{BookingService, ScheduleService, StatsService, TicketRenderer};

// Общее состояние для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub config: config::Config,
    pub schedule: ScheduleService,
    pub bookings: BookingService,
    pub stats: StatsService,
}

impl AppState {
    /// Подключение к базе, миграции и стартовая афиша.
    pub async fn new(config: config::Config) -> Result<Self> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;
        db.init().await?;

        let tickets = TicketRenderer::new(&config.tickets);
        Ok(Self {
            schedule: ScheduleService::new(db.clone()),
            bookings: BookingService::new(db.clone(), config.pricing.clone(), tickets),
            stats: StatsService::new(db.clone()),
            db,
            config,
        })
    }
}
