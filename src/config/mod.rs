use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::i18n::Lang;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub tickets: TicketConfig,
    pub pricing: PricingConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub rust_log: String,
    pub lang: Lang,
}

// Настройки базы данных
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

// Куда складывать PDF билеты и открывать ли их после печати
#[derive(Debug, Clone, Deserialize)]
pub struct TicketConfig {
    pub dir: PathBuf,
    pub open_after_render: bool,
}

// Цены за одно место по типу билета
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    pub regular: f64,
    pub student: f64,
    pub child: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self { regular: 12.0, student: 9.0, child: 7.0 }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{key} has invalid value {value:?}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

fn var_or<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.trim().parse().map_err(|_| ConfigError { key, value })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            app: AppConfig {
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "box_office=info,sqlx=warn".to_string()),
                lang: var_or("APP_LANG", "en")?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://cinema.db".to_string()),
                pool_size: var_or("DB_POOL_SIZE", "5")?,
            },
            tickets: TicketConfig {
                dir: PathBuf::from(env::var("TICKETS_DIR").unwrap_or_else(|_| "tickets".to_string())),
                open_after_render: var_or("OPEN_TICKETS", "true")?,
            },
            pricing: PricingConfig {
                regular: var_or("PRICE_REGULAR", "12.00")?,
                student: var_or("PRICE_STUDENT", "9.00")?,
                child: var_or("PRICE_CHILD", "7.00")?,
            },
        })
    }

    /// Конфигурация для тестов и встраивания: явная база и каталог билетов,
    /// PDF не открывается.
    pub fn local(database_url: impl Into<String>, tickets_dir: impl Into<PathBuf>) -> Self {
        Config {
            app: AppConfig { rust_log: "box_office=debug".to_string(), lang: Lang::En },
            database: DatabaseConfig { url: database_url.into(), pool_size: 2 },
            tickets: TicketConfig { dir: tickets_dir.into(), open_after_render: false },
            pricing: PricingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 5] = ["APP_LANG", "DB_POOL_SIZE", "OPEN_TICKETS", "PRICE_REGULAR", "PRICE_CHILD"];

    fn clear() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    // Один тест на все переменные: окружение процесса общее
    #[test]
    fn from_env_reads_and_rejects_values() {
        clear();
        let config = Config::from_env().unwrap();
        assert_eq!(config.app.lang, Lang::En);
        assert_eq!(config.database.pool_size, 5);
        assert!(config.tickets.open_after_render);
        assert_eq!(config.pricing.regular, 12.0);

        env::set_var("PRICE_CHILD", " 6.5 ");
        env::set_var("APP_LANG", "bg");
        let config = Config::from_env().unwrap();
        assert_eq!(config.pricing.child, 6.5);
        assert_eq!(config.app.lang, Lang::Bg);
        clear();

        for (key, value) in [
            ("PRICE_REGULAR", "abc"),
            ("DB_POOL_SIZE", "x"),
            ("OPEN_TICKETS", "maybe"),
            ("APP_LANG", "de"),
        ] {
            env::set_var(key, value);
            let err = Config::from_env().unwrap_err();
            assert_eq!(err.key, key);
            assert_eq!(err.value, value);
            clear();
        }
    }
}
