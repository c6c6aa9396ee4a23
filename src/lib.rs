//! Rede network inventory
//!
//! REST JSON server tracking sites, network equipment, switch/router ports
//! and their interconnections, and the maintenance history of each device.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
        }
    }
}
