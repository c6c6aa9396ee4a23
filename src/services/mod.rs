//! Business logic services

pub mod equipamentos;
pub mod filtros;
pub mod localizacoes;
pub mod lookup;
pub mod manutencoes;
pub mod portas;

use crate::{
    error::AppResult,
    repository::{InventoryStore, Repository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub localizacoes: localizacoes::LocalizacoesService,
    pub equipamentos: equipamentos::EquipamentosService,
    pub portas: portas::PortasService,
    pub manutencoes: manutencoes::ManutencoesService,
    pub filtros: filtros::FiltrosService,
    pub lookup: lookup::LookupService,
    repository: Repository,
}

impl Services {
    /// Create all services over the given store
    pub fn new(repository: Repository) -> Self {
        let filtros = filtros::FiltrosService::new(repository.clone());
        Self {
            localizacoes: localizacoes::LocalizacoesService::new(repository.clone()),
            equipamentos: equipamentos::EquipamentosService::new(repository.clone()),
            portas: portas::PortasService::new(repository.clone(), filtros.clone()),
            manutencoes: manutencoes::ManutencoesService::new(repository.clone()),
            lookup: lookup::LookupService::new(repository.clone()),
            filtros,
            repository,
        }
    }

    /// Check that the store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
