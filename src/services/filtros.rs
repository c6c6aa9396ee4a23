//! Derived list filters for ports
//!
//! Options are always computed from existing rows, so a filter never offers
//! a choice that yields an empty list. New filters only need a `ListFilter`
//! impl and an entry in `FiltrosService::new`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{porta::PortaQuery, PortaDetalhe},
    repository::{EquipamentoStore, LocalizacaoStore, Repository},
};

/// One `(id, label)` choice of a filter dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FilterOption {
    pub id: i32,
    pub label: String,
}

/// A registered filter with its current options
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FilterDescription {
    pub parameter_name: String,
    pub title: String,
    pub options: Vec<FilterOption>,
}

#[async_trait]
pub trait ListFilter: Send + Sync {
    /// Query-string key carrying the selected id
    fn parameter_name(&self) -> &'static str;

    fn title(&self) -> &'static str;

    async fn lookups(&self, repository: &Repository) -> AppResult<Vec<FilterOption>>;

    /// Whether `row` relates to the selected id
    fn matches(&self, selected: i32, row: &PortaDetalhe) -> bool;

    /// Narrow `candidates` to the selected id. An empty selection leaves
    /// them untouched; a value that is not an id matches nothing.
    fn apply(&self, selected: Option<&str>, candidates: Vec<PortaDetalhe>) -> Vec<PortaDetalhe> {
        let selected = match selected.map(str::trim) {
            None | Some("") => return candidates,
            Some(value) => value,
        };
        match selected.parse::<i32>() {
            Ok(id) => candidates
                .into_iter()
                .filter(|row| self.matches(id, row))
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Switches and routers that some port is connected to
pub struct EquipamentoConectadoFilter;

#[async_trait]
impl ListFilter for EquipamentoConectadoFilter {
    fn parameter_name(&self) -> &'static str {
        "equipamento_conectado"
    }

    fn title(&self) -> &'static str {
        "equipamento conectado (roteadores e switches)"
    }

    async fn lookups(&self, repository: &Repository) -> AppResult<Vec<FilterOption>> {
        let targets = repository.equipamentos_connected_targets().await?;
        Ok(targets
            .into_iter()
            .filter(|e| e.tipo.is_network_device())
            .map(|e| FilterOption {
                id: e.id,
                label: format!("{} - {}", e.tipo.label(), e.nome),
            })
            .collect())
    }

    fn matches(&self, selected: i32, row: &PortaDetalhe) -> bool {
        row.porta.equipamento_conectado_id == Some(selected)
    }
}

/// Sites owning equipment that some port is connected to
pub struct LocalizacaoConectadaFilter;

#[async_trait]
impl ListFilter for LocalizacaoConectadaFilter {
    fn parameter_name(&self) -> &'static str {
        "localizacao_equipamento_conectado"
    }

    fn title(&self) -> &'static str {
        "localização do equipamento conectado"
    }

    async fn lookups(&self, repository: &Repository) -> AppResult<Vec<FilterOption>> {
        let sites = repository.localizacoes_with_connected_equipment().await?;
        Ok(sites
            .into_iter()
            .map(|l| FilterOption {
                id: l.id,
                label: l.nome,
            })
            .collect())
    }

    fn matches(&self, selected: i32, row: &PortaDetalhe) -> bool {
        row.conectado_localizacao_id == Some(selected)
    }
}

/// Value of a derived filter parameter in a port query
fn selected_value<'a>(query: &'a PortaQuery, parameter: &str) -> Option<&'a str> {
    match parameter {
        "equipamento_conectado" => query.equipamento_conectado.as_deref(),
        "localizacao_equipamento_conectado" => query.localizacao_equipamento_conectado.as_deref(),
        _ => None,
    }
}

#[derive(Clone)]
pub struct FiltrosService {
    repository: Repository,
    filters: Vec<Arc<dyn ListFilter>>,
}

impl FiltrosService {
    pub fn new(repository: Repository) -> Self {
        Self {
            repository,
            filters: vec![
                Arc::new(EquipamentoConectadoFilter),
                Arc::new(LocalizacaoConectadaFilter),
            ],
        }
    }

    /// Every registered filter with its options
    pub async fn describe(&self) -> AppResult<Vec<FilterDescription>> {
        let mut out = Vec::with_capacity(self.filters.len());
        for filter in &self.filters {
            out.push(FilterDescription {
                parameter_name: filter.parameter_name().to_string(),
                title: filter.title().to_string(),
                options: filter.lookups(&self.repository).await?,
            });
        }
        Ok(out)
    }

    /// Run every registered filter over the candidates
    pub fn apply(&self, query: &PortaQuery, candidates: Vec<PortaDetalhe>) -> Vec<PortaDetalhe> {
        self.filters.iter().fold(candidates, |rows, filter| {
            filter.apply(selected_value(query, filter.parameter_name()), rows)
        })
    }
}
