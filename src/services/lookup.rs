//! Port lookup used by the port-choice control of the admin forms

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::PortaResumo,
    repository::{EquipamentoStore, PortaStore, Repository},
};

pub const MSG_ID_AUSENTE: &str = "ID do equipamento não fornecido";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EquipamentoResumo {
    pub id: i32,
    pub nome: String,
    /// Display label of the equipment type
    pub tipo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PortasPorEquipamento {
    pub equipamento: EquipamentoResumo,
    pub portas: Vec<PortaResumo>,
}

#[derive(Clone)]
pub struct LookupService {
    repository: Repository,
}

impl LookupService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Ports of one equipment, ordered by number.
    ///
    /// `raw_id` is the query-string value as received: a missing or blank
    /// value is a bad request, a value that is not an id cannot match any
    /// equipment and is reported as not found.
    pub async fn portas_por_equipamento(&self, raw_id: Option<&str>) -> AppResult<PortasPorEquipamento> {
        let raw_id = raw_id
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::BadRequest(MSG_ID_AUSENTE.to_string()))?;
        let id: i32 = raw_id
            .parse()
            .map_err(|_| AppError::NotFound(format!("Equipamento '{}' não encontrado", raw_id)))?;

        tracing::debug!("Port lookup for equipment {}", id);
        let equipamento = self.repository.equipamentos_get_by_id(id).await?;
        let portas = self.repository.portas_by_equipamento(id).await?;

        Ok(PortasPorEquipamento {
            equipamento: EquipamentoResumo {
                id: equipamento.id,
                nome: equipamento.nome,
                tipo: equipamento.tipo.label().to_string(),
            },
            portas: portas.iter().map(PortaResumo::from).collect(),
        })
    }
}
