//! Ports service

use validator::Validate;

use super::filtros::FiltrosService;
use crate::{
    display::PortaRow,
    error::{AppError, AppResult},
    models::{
        pagination,
        porta::{PortaBulkUpdate, PortaInput, PortaQuery},
        PortaSwitch,
    },
    repository::{EquipamentoStore, PortaStore, Repository},
};

#[derive(Clone)]
pub struct PortasService {
    repository: Repository,
    filtros: FiltrosService,
}

impl PortasService {
    pub fn new(repository: Repository, filtros: FiltrosService) -> Self {
        Self { repository, filtros }
    }

    /// Search ports, then narrow with the derived filters and paginate
    pub async fn list(&self, query: &PortaQuery) -> AppResult<(Vec<PortaRow>, i64)> {
        let candidates = self.repository.portas_search(query).await?;
        let rows = self.filtros.apply(query, candidates);
        let total = rows.len() as i64;
        let (limit, offset) = pagination(query.page, query.per_page);
        let page = rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(PortaRow::from)
            .collect();
        Ok((page, total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<PortaRow> {
        Ok(PortaRow::from(self.repository.portas_get_by_id(id).await?))
    }

    pub async fn create(&self, data: PortaInput) -> AppResult<PortaSwitch> {
        let data = self.check(data).await?;
        let porta = self.repository.portas_create(&data).await?;
        tracing::info!(
            "Created port {} (equipment {}, number {})",
            porta.id,
            porta.equipamento_id,
            porta.numero
        );
        Ok(porta)
    }

    pub async fn update(&self, id: i32, data: PortaInput) -> AppResult<PortaSwitch> {
        let data = self.check(data).await?;
        let porta = self.repository.portas_update(id, &data).await?;
        tracing::info!("Updated port {}", id);
        Ok(porta)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.portas_delete(id).await?;
        tracing::info!("Deleted port {}", id);
        Ok(())
    }

    /// Change status and/or VLAN of several ports at once
    pub async fn bulk_update(&self, updates: &[PortaBulkUpdate]) -> AppResult<u64> {
        for update in updates {
            update.validate()?;
        }
        if updates.is_empty() {
            return Ok(0);
        }
        let affected = self.repository.portas_bulk_update(updates).await?;
        tracing::info!("Bulk update on {} ports", affected);
        Ok(affected)
    }

    /// Field checks plus the owner type restriction
    async fn check(&self, data: PortaInput) -> AppResult<PortaInput> {
        let data = data.validated()?;
        let owner = match self.repository.equipamentos_get_by_id(data.equipamento_id).await {
            Ok(owner) => owner,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::Integrity(format!(
                    "Referência inexistente (equipamento_id = {})",
                    data.equipamento_id
                )))
            }
            Err(e) => return Err(e),
        };
        if !owner.tipo.is_network_device() {
            return Err(AppError::validation(
                "equipamento_id",
                format!(
                    "Apenas switches e roteadores possuem portas ('{}' é {})",
                    owner.nome,
                    owner.tipo.label()
                ),
            ));
        }
        Ok(data)
    }
}
