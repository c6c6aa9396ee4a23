//! Equipment service

use crate::{
    display::{EquipamentoRow, ManutencaoRow},
    error::{AppError, AppResult},
    models::{
        equipamento::{EquipamentoAtivoUpdate, EquipamentoInput, EquipamentoQuery},
        manutencao::ManutencaoQuery,
        Equipamento, PortaSwitch,
    },
    repository::{EquipamentoStore, ManutencaoStore, PortaStore, Repository},
};

#[derive(Clone)]
pub struct EquipamentosService {
    repository: Repository,
}

impl EquipamentosService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &EquipamentoQuery) -> AppResult<(Vec<EquipamentoRow>, i64)> {
        let (rows, total) = self.repository.equipamentos_list(query).await?;
        Ok((rows.into_iter().map(EquipamentoRow::from).collect(), total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<EquipamentoRow> {
        let detalhe = self.repository.equipamentos_get_detalhe(id).await?;
        Ok(EquipamentoRow::from(detalhe))
    }

    pub async fn create(&self, data: EquipamentoInput) -> AppResult<Equipamento> {
        let data = data.validated()?;
        let equipamento = self.repository.equipamentos_create(&data).await?;
        tracing::info!(
            "Created equipment {} ({} {})",
            equipamento.id,
            equipamento.tipo.code(),
            equipamento.nome
        );
        Ok(equipamento)
    }

    /// Update equipment. A missing password keeps the stored one.
    ///
    /// Equipment that owns ports must stay a switch or router.
    pub async fn update(&self, id: i32, data: EquipamentoInput) -> AppResult<Equipamento> {
        let data = data.validated()?;
        if !data.tipo.is_network_device() {
            let portas = self.repository.portas_by_equipamento(id).await?;
            if !portas.is_empty() {
                return Err(AppError::validation(
                    "tipo",
                    format!(
                        "Equipamento com {} porta(s) cadastrada(s) deve ser switch ou roteador ({} informado)",
                        portas.len(),
                        data.tipo.label()
                    ),
                ));
            }
        }
        let equipamento = self.repository.equipamentos_update(id, &data).await?;
        tracing::info!("Updated equipment {}", id);
        Ok(equipamento)
    }

    /// Delete equipment with its ports and maintenance history
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.equipamentos_delete(id).await?;
        tracing::info!("Deleted equipment {}", id);
        Ok(())
    }

    /// Toggle the active flag of several equipment at once
    pub async fn set_ativo(&self, updates: &[EquipamentoAtivoUpdate]) -> AppResult<u64> {
        if updates.is_empty() {
            return Ok(0);
        }
        let affected = self.repository.equipamentos_set_ativo(updates).await?;
        tracing::info!("Bulk active update on {} equipment", affected);
        Ok(affected)
    }

    /// Ports owned by the equipment, by number
    pub async fn portas(&self, id: i32) -> AppResult<Vec<PortaSwitch>> {
        self.repository.equipamentos_get_by_id(id).await?;
        self.repository.portas_by_equipamento(id).await
    }

    pub async fn manutencoes(&self, id: i32, mut query: ManutencaoQuery) -> AppResult<(Vec<ManutencaoRow>, i64)> {
        self.repository.equipamentos_get_by_id(id).await?;
        query.equipamento_id = Some(id);
        let (rows, total) = self.repository.manutencoes_list(&query).await?;
        Ok((rows.into_iter().map(ManutencaoRow::from).collect(), total))
    }
}
