//! Maintenance service

use crate::{
    display::ManutencaoRow,
    error::AppResult,
    models::{
        manutencao::{ManutencaoInput, ManutencaoQuery},
        Manutencao,
    },
    repository::{ManutencaoStore, Repository},
};

#[derive(Clone)]
pub struct ManutencoesService {
    repository: Repository,
}

impl ManutencoesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Most recent first
    pub async fn list(&self, query: &ManutencaoQuery) -> AppResult<(Vec<ManutencaoRow>, i64)> {
        let (rows, total) = self.repository.manutencoes_list(query).await?;
        Ok((rows.into_iter().map(ManutencaoRow::from).collect(), total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ManutencaoRow> {
        Ok(ManutencaoRow::from(self.repository.manutencoes_get_by_id(id).await?))
    }

    pub async fn create(&self, data: ManutencaoInput) -> AppResult<Manutencao> {
        let data = data.validated()?;
        let manutencao = self.repository.manutencoes_create(&data).await?;
        tracing::info!(
            "Recorded {} maintenance {} on equipment {}",
            manutencao.tipo.code(),
            manutencao.id,
            manutencao.equipamento_id
        );
        Ok(manutencao)
    }

    pub async fn update(&self, id: i32, data: ManutencaoInput) -> AppResult<Manutencao> {
        let data = data.validated()?;
        let manutencao = self.repository.manutencoes_update(id, &data).await?;
        tracing::info!("Updated maintenance {}", id);
        Ok(manutencao)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.manutencoes_delete(id).await?;
        tracing::info!("Deleted maintenance {}", id);
        Ok(())
    }
}
