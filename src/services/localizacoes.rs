//! Sites service

use crate::{
    display::LocalizacaoRow,
    error::AppResult,
    models::{
        localizacao::{LocalizacaoInput, LocalizacaoQuery},
        Localizacao,
    },
    repository::{LocalizacaoStore, Repository},
};

#[derive(Clone)]
pub struct LocalizacoesService {
    repository: Repository,
}

impl LocalizacoesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List sites with their equipment count
    pub async fn list(&self, query: &LocalizacaoQuery) -> AppResult<(Vec<LocalizacaoRow>, i64)> {
        let (sites, total) = self.repository.localizacoes_list(query).await?;
        let mut rows = Vec::with_capacity(sites.len());
        for site in sites {
            let count = self.repository.localizacoes_count_equipamentos(site.id).await?;
            rows.push(LocalizacaoRow::new(site, count));
        }
        Ok((rows, total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<LocalizacaoRow> {
        let site = self.repository.localizacoes_get_by_id(id).await?;
        let count = self.repository.localizacoes_count_equipamentos(id).await?;
        Ok(LocalizacaoRow::new(site, count))
    }

    pub async fn create(&self, data: LocalizacaoInput) -> AppResult<Localizacao> {
        let data = data.validated()?;
        let site = self.repository.localizacoes_create(&data).await?;
        tracing::info!("Created site {} ({})", site.id, site.nome);
        Ok(site)
    }

    pub async fn update(&self, id: i32, data: LocalizacaoInput) -> AppResult<Localizacao> {
        let data = data.validated()?;
        let site = self.repository.localizacoes_update(id, &data).await?;
        tracing::info!("Updated site {}", id);
        Ok(site)
    }

    /// Delete a site; its equipment is kept with no site
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.localizacoes_delete(id).await?;
        tracing::info!("Deleted site {}", id);
        Ok(())
    }
}
