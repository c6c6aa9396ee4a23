//! Repository layer: persistence of sites, equipment, ports and maintenance
//!
//! Each entity has its own store trait. `PgStore` implements them on top of
//! PostgreSQL, where integrity is enforced by constraints and foreign-key
//! actions; `MemoryStore` reproduces the same rules in process.

pub mod equipamentos;
pub mod localizacoes;
pub mod manutencoes;
pub mod memory;
pub mod portas;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipamento::{EquipamentoAtivoUpdate, EquipamentoInput, EquipamentoQuery},
        localizacao::{LocalizacaoInput, LocalizacaoQuery},
        manutencao::{ManutencaoInput, ManutencaoQuery},
        porta::{PortaBulkUpdate, PortaInput, PortaQuery},
        Equipamento, EquipamentoDetalhe, Localizacao, Manutencao, ManutencaoDetalhe, PortaDetalhe,
        PortaSwitch,
    },
};

pub use memory::MemoryStore;

pub const MSG_PORTA_DUPLICADA: &str =
    "Já existe uma porta com este número neste equipamento";

/// Shared handle used by the services
pub type Repository = Arc<dyn InventoryStore>;

#[async_trait]
pub trait LocalizacaoStore: Send + Sync {
    /// Sites matching the query, ordered by name, with the unpaginated total
    async fn localizacoes_list(&self, query: &LocalizacaoQuery) -> AppResult<(Vec<Localizacao>, i64)>;
    async fn localizacoes_get_by_id(&self, id: i32) -> AppResult<Localizacao>;
    async fn localizacoes_create(&self, data: &LocalizacaoInput) -> AppResult<Localizacao>;
    async fn localizacoes_update(&self, id: i32, data: &LocalizacaoInput) -> AppResult<Localizacao>;
    /// Delete a site; equipment referencing it lose their site
    async fn localizacoes_delete(&self, id: i32) -> AppResult<()>;
    async fn localizacoes_count_equipamentos(&self, id: i32) -> AppResult<i64>;
    /// Distinct sites owning equipment that some port is connected to, by name
    async fn localizacoes_with_connected_equipment(&self) -> AppResult<Vec<Localizacao>>;
}

#[async_trait]
pub trait EquipamentoStore: Send + Sync {
    /// Equipment ordered by site name, type code and name
    async fn equipamentos_list(&self, query: &EquipamentoQuery) -> AppResult<(Vec<EquipamentoDetalhe>, i64)>;
    async fn equipamentos_get_by_id(&self, id: i32) -> AppResult<Equipamento>;
    async fn equipamentos_get_detalhe(&self, id: i32) -> AppResult<EquipamentoDetalhe>;
    async fn equipamentos_create(&self, data: &EquipamentoInput) -> AppResult<Equipamento>;
    async fn equipamentos_update(&self, id: i32, data: &EquipamentoInput) -> AppResult<Equipamento>;
    /// Delete equipment with its ports and maintenance; ports connected to it are unlinked
    async fn equipamentos_delete(&self, id: i32) -> AppResult<()>;
    async fn equipamentos_set_ativo(&self, updates: &[EquipamentoAtivoUpdate]) -> AppResult<u64>;
    /// Distinct equipment referenced by at least one port's connected-equipment field
    async fn equipamentos_connected_targets(&self) -> AppResult<Vec<Equipamento>>;
}

#[async_trait]
pub trait PortaStore: Send + Sync {
    /// Ports matching the attribute filters, unpaginated, ordered by owner then number
    async fn portas_search(&self, query: &PortaQuery) -> AppResult<Vec<PortaDetalhe>>;
    async fn portas_get_by_id(&self, id: i32) -> AppResult<PortaDetalhe>;
    /// Ports owned by one equipment, ordered by number
    async fn portas_by_equipamento(&self, equipamento_id: i32) -> AppResult<Vec<PortaSwitch>>;
    async fn portas_create(&self, data: &PortaInput) -> AppResult<PortaSwitch>;
    async fn portas_update(&self, id: i32, data: &PortaInput) -> AppResult<PortaSwitch>;
    async fn portas_delete(&self, id: i32) -> AppResult<()>;
    async fn portas_bulk_update(&self, updates: &[PortaBulkUpdate]) -> AppResult<u64>;
}

#[async_trait]
pub trait ManutencaoStore: Send + Sync {
    /// Maintenance records, most recent start first
    async fn manutencoes_list(&self, query: &ManutencaoQuery) -> AppResult<(Vec<ManutencaoDetalhe>, i64)>;
    async fn manutencoes_get_by_id(&self, id: i32) -> AppResult<ManutencaoDetalhe>;
    async fn manutencoes_create(&self, data: &ManutencaoInput) -> AppResult<Manutencao>;
    async fn manutencoes_update(&self, id: i32, data: &ManutencaoInput) -> AppResult<Manutencao>;
    async fn manutencoes_delete(&self, id: i32) -> AppResult<()>;
}

/// Everything the services need from persistence
#[async_trait]
pub trait InventoryStore: LocalizacaoStore + EquipamentoStore + PortaStore + ManutencaoStore {
    /// Check the backend is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Translate constraint violations raised on writes into integrity errors
pub(crate) fn map_write_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        let constraint = db.constraint().unwrap_or_default().to_string();
        match db.code().as_deref() {
            Some("23505") if constraint == "portas_switch_equipamento_numero_key" => {
                return AppError::Integrity(MSG_PORTA_DUPLICADA.to_string());
            }
            Some("23505") => {
                return AppError::Integrity(format!("Registro duplicado ({})", constraint));
            }
            Some("23503") => {
                return AppError::Integrity(format!("Referência inexistente ({})", constraint));
            }
            _ => {}
        }
    }
    AppError::Database(e)
}

/// Appended after every bound ILIKE pattern
pub(crate) const LIKE_ESCAPE: &str = r" ESCAPE '\'";

/// `%term%` pattern for ILIKE searches; wildcards in the term match literally
pub(crate) fn like_pattern(term: &str) -> String {
    let term = term.trim();
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
