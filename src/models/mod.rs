//! Data models for the Rede inventory

pub mod enums;
pub mod equipamento;
pub mod localizacao;
pub mod manutencao;
pub mod porta;

// Re-export commonly used types
pub use enums::{Duplex, TipoConexao, TipoEquipamento, TipoManutencao, Velocidade};
pub use equipamento::{Equipamento, EquipamentoDetalhe};
pub use localizacao::Localizacao;
pub use manutencao::{Manutencao, ManutencaoDetalhe};
pub use porta::{PortaDetalhe, PortaResumo, PortaSwitch};

/// Default page size for list queries
pub const DEFAULT_PER_PAGE: i64 = 50;

/// Resolve `page`/`per_page` into `(limit, offset)`
pub fn pagination(page: Option<i64>, per_page: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, 500);
    (per_page, (page - 1) * per_page)
}
