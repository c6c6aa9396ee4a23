//! Maintenance record (Manutencao) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{TipoEquipamento, TipoManutencao};
use crate::error::{AppError, AppResult};

/// Maintenance record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Manutencao {
    pub id: i32,
    pub equipamento_id: i32,
    pub tipo: TipoManutencao,
    pub data_hora_inicio: DateTime<Utc>,
    /// Unset while the maintenance is still running
    pub data_hora_fim: Option<DateTime<Utc>>,
    pub descricao: String,
    pub acoes_realizadas: String,
    pub responsavel: String,
    pub observacoes: Option<String>,
}

/// Maintenance joined with the equipment it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ManutencaoDetalhe {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub manutencao: Manutencao,
    pub equipamento_nome: String,
    pub equipamento_tipo: TipoEquipamento,
    pub equipamento_localizacao_nome: Option<String>,
}

/// Create / replace maintenance request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ManutencaoInput {
    pub equipamento_id: i32,
    pub tipo: TipoManutencao,
    pub data_hora_inicio: DateTime<Utc>,
    pub data_hora_fim: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "A descrição é obrigatória"))]
    pub descricao: String,
    #[validate(length(min = 1, message = "As ações realizadas são obrigatórias"))]
    pub acoes_realizadas: String,
    #[validate(length(min = 1, max = 100, message = "O responsável é obrigatório (máx. 100 caracteres)"))]
    pub responsavel: String,
    pub observacoes: Option<String>,
}

impl ManutencaoInput {
    pub fn validated(mut self) -> AppResult<Self> {
        self.descricao = self.descricao.trim().to_string();
        self.acoes_realizadas = self.acoes_realizadas.trim().to_string();
        self.responsavel = self.responsavel.trim().to_string();
        self.observacoes = self.observacoes.filter(|o| !o.trim().is_empty());
        self.validate()?;

        if let Some(fim) = self.data_hora_fim {
            if fim < self.data_hora_inicio {
                return Err(AppError::validation(
                    "data_hora_fim",
                    "O término não pode ser anterior ao início",
                ));
            }
        }
        Ok(self)
    }
}

/// Query parameters for listing maintenance records
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ManutencaoQuery {
    /// Free text over equipment name, description, actions and responsible
    pub search: Option<String>,
    pub tipo: Option<TipoManutencao>,
    pub equipamento_id: Option<i32>,
    pub responsavel: Option<String>,
    /// Date drill-down on the start timestamp
    pub ano: Option<i32>,
    pub mes: Option<u32>,
    pub dia: Option<u32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
