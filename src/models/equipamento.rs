//! Equipment (Equipamento) model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::net::Ipv4Addr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::TipoEquipamento;
use crate::error::{AppError, AppResult};

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipamento {
    pub id: i32,
    pub nome: String,
    pub tipo: TipoEquipamento,
    pub modelo: String,
    pub marca: String,
    pub numero_serie: Option<String>,
    /// Management IPv4 address
    pub ip_gerencia: Option<String>,
    /// Management access port (1-65535)
    pub porta: Option<i32>,
    pub usuario: Option<String>,
    /// Stored in plain text; never serialized
    #[serde(skip_serializing, default)]
    pub senha: Option<String>,
    pub localizacao_id: Option<i32>,
    pub andar: Option<String>,
    pub sala: Option<String>,
    pub data_instalacao: Option<NaiveDate>,
    pub garantia_ate: Option<NaiveDate>,
    pub observacoes: Option<String>,
    pub ativo: bool,
}

/// Equipment joined with its site, as shown in listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipamentoDetalhe {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub equipamento: Equipamento,
    pub localizacao_nome: Option<String>,
    pub localizacao_cor: Option<String>,
}

/// Create / replace equipment request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EquipamentoInput {
    #[validate(length(min = 1, max = 100, message = "O nome do equipamento é obrigatório (máx. 100 caracteres)"))]
    pub nome: String,
    pub tipo: TipoEquipamento,
    #[validate(length(min = 1, max = 100, message = "O modelo é obrigatório (máx. 100 caracteres)"))]
    pub modelo: String,
    #[validate(length(min = 1, max = 50, message = "A marca é obrigatória (máx. 50 caracteres)"))]
    pub marca: String,
    #[validate(length(max = 50))]
    pub numero_serie: Option<String>,
    pub ip_gerencia: Option<String>,
    #[validate(range(min = 1, max = 65535, message = "A porta deve estar entre 1 e 65535"))]
    pub porta: Option<i32>,
    #[validate(length(max = 50))]
    pub usuario: Option<String>,
    #[validate(length(max = 100))]
    pub senha: Option<String>,
    pub localizacao_id: Option<i32>,
    #[validate(length(max = 50))]
    pub andar: Option<String>,
    #[validate(length(max = 50))]
    pub sala: Option<String>,
    pub data_instalacao: Option<NaiveDate>,
    pub garantia_ate: Option<NaiveDate>,
    pub observacoes: Option<String>,
    #[serde(default = "default_true")]
    pub ativo: bool,
}

fn default_true() -> bool {
    true
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl EquipamentoInput {
    /// Validate and normalise the input
    pub fn validated(mut self) -> AppResult<Self> {
        self.nome = self.nome.trim().to_string();
        self.modelo = self.modelo.trim().to_string();
        self.marca = self.marca.trim().to_string();
        self.numero_serie = blank_to_none(self.numero_serie);
        self.ip_gerencia = blank_to_none(self.ip_gerencia);
        self.usuario = blank_to_none(self.usuario);
        self.senha = self.senha.filter(|s| !s.is_empty());
        self.andar = blank_to_none(self.andar);
        self.sala = blank_to_none(self.sala);
        self.observacoes = blank_to_none(self.observacoes);
        self.validate()?;

        if let Some(ref ip) = self.ip_gerencia {
            let addr: Ipv4Addr = ip.parse().map_err(|_| {
                AppError::validation("ip_gerencia", format!("'{}' não é um endereço IPv4 válido", ip))
            })?;
            self.ip_gerencia = Some(addr.to_string());
        }
        Ok(self)
    }
}

/// Bulk toggle of the `ativo` flag from the list view
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EquipamentoAtivoUpdate {
    pub id: i32,
    pub ativo: bool,
}

/// Query parameters for listing equipment
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EquipamentoQuery {
    /// Free text over name, model, brand, serial number and IP
    pub search: Option<String>,
    pub tipo: Option<TipoEquipamento>,
    pub localizacao_id: Option<i32>,
    /// Case-insensitive match on the site name
    pub localizacao_nome: Option<String>,
    pub ativo: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
