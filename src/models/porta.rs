//! Switch/router port (PortaSwitch) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{Duplex, TipoConexao, TipoEquipamento, Velocidade};
use crate::error::AppResult;

/// Port record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PortaSwitch {
    pub id: i32,
    /// Owning switch or router
    pub equipamento_id: i32,
    pub numero: i32,
    pub descricao: Option<String>,
    pub equipamento_conectado_id: Option<i32>,
    pub vlan: Option<String>,
    pub velocidade: Option<Velocidade>,
    pub duplex: Option<Duplex>,
    pub tipo_conexao: Option<TipoConexao>,
    /// Port is active
    pub status: bool,
    pub data_cadastro: DateTime<Utc>,
    pub data_atualizacao: DateTime<Utc>,
}

/// Port joined with the names it is displayed with
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PortaDetalhe {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub porta: PortaSwitch,
    pub equipamento_nome: String,
    pub equipamento_tipo: TipoEquipamento,
    pub equipamento_localizacao_nome: Option<String>,
    pub equipamento_conectado_nome: Option<String>,
    pub equipamento_conectado_tipo: Option<TipoEquipamento>,
    /// Site of the connected equipment
    pub conectado_localizacao_id: Option<i32>,
    pub conectado_localizacao_nome: Option<String>,
}

/// Reduced port shape returned by the port lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PortaResumo {
    pub id: i32,
    pub numero: i32,
    pub descricao: Option<String>,
}

impl From<&PortaSwitch> for PortaResumo {
    fn from(p: &PortaSwitch) -> Self {
        Self {
            id: p.id,
            numero: p.numero,
            descricao: p.descricao.clone(),
        }
    }
}

/// Create / replace port request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PortaInput {
    pub equipamento_id: i32,
    #[validate(range(min = 1, message = "O número da porta deve ser positivo"))]
    pub numero: i32,
    #[validate(length(max = 200))]
    pub descricao: Option<String>,
    pub equipamento_conectado_id: Option<i32>,
    #[validate(length(max = 50))]
    pub vlan: Option<String>,
    pub velocidade: Option<Velocidade>,
    pub duplex: Option<Duplex>,
    /// `""`, `"TX"` or `"RX"`
    #[serde(default, deserialize_with = "empty_as_none")]
    pub tipo_conexao: Option<TipoConexao>,
    #[serde(default = "default_true")]
    pub status: bool,
}

fn default_true() -> bool {
    true
}

/// The admin form submits an empty string for "no role"
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<TipoConexao>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => TipoConexao::from_code(code)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl PortaInput {
    pub fn validated(mut self) -> AppResult<Self> {
        self.descricao = self.descricao.filter(|d| !d.trim().is_empty());
        self.vlan = self
            .vlan
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        self.validate()?;
        Ok(self)
    }
}

/// Bulk edit of the list-editable port columns
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PortaBulkUpdate {
    pub id: i32,
    pub status: Option<bool>,
    /// `Some("")` clears the VLAN
    #[validate(length(max = 50))]
    pub vlan: Option<String>,
}

/// Query parameters for listing ports
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PortaQuery {
    /// Free text over owner name, description and connected equipment name
    pub search: Option<String>,
    pub equipamento_id: Option<i32>,
    pub status: Option<bool>,
    pub vlan: Option<String>,
    pub tipo_conexao: Option<TipoConexao>,
    /// Derived filter: connected switch/router id
    pub equipamento_conectado: Option<String>,
    /// Derived filter: site id of the connected equipment
    pub localizacao_equipamento_conectado: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tipo_conexao_is_none() {
        let input: PortaInput = serde_json::from_value(serde_json::json!({
            "equipamento_id": 1,
            "numero": 3,
            "tipo_conexao": ""
        }))
        .unwrap();
        assert_eq!(input.tipo_conexao, None);
        assert!(input.status);

        let input: PortaInput = serde_json::from_value(serde_json::json!({
            "equipamento_id": 1,
            "numero": 3,
            "tipo_conexao": "RX"
        }))
        .unwrap();
        assert_eq!(input.tipo_conexao, Some(TipoConexao::Rx));
    }

    #[test]
    fn test_unknown_tipo_conexao_is_rejected() {
        let result: Result<PortaInput, _> = serde_json::from_value(serde_json::json!({
            "equipamento_id": 1,
            "numero": 3,
            "tipo_conexao": "XY"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_port_number_must_be_positive() {
        let input: PortaInput = serde_json::from_value(serde_json::json!({
            "equipamento_id": 1,
            "numero": 0
        }))
        .unwrap();
        assert_eq!(input.validated().unwrap_err().field(), Some("numero"));
    }
}
