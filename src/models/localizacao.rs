//! Site (Localizacao) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

pub const COR_PADRAO: &str = "#FF0000";

/// Site record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Localizacao {
    pub id: i32,
    pub nome: String,
    pub endereco: String,
    pub observacoes: Option<String>,
    /// Identification colour, `#RRGGBB`
    pub cor: String,
}

/// Create / replace site request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LocalizacaoInput {
    #[validate(length(min = 1, max = 100, message = "O nome do local é obrigatório (máx. 100 caracteres)"))]
    pub nome: String,
    #[validate(length(min = 1, message = "O endereço é obrigatório"))]
    pub endereco: String,
    pub observacoes: Option<String>,
    pub cor: Option<String>,
}

impl LocalizacaoInput {
    /// Validate and normalise the input; blank notes become NULL
    pub fn validated(mut self) -> AppResult<Self> {
        self.nome = self.nome.trim().to_string();
        self.endereco = self.endereco.trim().to_string();
        self.validate()?;
        self.observacoes = self.observacoes.filter(|o| !o.trim().is_empty());
        if let Some(ref cor) = self.cor {
            if !is_hex_color(cor) {
                return Err(AppError::validation(
                    "cor",
                    format!("'{}' não é uma cor hexadecimal válida", cor),
                ));
            }
        }
        Ok(self)
    }

    /// Colour to persist, falling back to the default red
    pub fn cor_or_default(&self) -> String {
        self.cor
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_else(|| COR_PADRAO.to_string())
    }
}

/// Accepts `#RGB` and `#RRGGBB`
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Query parameters for listing sites
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct LocalizacaoQuery {
    /// Free text over name and address
    pub search: Option<String>,
    /// Exact name
    pub nome: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> LocalizacaoInput {
        LocalizacaoInput {
            nome: "Sede".to_string(),
            endereco: "Rua das Flores, 100".to_string(),
            observacoes: Some("  ".to_string()),
            cor: None,
        }
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#FF0000"));
        assert!(is_hex_color("#0f0"));
        assert!(!is_hex_color("FF0000"));
        assert!(!is_hex_color("#GG0000"));
        assert!(!is_hex_color("#FF00"));
    }

    #[test]
    fn test_defaults_and_blank_notes() {
        let data = input().validated().unwrap();
        assert_eq!(data.observacoes, None);
        assert_eq!(data.cor_or_default(), "#FF0000");
    }

    #[test]
    fn test_missing_address_is_rejected() {
        let mut data = input();
        data.endereco = "   ".to_string();
        let err = data.validated().unwrap_err();
        assert_eq!(err.field(), Some("endereco"));
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let mut data = input();
        data.cor = Some("red".to_string());
        assert_eq!(data.validated().unwrap_err().field(), Some("cor"));
    }
}
