//! Coded domain enums
//!
//! Every enum is stored as its short code (`SW`, `PREV`, `1G`, ...) and
//! rendered with a Portuguese label. Both live in the single table given to
//! `coded_enum!`, so no other module maps codes to labels.

use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Postgres,
};
use thiserror::Error;
use utoipa::ToSchema;

/// A stored code that matches no variant
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} code '{code}'")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: String,
}

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => ($code:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $( #[serde(rename = $code)] $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Short code persisted in the database
            pub fn code(self) -> &'static str {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            /// Human-readable label shown in listings
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }

            pub fn from_code(code: &str) -> Result<Self, UnknownCode> {
                match code {
                    $( $code => Ok($name::$variant), )+
                    other => Err(UnknownCode {
                        kind: stringify!($name),
                        code: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::from_code(s)
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, Postgres> for $name {
            fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
                let code = <&str as sqlx::Decode<Postgres>>::decode(value)?;
                Ok($name::from_code(code)?)
            }
        }

        impl<'q> sqlx::Encode<'q, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
                <&str as sqlx::Encode<Postgres>>::encode(self.code(), buf)
            }
        }
    };
}

coded_enum! {
    /// Kind of network equipment
    TipoEquipamento {
        Switch => ("SW", "Switch"),
        Roteador => ("RT", "Roteador"),
        AccessPoint => ("AP", "Access Point"),
        Servidor => ("SR", "Servidor"),
        PcDesktop => ("PC", "PC Desktop"),
        Notebook => ("NB", "Notebook"),
        Outro => ("OT", "Outro"),
    }
}

impl TipoEquipamento {
    /// Switches and routers are the only equipment that own ports
    pub fn is_network_device(self) -> bool {
        matches!(self, TipoEquipamento::Switch | TipoEquipamento::Roteador)
    }
}

coded_enum! {
    /// Negotiated link speed of a port
    Velocidade {
        Mbps100 => ("100M", "100Mbps"),
        Gbps1 => ("1G", "1Gbps"),
        Gbps10 => ("10G", "10Gbps"),
        Gbps25 => ("25G", "25Gbps"),
        Gbps40 => ("40G", "40Gbps"),
        Gbps100 => ("100G", "100Gbps"),
        Outra => ("OUTRA", "Outra"),
    }
}

coded_enum! {
    Duplex {
        Half => ("half", "Half-Duplex"),
        Full => ("full", "Full-Duplex"),
    }
}

coded_enum! {
    /// Uplink role of a port. "No role" is stored as NULL.
    TipoConexao {
        Tx => ("TX", "Transmissão (TX) - Fornece internet"),
        Rx => ("RX", "Recepção (RX) - Recebe internet"),
    }
}

/// Label used when a port has no uplink role
pub const TIPO_CONEXAO_NENHUM: &str = "Nenhum";

coded_enum! {
    /// Kind of maintenance performed
    TipoManutencao {
        Preventiva => ("PREV", "Preventiva"),
        Corretiva => ("CORR", "Corretiva"),
        Melhoria => ("MELH", "Melhoria"),
        Configuracao => ("CONF", "Configuração"),
        Outra => ("OUTR", "Outra"),
    }
}

/// Label for an optional uplink role
pub fn tipo_conexao_label(tipo: Option<TipoConexao>) -> &'static str {
    tipo.map(TipoConexao::label).unwrap_or(TIPO_CONEXAO_NENHUM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_table() {
        for tipo in TipoEquipamento::ALL {
            assert_eq!(TipoEquipamento::from_code(tipo.code()), Ok(*tipo));
        }
        for tipo in TipoManutencao::ALL {
            assert_eq!(tipo.code().parse::<TipoManutencao>(), Ok(*tipo));
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(TipoEquipamento::Roteador.label(), "Roteador");
        assert_eq!(TipoEquipamento::AccessPoint.to_string(), "Access Point");
        assert_eq!(TipoManutencao::Configuracao.label(), "Configuração");
        assert_eq!(Velocidade::Gbps10.label(), "10Gbps");
        assert_eq!(Duplex::Full.label(), "Full-Duplex");
    }

    #[test]
    fn test_unknown_code() {
        let err = TipoEquipamento::from_code("XX").unwrap_err();
        assert_eq!(err.kind, "TipoEquipamento");
        assert_eq!(err.code, "XX");
    }

    #[test]
    fn test_network_devices() {
        let network: Vec<_> = TipoEquipamento::ALL
            .iter()
            .filter(|t| t.is_network_device())
            .collect();
        assert_eq!(network, vec![&TipoEquipamento::Switch, &TipoEquipamento::Roteador]);
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&TipoEquipamento::Servidor).unwrap();
        assert_eq!(json, "\"SR\"");
        let parsed: Velocidade = serde_json::from_str("\"OUTRA\"").unwrap();
        assert_eq!(parsed, Velocidade::Outra);
    }

    #[test]
    fn test_tipo_conexao_none_label() {
        assert_eq!(tipo_conexao_label(None), "Nenhum");
        assert_eq!(tipo_conexao_label(Some(TipoConexao::Tx)), "Transmissão (TX) - Fornece internet");
    }
}
