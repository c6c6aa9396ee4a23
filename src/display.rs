//! Presentation helpers for admin list rows
//!
//! Everything here is pure: rows are built from the joined `*Detalhe`
//! records the store returns, so no extra lookups happen per row.

use askama::Template;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    enums::tipo_conexao_label, EquipamentoDetalhe, Localizacao, ManutencaoDetalhe, PortaDetalhe,
    TipoEquipamento,
};

pub const SEM_LOCALIZACAO: &str = "Sem localização";
pub const EM_ANDAMENTO: &str = "Em andamento";
pub const PLACEHOLDER: &str = "-";

const ENDERECO_CURTO: usize = 50;

#[derive(Template)]
#[template(source = r#"<span style="color: {{ cor }};">{{ nome }}</span>"#, ext = "html")]
struct ColoredLabelTemplate<'a> {
    nome: &'a str,
    cor: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"<div style="width: 50px; height: 20px; background-color: {{ cor }};"></div>"#,
    ext = "html"
)]
struct ColorPreviewTemplate<'a> {
    cor: &'a str,
}

/// Site name wrapped in its identification colour
pub fn colored_label(nome: &str, cor: &str) -> String {
    ColoredLabelTemplate { nome, cor }.to_string()
}

pub fn color_preview(cor: Option<&str>) -> String {
    match cor.filter(|c| !c.is_empty()) {
        Some(cor) => ColorPreviewTemplate { cor }.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// First 50 characters followed by `...`, or empty when there is no address
pub fn truncated_address(endereco: &str) -> String {
    if endereco.is_empty() {
        return String::new();
    }
    let head: String = endereco.chars().take(ENDERECO_CURTO).collect();
    format!("{}...", head)
}

/// Elapsed time as `{h}h {m}m`, truncated. Whole days count as hours.
pub fn duration(inicio: DateTime<Utc>, fim: Option<DateTime<Utc>>) -> String {
    match fim {
        Some(fim) => {
            let minutes = (fim - inicio).num_minutes().max(0);
            format!("{}h {}m", minutes / 60, minutes % 60)
        }
        None => EM_ANDAMENTO.to_string(),
    }
}

pub fn equipment_count_label(count: i64) -> String {
    format!("{} equipamentos", count)
}

/// Navigation target for a related record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Link {
    pub id: i32,
    pub label: String,
}

/// Serialises as the link object, or as `"-"` when the relation is empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CrossRef {
    Link(Link),
    Empty(String),
}

pub fn link(id: Option<i32>, label: impl Into<String>) -> CrossRef {
    match id {
        Some(id) => CrossRef::Link(Link {
            id,
            label: label.into(),
        }),
        None => CrossRef::Empty(PLACEHOLDER.to_string()),
    }
}

pub fn equipamento_repr(tipo: TipoEquipamento, nome: &str, localizacao: Option<&str>) -> String {
    format!(
        "{} - {} ({})",
        tipo.label(),
        nome,
        localizacao.unwrap_or(SEM_LOCALIZACAO)
    )
}

pub fn porta_repr(tipo: TipoEquipamento, equipamento: &str, numero: i32) -> String {
    format!("{} {} - Porta {}", tipo.label(), equipamento, numero)
}

pub fn manutencao_repr(detalhe: &ManutencaoDetalhe) -> String {
    format!(
        "{} em {} - {}",
        detalhe.manutencao.tipo.label(),
        equipamento_repr(
            detalhe.equipamento_tipo,
            &detalhe.equipamento_nome,
            detalhe.equipamento_localizacao_nome.as_deref()
        ),
        detalhe.manutencao.data_hora_inicio.format("%d/%m/%Y %H:%M")
    )
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocalizacaoRow {
    #[serde(flatten)]
    pub localizacao: Localizacao,
    pub colored_name: String,
    pub endereco_curto: String,
    pub cor_preview: String,
    pub qtd_equipamentos: i64,
    pub qtd_equipamentos_label: String,
    /// Equipment list filtered by this site
    pub equipamentos_url: String,
}

impl LocalizacaoRow {
    pub fn new(localizacao: Localizacao, qtd_equipamentos: i64) -> Self {
        Self {
            colored_name: colored_label(&localizacao.nome, &localizacao.cor),
            endereco_curto: truncated_address(&localizacao.endereco),
            cor_preview: color_preview(Some(&localizacao.cor)),
            qtd_equipamentos_label: equipment_count_label(qtd_equipamentos),
            equipamentos_url: format!("/api/v1/equipamentos?localizacao_id={}", localizacao.id),
            qtd_equipamentos,
            localizacao,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipamentoRow {
    #[serde(flatten)]
    pub detalhe: EquipamentoDetalhe,
    pub repr: String,
    pub tipo_display: String,
    pub localizacao_link: CrossRef,
}

impl From<EquipamentoDetalhe> for EquipamentoRow {
    fn from(detalhe: EquipamentoDetalhe) -> Self {
        let e = &detalhe.equipamento;
        Self {
            repr: equipamento_repr(e.tipo, &e.nome, detalhe.localizacao_nome.as_deref()),
            tipo_display: e.tipo.label().to_string(),
            localizacao_link: link(
                e.localizacao_id,
                detalhe.localizacao_nome.clone().unwrap_or_default(),
            ),
            detalhe,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PortaRow {
    #[serde(flatten)]
    pub detalhe: PortaDetalhe,
    pub repr: String,
    pub equipamento_link: CrossRef,
    pub equipamento_conectado_link: CrossRef,
    pub tipo_conexao_display: String,
}

impl From<PortaDetalhe> for PortaRow {
    fn from(detalhe: PortaDetalhe) -> Self {
        let p = &detalhe.porta;
        let conectado_label = match (detalhe.equipamento_conectado_tipo, &detalhe.equipamento_conectado_nome) {
            (Some(tipo), Some(nome)) => {
                equipamento_repr(tipo, nome, detalhe.conectado_localizacao_nome.as_deref())
            }
            _ => String::new(),
        };
        Self {
            repr: porta_repr(detalhe.equipamento_tipo, &detalhe.equipamento_nome, p.numero),
            equipamento_link: link(
                Some(p.equipamento_id),
                equipamento_repr(
                    detalhe.equipamento_tipo,
                    &detalhe.equipamento_nome,
                    detalhe.equipamento_localizacao_nome.as_deref(),
                ),
            ),
            equipamento_conectado_link: link(p.equipamento_conectado_id, conectado_label),
            tipo_conexao_display: tipo_conexao_label(p.tipo_conexao).to_string(),
            detalhe,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ManutencaoRow {
    #[serde(flatten)]
    pub detalhe: ManutencaoDetalhe,
    pub repr: String,
    pub tipo_display: String,
    pub equipamento_link: CrossRef,
    pub duracao: String,
}

impl From<ManutencaoDetalhe> for ManutencaoRow {
    fn from(detalhe: ManutencaoDetalhe) -> Self {
        let m = &detalhe.manutencao;
        Self {
            repr: manutencao_repr(&detalhe),
            tipo_display: m.tipo.label().to_string(),
            equipamento_link: link(
                Some(m.equipamento_id),
                equipamento_repr(
                    detalhe.equipamento_tipo,
                    &detalhe.equipamento_nome,
                    detalhe.equipamento_localizacao_nome.as_deref(),
                ),
            ),
            duracao: duration(m.data_hora_inicio, m.data_hora_fim),
            detalhe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Manutencao, TipoManutencao};
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, h, m, 0).unwrap()
    }

    #[test]
    fn test_duration() {
        assert_eq!(duration(at(10, 0), Some(at(12, 30))), "2h 30m");
        assert_eq!(duration(at(10, 0), Some(at(10, 0))), "0h 0m");
        assert_eq!(duration(at(10, 0), None), "Em andamento");
    }

    #[test]
    fn test_duration_truncates_and_counts_days() {
        let fim = Utc.with_ymd_and_hms(2024, 5, 11, 11, 15, 59).unwrap();
        assert_eq!(duration(at(10, 0), Some(fim)), "25h 15m");
    }

    #[test]
    fn test_colored_label_escapes() {
        assert_eq!(
            colored_label("Sede", "#FF0000"),
            r#"<span style="color: #FF0000;">Sede</span>"#
        );
        assert_eq!(
            colored_label("<b>A&B", "#000"),
            r#"<span style="color: #000;">&lt;b&gt;A&amp;B</span>"#
        );
        assert_eq!(
            color_preview(Some("red\"><script>")),
            r#"<div style="width: 50px; height: 20px; background-color: red&quot;&gt;&lt;script&gt;;"></div>"#
        );
    }

    #[test]
    fn test_color_preview() {
        assert_eq!(
            color_preview(Some("#00FF00")),
            r#"<div style="width: 50px; height: 20px; background-color: #00FF00;"></div>"#
        );
        assert_eq!(color_preview(None), "-");
        assert_eq!(color_preview(Some("")), "-");
    }

    #[test]
    fn test_truncated_address() {
        assert_eq!(truncated_address(""), "");
        assert_eq!(truncated_address("Rua A"), "Rua A...");
        let long = "Avenida Engenheiro Luís Carlos Berrini, 1500, Cidade Monções";
        let short = truncated_address(long);
        assert_eq!(short.chars().count(), 53);
        assert!(short.starts_with("Avenida Engenheiro Luís Carlos Berrini, 1500, Cida"));
    }

    #[test]
    fn test_link_placeholder() {
        assert_eq!(link(None, "x"), CrossRef::Empty("-".to_string()));
        assert_eq!(
            serde_json::to_value(link(None, "x")).unwrap(),
            serde_json::json!("-")
        );
        assert_eq!(
            serde_json::to_value(link(Some(4), "Sede")).unwrap(),
            serde_json::json!({"id": 4, "label": "Sede"})
        );
    }

    #[test]
    fn test_reprs() {
        assert_eq!(
            equipamento_repr(TipoEquipamento::Switch, "Core", None),
            "Switch - Core (Sem localização)"
        );
        assert_eq!(
            equipamento_repr(TipoEquipamento::AccessPoint, "AP-1", Some("Sede")),
            "Access Point - AP-1 (Sede)"
        );
        assert_eq!(
            porta_repr(TipoEquipamento::Roteador, "Borda", 7),
            "Roteador Borda - Porta 7"
        );

        let detalhe = ManutencaoDetalhe {
            manutencao: Manutencao {
                id: 1,
                equipamento_id: 2,
                tipo: TipoManutencao::Configuracao,
                data_hora_inicio: at(9, 5),
                data_hora_fim: None,
                descricao: "VLANs".to_string(),
                acoes_realizadas: "Criadas".to_string(),
                responsavel: "Ana".to_string(),
                observacoes: None,
            },
            equipamento_nome: "Core".to_string(),
            equipamento_tipo: TipoEquipamento::Switch,
            equipamento_localizacao_nome: Some("Sede".to_string()),
        };
        assert_eq!(
            manutencao_repr(&detalhe),
            "Configuração em Switch - Core (Sede) - 10/05/2024 09:05"
        );
        let row = ManutencaoRow::from(detalhe);
        assert_eq!(row.duracao, "Em andamento");
        assert_eq!(row.tipo_display, "Configuração");
    }

    #[test]
    fn test_count_label() {
        assert_eq!(equipment_count_label(3), "3 equipamentos");
    }
}
