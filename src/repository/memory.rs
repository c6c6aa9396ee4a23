//! In-process store
//!
//! Mirrors the PostgreSQL schema rules: the port (equipment, number) unique
//! key, foreign-key existence checks, cascades and SET NULL actions. Writes
//! hold the table lock for their whole duration, so a cascade is atomic.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{
    EquipamentoStore, InventoryStore, LocalizacaoStore, ManutencaoStore, PortaStore,
    MSG_PORTA_DUPLICADA,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        equipamento::{EquipamentoAtivoUpdate, EquipamentoInput, EquipamentoQuery},
        localizacao::{LocalizacaoInput, LocalizacaoQuery},
        manutencao::{ManutencaoInput, ManutencaoQuery},
        pagination,
        porta::{PortaBulkUpdate, PortaInput, PortaQuery},
        Equipamento, EquipamentoDetalhe, Localizacao, Manutencao, ManutencaoDetalhe, PortaDetalhe,
        PortaSwitch,
    },
};

#[derive(Default)]
struct Tables {
    localizacoes: BTreeMap<i32, Localizacao>,
    equipamentos: BTreeMap<i32, Equipamento>,
    portas: BTreeMap<i32, PortaSwitch>,
    manutencoes: BTreeMap<i32, Manutencao>,
    seq_localizacao: i32,
    seq_equipamento: i32,
    seq_porta: i32,
    seq_manutencao: i32,
}

fn next_id(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

fn contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(&needle.trim().to_lowercase()))
        .unwrap_or(false)
}

fn paginate<T>(rows: Vec<T>, page: Option<i64>, per_page: Option<i64>) -> (Vec<T>, i64) {
    let (limit, offset) = pagination(page, per_page);
    let total = rows.len() as i64;
    let page = rows
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
    (page, total)
}

impl Tables {
    fn localizacao_nome(&self, id: Option<i32>) -> Option<String> {
        id.and_then(|id| self.localizacoes.get(&id))
            .map(|l| l.nome.clone())
    }

    fn equipamento_detalhe(&self, e: &Equipamento) -> EquipamentoDetalhe {
        let localizacao = e.localizacao_id.and_then(|id| self.localizacoes.get(&id));
        EquipamentoDetalhe {
            equipamento: e.clone(),
            localizacao_nome: localizacao.map(|l| l.nome.clone()),
            localizacao_cor: localizacao.map(|l| l.cor.clone()),
        }
    }

    fn porta_detalhe(&self, p: &PortaSwitch) -> AppResult<PortaDetalhe> {
        let dono = self.equipamentos.get(&p.equipamento_id).ok_or_else(|| {
            AppError::Internal(format!("Porta {} sem equipamento {}", p.id, p.equipamento_id))
        })?;
        let conectado = p
            .equipamento_conectado_id
            .and_then(|id| self.equipamentos.get(&id));
        Ok(PortaDetalhe {
            porta: p.clone(),
            equipamento_nome: dono.nome.clone(),
            equipamento_tipo: dono.tipo,
            equipamento_localizacao_nome: self.localizacao_nome(dono.localizacao_id),
            equipamento_conectado_nome: conectado.map(|c| c.nome.clone()),
            equipamento_conectado_tipo: conectado.map(|c| c.tipo),
            conectado_localizacao_id: conectado.and_then(|c| c.localizacao_id),
            conectado_localizacao_nome: self
                .localizacao_nome(conectado.and_then(|c| c.localizacao_id)),
        })
    }

    fn manutencao_detalhe(&self, m: &Manutencao) -> AppResult<ManutencaoDetalhe> {
        let equipamento = self.equipamentos.get(&m.equipamento_id).ok_or_else(|| {
            AppError::Internal(format!("Manutenção {} sem equipamento {}", m.id, m.equipamento_id))
        })?;
        Ok(ManutencaoDetalhe {
            manutencao: m.clone(),
            equipamento_nome: equipamento.nome.clone(),
            equipamento_tipo: equipamento.tipo,
            equipamento_localizacao_nome: self.localizacao_nome(equipamento.localizacao_id),
        })
    }

    fn check_localizacao_ref(&self, id: Option<i32>) -> AppResult<()> {
        match id {
            Some(id) if !self.localizacoes.contains_key(&id) => Err(AppError::Integrity(
                format!("Referência inexistente (localizacao_id = {})", id),
            )),
            _ => Ok(()),
        }
    }

    fn check_equipamento_ref(&self, field: &str, id: Option<i32>) -> AppResult<()> {
        match id {
            Some(id) if !self.equipamentos.contains_key(&id) => Err(AppError::Integrity(
                format!("Referência inexistente ({} = {})", field, id),
            )),
            _ => Ok(()),
        }
    }

    fn check_porta(&self, data: &PortaInput, exclude: Option<i32>) -> AppResult<()> {
        self.check_equipamento_ref("equipamento_id", Some(data.equipamento_id))?;
        self.check_equipamento_ref("equipamento_conectado_id", data.equipamento_conectado_id)?;
        let duplicated = self.portas.values().any(|p| {
            Some(p.id) != exclude && p.equipamento_id == data.equipamento_id && p.numero == data.numero
        });
        if duplicated {
            return Err(AppError::Integrity(MSG_PORTA_DUPLICADA.to_string()));
        }
        Ok(())
    }
}

/// Store keeping every table in memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalizacaoStore for MemoryStore {
    async fn localizacoes_list(&self, query: &LocalizacaoQuery) -> AppResult<(Vec<Localizacao>, i64)> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Localizacao> = tables
            .localizacoes
            .values()
            .filter(|l| {
                query.search.as_deref().map_or(true, |s| {
                    contains(Some(&l.nome), s) || contains(Some(&l.endereco), s)
                })
            })
            .filter(|l| query.nome.as_deref().map_or(true, |n| l.nome == n))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.nome.cmp(&b.nome).then(a.id.cmp(&b.id)));
        Ok(paginate(rows, query.page, query.per_page))
    }

    async fn localizacoes_get_by_id(&self, id: i32) -> AppResult<Localizacao> {
        self.tables
            .read()
            .await
            .localizacoes
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Localização {} não encontrada", id)))
    }

    async fn localizacoes_create(&self, data: &LocalizacaoInput) -> AppResult<Localizacao> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.seq_localizacao);
        let row = Localizacao {
            id,
            nome: data.nome.clone(),
            endereco: data.endereco.clone(),
            observacoes: data.observacoes.clone(),
            cor: data.cor_or_default(),
        };
        tables.localizacoes.insert(id, row.clone());
        Ok(row)
    }

    async fn localizacoes_update(&self, id: i32, data: &LocalizacaoInput) -> AppResult<Localizacao> {
        let mut tables = self.tables.write().await;
        let row = tables
            .localizacoes
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Localização {} não encontrada", id)))?;
        row.nome = data.nome.clone();
        row.endereco = data.endereco.clone();
        row.observacoes = data.observacoes.clone();
        row.cor = data.cor_or_default();
        Ok(row.clone())
    }

    async fn localizacoes_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.localizacoes.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Localização {} não encontrada", id)));
        }
        for equipamento in tables.equipamentos.values_mut() {
            if equipamento.localizacao_id == Some(id) {
                equipamento.localizacao_id = None;
            }
        }
        Ok(())
    }

    async fn localizacoes_count_equipamentos(&self, id: i32) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .equipamentos
            .values()
            .filter(|e| e.localizacao_id == Some(id))
            .count() as i64)
    }

    async fn localizacoes_with_connected_equipment(&self) -> AppResult<Vec<Localizacao>> {
        let tables = self.tables.read().await;
        let mut ids: Vec<i32> = tables
            .portas
            .values()
            .filter_map(|p| p.equipamento_conectado_id)
            .filter_map(|id| tables.equipamentos.get(&id))
            .filter_map(|e| e.localizacao_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        let mut rows: Vec<Localizacao> = ids
            .iter()
            .filter_map(|id| tables.localizacoes.get(id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.nome.cmp(&b.nome).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}

#[async_trait]
impl EquipamentoStore for MemoryStore {
    async fn equipamentos_list(&self, query: &EquipamentoQuery) -> AppResult<(Vec<EquipamentoDetalhe>, i64)> {
        let tables = self.tables.read().await;
        let mut rows: Vec<EquipamentoDetalhe> = tables
            .equipamentos
            .values()
            .map(|e| tables.equipamento_detalhe(e))
            .filter(|d| {
                let e = &d.equipamento;
                query.search.as_deref().map_or(true, |s| {
                    contains(Some(&e.nome), s)
                        || contains(Some(&e.modelo), s)
                        || contains(Some(&e.marca), s)
                        || contains(e.numero_serie.as_deref(), s)
                        || contains(e.ip_gerencia.as_deref(), s)
                }) && query.tipo.map_or(true, |t| e.tipo == t)
                    && query.localizacao_id.map_or(true, |id| e.localizacao_id == Some(id))
                    && query
                        .localizacao_nome
                        .as_deref()
                        .map_or(true, |n| contains(d.localizacao_nome.as_deref(), n))
                    && query.ativo.map_or(true, |a| e.ativo == a)
            })
            .collect();
        rows.sort_by(|a, b| {
            let key = |d: &EquipamentoDetalhe| {
                (
                    d.localizacao_nome.is_none(),
                    d.localizacao_nome.clone(),
                    d.equipamento.tipo.code(),
                    d.equipamento.nome.clone(),
                    d.equipamento.id,
                )
            };
            key(a).cmp(&key(b))
        });
        Ok(paginate(rows, query.page, query.per_page))
    }

    async fn equipamentos_get_by_id(&self, id: i32) -> AppResult<Equipamento> {
        self.tables
            .read()
            .await
            .equipamentos
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Equipamento {} não encontrado", id)))
    }

    async fn equipamentos_get_detalhe(&self, id: i32) -> AppResult<EquipamentoDetalhe> {
        let tables = self.tables.read().await;
        tables
            .equipamentos
            .get(&id)
            .map(|e| tables.equipamento_detalhe(e))
            .ok_or_else(|| AppError::NotFound(format!("Equipamento {} não encontrado", id)))
    }

    async fn equipamentos_create(&self, data: &EquipamentoInput) -> AppResult<Equipamento> {
        let mut tables = self.tables.write().await;
        tables.check_localizacao_ref(data.localizacao_id)?;
        let id = next_id(&mut tables.seq_equipamento);
        let row = Equipamento {
            id,
            nome: data.nome.clone(),
            tipo: data.tipo,
            modelo: data.modelo.clone(),
            marca: data.marca.clone(),
            numero_serie: data.numero_serie.clone(),
            ip_gerencia: data.ip_gerencia.clone(),
            porta: data.porta,
            usuario: data.usuario.clone(),
            senha: data.senha.clone(),
            localizacao_id: data.localizacao_id,
            andar: data.andar.clone(),
            sala: data.sala.clone(),
            data_instalacao: data.data_instalacao,
            garantia_ate: data.garantia_ate,
            observacoes: data.observacoes.clone(),
            ativo: data.ativo,
        };
        tables.equipamentos.insert(id, row.clone());
        Ok(row)
    }

    async fn equipamentos_update(&self, id: i32, data: &EquipamentoInput) -> AppResult<Equipamento> {
        let mut tables = self.tables.write().await;
        if !tables.equipamentos.contains_key(&id) {
            return Err(AppError::NotFound(format!("Equipamento {} não encontrado", id)));
        }
        tables.check_localizacao_ref(data.localizacao_id)?;
        let row = tables
            .equipamentos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Equipamento {} não encontrado", id)))?;
        row.nome = data.nome.clone();
        row.tipo = data.tipo;
        row.modelo = data.modelo.clone();
        row.marca = data.marca.clone();
        row.numero_serie = data.numero_serie.clone();
        row.ip_gerencia = data.ip_gerencia.clone();
        row.porta = data.porta;
        row.usuario = data.usuario.clone();
        if data.senha.is_some() {
            row.senha = data.senha.clone();
        }
        row.localizacao_id = data.localizacao_id;
        row.andar = data.andar.clone();
        row.sala = data.sala.clone();
        row.data_instalacao = data.data_instalacao;
        row.garantia_ate = data.garantia_ate;
        row.observacoes = data.observacoes.clone();
        row.ativo = data.ativo;
        Ok(row.clone())
    }

    async fn equipamentos_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.equipamentos.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Equipamento {} não encontrado", id)));
        }
        tables.portas.retain(|_, p| p.equipamento_id != id);
        tables.manutencoes.retain(|_, m| m.equipamento_id != id);
        let now = Utc::now();
        for porta in tables.portas.values_mut() {
            if porta.equipamento_conectado_id == Some(id) {
                porta.equipamento_conectado_id = None;
                porta.data_atualizacao = now;
            }
        }
        Ok(())
    }

    async fn equipamentos_set_ativo(&self, updates: &[EquipamentoAtivoUpdate]) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        if let Some(missing) = updates.iter().find(|u| !tables.equipamentos.contains_key(&u.id)) {
            return Err(AppError::NotFound(format!("Equipamento {} não encontrado", missing.id)));
        }
        for update in updates {
            if let Some(row) = tables.equipamentos.get_mut(&update.id) {
                row.ativo = update.ativo;
            }
        }
        Ok(updates.len() as u64)
    }

    async fn equipamentos_connected_targets(&self) -> AppResult<Vec<Equipamento>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Equipamento> = tables
            .equipamentos
            .values()
            .filter(|e| {
                tables
                    .portas
                    .values()
                    .any(|p| p.equipamento_conectado_id == Some(e.id))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.nome.cmp(&b.nome).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}

#[async_trait]
impl PortaStore for MemoryStore {
    async fn portas_search(&self, query: &PortaQuery) -> AppResult<Vec<PortaDetalhe>> {
        let tables = self.tables.read().await;
        let mut rows = Vec::new();
        for porta in tables.portas.values() {
            let detalhe = tables.porta_detalhe(porta)?;
            let keep = query.search.as_deref().map_or(true, |s| {
                contains(Some(&detalhe.equipamento_nome), s)
                    || contains(porta.descricao.as_deref(), s)
                    || contains(detalhe.equipamento_conectado_nome.as_deref(), s)
            }) && query.equipamento_id.map_or(true, |id| porta.equipamento_id == id)
                && query.status.map_or(true, |s| porta.status == s)
                && query
                    .vlan
                    .as_deref()
                    .map_or(true, |v| porta.vlan.as_deref() == Some(v))
                && query
                    .tipo_conexao
                    .map_or(true, |t| porta.tipo_conexao == Some(t));
            if keep {
                rows.push(detalhe);
            }
        }
        rows.sort_by(|a, b| {
            a.equipamento_nome
                .cmp(&b.equipamento_nome)
                .then(a.porta.equipamento_id.cmp(&b.porta.equipamento_id))
                .then(a.porta.numero.cmp(&b.porta.numero))
        });
        Ok(rows)
    }

    async fn portas_get_by_id(&self, id: i32) -> AppResult<PortaDetalhe> {
        let tables = self.tables.read().await;
        let porta = tables
            .portas
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Porta {} não encontrada", id)))?;
        tables.porta_detalhe(porta)
    }

    async fn portas_by_equipamento(&self, equipamento_id: i32) -> AppResult<Vec<PortaSwitch>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<PortaSwitch> = tables
            .portas
            .values()
            .filter(|p| p.equipamento_id == equipamento_id)
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.numero);
        Ok(rows)
    }

    async fn portas_create(&self, data: &PortaInput) -> AppResult<PortaSwitch> {
        let mut tables = self.tables.write().await;
        tables.check_porta(data, None)?;
        let id = next_id(&mut tables.seq_porta);
        let now = Utc::now();
        let row = PortaSwitch {
            id,
            equipamento_id: data.equipamento_id,
            numero: data.numero,
            descricao: data.descricao.clone(),
            equipamento_conectado_id: data.equipamento_conectado_id,
            vlan: data.vlan.clone(),
            velocidade: data.velocidade,
            duplex: data.duplex,
            tipo_conexao: data.tipo_conexao,
            status: data.status,
            data_cadastro: now,
            data_atualizacao: now,
        };
        tables.portas.insert(id, row.clone());
        Ok(row)
    }

    async fn portas_update(&self, id: i32, data: &PortaInput) -> AppResult<PortaSwitch> {
        let mut tables = self.tables.write().await;
        if !tables.portas.contains_key(&id) {
            return Err(AppError::NotFound(format!("Porta {} não encontrada", id)));
        }
        tables.check_porta(data, Some(id))?;
        let row = tables
            .portas
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Porta {} não encontrada", id)))?;
        row.equipamento_id = data.equipamento_id;
        row.numero = data.numero;
        row.descricao = data.descricao.clone();
        row.equipamento_conectado_id = data.equipamento_conectado_id;
        row.vlan = data.vlan.clone();
        row.velocidade = data.velocidade;
        row.duplex = data.duplex;
        row.tipo_conexao = data.tipo_conexao;
        row.status = data.status;
        row.data_atualizacao = Utc::now();
        Ok(row.clone())
    }

    async fn portas_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .portas
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Porta {} não encontrada", id)))
    }

    async fn portas_bulk_update(&self, updates: &[PortaBulkUpdate]) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        if let Some(missing) = updates.iter().find(|u| !tables.portas.contains_key(&u.id)) {
            return Err(AppError::NotFound(format!("Porta {} não encontrada", missing.id)));
        }
        let now = Utc::now();
        for update in updates {
            if let Some(row) = tables.portas.get_mut(&update.id) {
                if let Some(status) = update.status {
                    row.status = status;
                }
                if let Some(ref vlan) = update.vlan {
                    let vlan = vlan.trim();
                    row.vlan = (!vlan.is_empty()).then(|| vlan.to_string());
                }
                row.data_atualizacao = now;
            }
        }
        Ok(updates.len() as u64)
    }
}

#[async_trait]
impl ManutencaoStore for MemoryStore {
    async fn manutencoes_list(&self, query: &ManutencaoQuery) -> AppResult<(Vec<ManutencaoDetalhe>, i64)> {
        let tables = self.tables.read().await;
        let mut rows = Vec::new();
        for manutencao in tables.manutencoes.values() {
            let detalhe = tables.manutencao_detalhe(manutencao)?;
            let inicio = manutencao.data_hora_inicio;
            let keep = query.search.as_deref().map_or(true, |s| {
                contains(Some(&detalhe.equipamento_nome), s)
                    || contains(Some(&manutencao.descricao), s)
                    || contains(Some(&manutencao.acoes_realizadas), s)
                    || contains(Some(&manutencao.responsavel), s)
            }) && query.tipo.map_or(true, |t| manutencao.tipo == t)
                && query
                    .equipamento_id
                    .map_or(true, |id| manutencao.equipamento_id == id)
                && query
                    .responsavel
                    .as_deref()
                    .map_or(true, |r| manutencao.responsavel == r)
                && query.ano.map_or(true, |a| inicio.year() == a)
                && query.mes.map_or(true, |m| inicio.month() == m)
                && query.dia.map_or(true, |d| inicio.day() == d);
            if keep {
                rows.push(detalhe);
            }
        }
        rows.sort_by(|a, b| {
            b.manutencao
                .data_hora_inicio
                .cmp(&a.manutencao.data_hora_inicio)
                .then(b.manutencao.id.cmp(&a.manutencao.id))
        });
        Ok(paginate(rows, query.page, query.per_page))
    }

    async fn manutencoes_get_by_id(&self, id: i32) -> AppResult<ManutencaoDetalhe> {
        let tables = self.tables.read().await;
        let manutencao = tables
            .manutencoes
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Manutenção {} não encontrada", id)))?;
        tables.manutencao_detalhe(manutencao)
    }

    async fn manutencoes_create(&self, data: &ManutencaoInput) -> AppResult<Manutencao> {
        let mut tables = self.tables.write().await;
        tables.check_equipamento_ref("equipamento_id", Some(data.equipamento_id))?;
        let id = next_id(&mut tables.seq_manutencao);
        let row = Manutencao {
            id,
            equipamento_id: data.equipamento_id,
            tipo: data.tipo,
            data_hora_inicio: data.data_hora_inicio,
            data_hora_fim: data.data_hora_fim,
            descricao: data.descricao.clone(),
            acoes_realizadas: data.acoes_realizadas.clone(),
            responsavel: data.responsavel.clone(),
            observacoes: data.observacoes.clone(),
        };
        tables.manutencoes.insert(id, row.clone());
        Ok(row)
    }

    async fn manutencoes_update(&self, id: i32, data: &ManutencaoInput) -> AppResult<Manutencao> {
        let mut tables = self.tables.write().await;
        if !tables.manutencoes.contains_key(&id) {
            return Err(AppError::NotFound(format!("Manutenção {} não encontrada", id)));
        }
        tables.check_equipamento_ref("equipamento_id", Some(data.equipamento_id))?;
        let row = tables
            .manutencoes
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Manutenção {} não encontrada", id)))?;
        row.equipamento_id = data.equipamento_id;
        row.tipo = data.tipo;
        row.data_hora_inicio = data.data_hora_inicio;
        row.data_hora_fim = data.data_hora_fim;
        row.descricao = data.descricao.clone();
        row.acoes_realizadas = data.acoes_realizadas.clone();
        row.responsavel = data.responsavel.clone();
        row.observacoes = data.observacoes.clone();
        Ok(row.clone())
    }

    async fn manutencoes_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .manutencoes
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Manutenção {} não encontrada", id)))
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
