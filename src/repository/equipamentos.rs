//! Equipment persistence on PostgreSQL

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::{like_pattern, LIKE_ESCAPE, map_write_error, EquipamentoStore, PgStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        equipamento::{EquipamentoAtivoUpdate, EquipamentoInput, EquipamentoQuery},
        pagination, Equipamento, EquipamentoDetalhe,
    },
};

const SELECT_DETALHE: &str = r#"
    SELECT e.*, l.nome AS localizacao_nome, l.cor AS localizacao_cor
    FROM equipamentos e
    LEFT JOIN localizacoes l ON l.id = e.localizacao_id
"#;

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, query: &'a EquipamentoQuery) {
    qb.push(" WHERE TRUE");
    if let Some(ref search) = query.search {
        let pattern = like_pattern(search);
        qb.push(" AND (");
        let mut columns = qb.separated(" OR ");
        for column in ["e.nome", "e.modelo", "e.marca", "e.numero_serie", "e.ip_gerencia"] {
            columns.push(format!("{} ILIKE ", column));
            columns.push_bind_unseparated(pattern.clone());
            columns.push_unseparated(LIKE_ESCAPE);
        }
        qb.push(")");
    }
    if let Some(tipo) = query.tipo {
        qb.push(" AND e.tipo = ").push_bind(tipo);
    }
    if let Some(localizacao_id) = query.localizacao_id {
        qb.push(" AND e.localizacao_id = ").push_bind(localizacao_id);
    }
    if let Some(ref nome) = query.localizacao_nome {
        qb.push(" AND l.nome ILIKE ")
            .push_bind(like_pattern(nome))
            .push(LIKE_ESCAPE);
    }
    if let Some(ativo) = query.ativo {
        qb.push(" AND e.ativo = ").push_bind(ativo);
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Equipamento {} não encontrado", id))
}

#[async_trait]
impl EquipamentoStore for PgStore {
    async fn equipamentos_list(&self, query: &EquipamentoQuery) -> AppResult<(Vec<EquipamentoDetalhe>, i64)> {
        let (limit, offset) = pagination(query.page, query.per_page);

        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM equipamentos e LEFT JOIN localizacoes l ON l.id = e.localizacao_id",
        );
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(SELECT_DETALHE);
        push_filters(&mut select, query);
        select
            .push(" ORDER BY l.nome NULLS LAST, e.tipo, e.nome, e.id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows = select
            .build_query_as::<EquipamentoDetalhe>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn equipamentos_get_by_id(&self, id: i32) -> AppResult<Equipamento> {
        sqlx::query_as::<_, Equipamento>("SELECT * FROM equipamentos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn equipamentos_get_detalhe(&self, id: i32) -> AppResult<EquipamentoDetalhe> {
        sqlx::query_as::<_, EquipamentoDetalhe>(&format!("{} WHERE e.id = $1", SELECT_DETALHE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn equipamentos_create(&self, data: &EquipamentoInput) -> AppResult<Equipamento> {
        sqlx::query_as::<_, Equipamento>(
            r#"
            INSERT INTO equipamentos (
                nome, tipo, modelo, marca, numero_serie, ip_gerencia, porta,
                usuario, senha, localizacao_id, andar, sala,
                data_instalacao, garantia_ate, observacoes, ativo
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(&data.nome)
        .bind(data.tipo)
        .bind(&data.modelo)
        .bind(&data.marca)
        .bind(&data.numero_serie)
        .bind(&data.ip_gerencia)
        .bind(data.porta)
        .bind(&data.usuario)
        .bind(&data.senha)
        .bind(data.localizacao_id)
        .bind(&data.andar)
        .bind(&data.sala)
        .bind(data.data_instalacao)
        .bind(data.garantia_ate)
        .bind(&data.observacoes)
        .bind(data.ativo)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn equipamentos_update(&self, id: i32, data: &EquipamentoInput) -> AppResult<Equipamento> {
        // An empty password on the form keeps the stored one
        sqlx::query_as::<_, Equipamento>(
            r#"
            UPDATE equipamentos SET
                nome = $1, tipo = $2, modelo = $3, marca = $4, numero_serie = $5,
                ip_gerencia = $6, porta = $7, usuario = $8,
                senha = COALESCE($9, senha),
                localizacao_id = $10, andar = $11, sala = $12,
                data_instalacao = $13, garantia_ate = $14, observacoes = $15, ativo = $16
            WHERE id = $17
            RETURNING *
            "#,
        )
        .bind(&data.nome)
        .bind(data.tipo)
        .bind(&data.modelo)
        .bind(&data.marca)
        .bind(&data.numero_serie)
        .bind(&data.ip_gerencia)
        .bind(data.porta)
        .bind(&data.usuario)
        .bind(&data.senha)
        .bind(data.localizacao_id)
        .bind(&data.andar)
        .bind(&data.sala)
        .bind(data.data_instalacao)
        .bind(data.garantia_ate)
        .bind(&data.observacoes)
        .bind(data.ativo)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| not_found(id))
    }

    async fn equipamentos_delete(&self, id: i32) -> AppResult<()> {
        // Owned ports and maintenance cascade; connected ports are set to NULL
        let result = sqlx::query("DELETE FROM equipamentos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn equipamentos_set_ativo(&self, updates: &[EquipamentoAtivoUpdate]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;
        for update in updates {
            let result = sqlx::query("UPDATE equipamentos SET ativo = $1 WHERE id = $2")
                .bind(update.ativo)
                .bind(update.id)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                return Err(not_found(update.id));
            }
            affected += result.rows_affected();
        }
        tx.commit().await?;
        Ok(affected)
    }

    async fn equipamentos_connected_targets(&self) -> AppResult<Vec<Equipamento>> {
        let rows = sqlx::query_as::<_, Equipamento>(
            r#"
            SELECT e.* FROM equipamentos e
            WHERE e.id IN (
                SELECT equipamento_conectado_id FROM portas_switch
                WHERE equipamento_conectado_id IS NOT NULL
            )
            ORDER BY e.nome, e.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
