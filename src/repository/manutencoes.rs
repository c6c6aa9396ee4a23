//! Maintenance persistence on PostgreSQL

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::{like_pattern, LIKE_ESCAPE, map_write_error, ManutencaoStore, PgStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        manutencao::{ManutencaoInput, ManutencaoQuery},
        pagination, Manutencao, ManutencaoDetalhe,
    },
};

const FROM_DETALHE: &str = r#"
    FROM manutencoes m
    JOIN equipamentos e ON e.id = m.equipamento_id
    LEFT JOIN localizacoes l ON l.id = e.localizacao_id
"#;

const SELECT_DETALHE: &str = r#"
    SELECT m.*,
           e.nome AS equipamento_nome,
           e.tipo AS equipamento_tipo,
           l.nome AS equipamento_localizacao_nome
"#;

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, query: &'a ManutencaoQuery) {
    qb.push(" WHERE TRUE");
    if let Some(ref search) = query.search {
        let pattern = like_pattern(search);
        qb.push(" AND (");
        let mut columns = qb.separated(" OR ");
        for column in ["e.nome", "m.descricao", "m.acoes_realizadas", "m.responsavel"] {
            columns.push(format!("{} ILIKE ", column));
            columns.push_bind_unseparated(pattern.clone());
            columns.push_unseparated(LIKE_ESCAPE);
        }
        qb.push(")");
    }
    if let Some(tipo) = query.tipo {
        qb.push(" AND m.tipo = ").push_bind(tipo);
    }
    if let Some(equipamento_id) = query.equipamento_id {
        qb.push(" AND m.equipamento_id = ").push_bind(equipamento_id);
    }
    if let Some(ref responsavel) = query.responsavel {
        qb.push(" AND m.responsavel = ").push_bind(responsavel);
    }
    // Date drill-down, evaluated in UTC
    let parts = [("YEAR", query.ano), ("MONTH", query.mes.map(|m| m as i32)), ("DAY", query.dia.map(|d| d as i32))];
    for (part, value) in parts {
        if let Some(value) = value {
            qb.push(format!(
                " AND EXTRACT({} FROM m.data_hora_inicio AT TIME ZONE 'UTC')::int = ",
                part
            ))
            .push_bind(value);
        }
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Manutenção {} não encontrada", id))
}

#[async_trait]
impl ManutencaoStore for PgStore {
    async fn manutencoes_list(&self, query: &ManutencaoQuery) -> AppResult<(Vec<ManutencaoDetalhe>, i64)> {
        let (limit, offset) = pagination(query.page, query.per_page);

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        count.push(FROM_DETALHE);
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(SELECT_DETALHE);
        select.push(FROM_DETALHE);
        push_filters(&mut select, query);
        select
            .push(" ORDER BY m.data_hora_inicio DESC, m.id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows = select
            .build_query_as::<ManutencaoDetalhe>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn manutencoes_get_by_id(&self, id: i32) -> AppResult<ManutencaoDetalhe> {
        sqlx::query_as::<_, ManutencaoDetalhe>(&format!(
            "{} {} WHERE m.id = $1",
            SELECT_DETALHE, FROM_DETALHE
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    async fn manutencoes_create(&self, data: &ManutencaoInput) -> AppResult<Manutencao> {
        sqlx::query_as::<_, Manutencao>(
            r#"
            INSERT INTO manutencoes (
                equipamento_id, tipo, data_hora_inicio, data_hora_fim,
                descricao, acoes_realizadas, responsavel, observacoes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(data.equipamento_id)
        .bind(data.tipo)
        .bind(data.data_hora_inicio)
        .bind(data.data_hora_fim)
        .bind(&data.descricao)
        .bind(&data.acoes_realizadas)
        .bind(&data.responsavel)
        .bind(&data.observacoes)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn manutencoes_update(&self, id: i32, data: &ManutencaoInput) -> AppResult<Manutencao> {
        sqlx::query_as::<_, Manutencao>(
            r#"
            UPDATE manutencoes SET
                equipamento_id = $1, tipo = $2, data_hora_inicio = $3, data_hora_fim = $4,
                descricao = $5, acoes_realizadas = $6, responsavel = $7, observacoes = $8
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(data.equipamento_id)
        .bind(data.tipo)
        .bind(data.data_hora_inicio)
        .bind(data.data_hora_fim)
        .bind(&data.descricao)
        .bind(&data.acoes_realizadas)
        .bind(&data.responsavel)
        .bind(&data.observacoes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| not_found(id))
    }

    async fn manutencoes_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM manutencoes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
