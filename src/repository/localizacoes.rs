//! Site persistence on PostgreSQL

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::{like_pattern, LIKE_ESCAPE, map_write_error, LocalizacaoStore, PgStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        localizacao::{LocalizacaoInput, LocalizacaoQuery},
        pagination, Localizacao,
    },
};

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, query: &'a LocalizacaoQuery) {
    qb.push(" WHERE TRUE");
    if let Some(ref search) = query.search {
        let pattern = like_pattern(search);
        qb.push(" AND (nome ILIKE ")
            .push_bind(pattern.clone())
            .push(LIKE_ESCAPE)
            .push(" OR endereco ILIKE ")
            .push_bind(pattern)
            .push(LIKE_ESCAPE)
            .push(")");
    }
    if let Some(ref nome) = query.nome {
        qb.push(" AND nome = ").push_bind(nome);
    }
}

#[async_trait]
impl LocalizacaoStore for PgStore {
    async fn localizacoes_list(&self, query: &LocalizacaoQuery) -> AppResult<(Vec<Localizacao>, i64)> {
        let (limit, offset) = pagination(query.page, query.per_page);

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM localizacoes");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM localizacoes");
        push_filters(&mut select, query);
        select
            .push(" ORDER BY nome, id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let rows = select
            .build_query_as::<Localizacao>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn localizacoes_get_by_id(&self, id: i32) -> AppResult<Localizacao> {
        sqlx::query_as::<_, Localizacao>("SELECT * FROM localizacoes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Localização {} não encontrada", id)))
    }

    async fn localizacoes_create(&self, data: &LocalizacaoInput) -> AppResult<Localizacao> {
        sqlx::query_as::<_, Localizacao>(
            r#"
            INSERT INTO localizacoes (nome, endereco, observacoes, cor)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.nome)
        .bind(&data.endereco)
        .bind(&data.observacoes)
        .bind(data.cor_or_default())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn localizacoes_update(&self, id: i32, data: &LocalizacaoInput) -> AppResult<Localizacao> {
        sqlx::query_as::<_, Localizacao>(
            r#"
            UPDATE localizacoes
            SET nome = $1, endereco = $2, observacoes = $3, cor = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&data.nome)
        .bind(&data.endereco)
        .bind(&data.observacoes)
        .bind(data.cor_or_default())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| AppError::NotFound(format!("Localização {} não encontrada", id)))
    }

    async fn localizacoes_delete(&self, id: i32) -> AppResult<()> {
        // equipamentos.localizacao_id is ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM localizacoes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Localização {} não encontrada", id)));
        }
        Ok(())
    }

    async fn localizacoes_count_equipamentos(&self, id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)::bigint FROM equipamentos WHERE localizacao_id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn localizacoes_with_connected_equipment(&self) -> AppResult<Vec<Localizacao>> {
        let rows = sqlx::query_as::<_, Localizacao>(
            r#"
            SELECT DISTINCT l.*
            FROM localizacoes l
            JOIN equipamentos e ON e.localizacao_id = l.id
            JOIN portas_switch p ON p.equipamento_conectado_id = e.id
            ORDER BY l.nome, l.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
