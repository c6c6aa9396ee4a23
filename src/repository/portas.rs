//! Port persistence on PostgreSQL

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::{like_pattern, LIKE_ESCAPE, map_write_error, PgStore, PortaStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        porta::{PortaBulkUpdate, PortaInput, PortaQuery},
        PortaDetalhe, PortaSwitch,
    },
};

const SELECT_DETALHE: &str = r#"
    SELECT p.*,
           e.nome AS equipamento_nome,
           e.tipo AS equipamento_tipo,
           le.nome AS equipamento_localizacao_nome,
           c.nome AS equipamento_conectado_nome,
           c.tipo AS equipamento_conectado_tipo,
           c.localizacao_id AS conectado_localizacao_id,
           lc.nome AS conectado_localizacao_nome
    FROM portas_switch p
    JOIN equipamentos e ON e.id = p.equipamento_id
    LEFT JOIN localizacoes le ON le.id = e.localizacao_id
    LEFT JOIN equipamentos c ON c.id = p.equipamento_conectado_id
    LEFT JOIN localizacoes lc ON lc.id = c.localizacao_id
"#;

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Porta {} não encontrada", id))
}

#[async_trait]
impl PortaStore for PgStore {
    async fn portas_search(&self, query: &PortaQuery) -> AppResult<Vec<PortaDetalhe>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_DETALHE);
        qb.push(" WHERE TRUE");
        if let Some(ref search) = query.search {
            let pattern = like_pattern(search);
            qb.push(" AND (e.nome ILIKE ")
                .push_bind(pattern.clone())
                .push(LIKE_ESCAPE)
                .push(" OR p.descricao ILIKE ")
                .push_bind(pattern.clone())
                .push(LIKE_ESCAPE)
                .push(" OR c.nome ILIKE ")
                .push_bind(pattern)
                .push(LIKE_ESCAPE)
                .push(")");
        }
        if let Some(equipamento_id) = query.equipamento_id {
            qb.push(" AND p.equipamento_id = ").push_bind(equipamento_id);
        }
        if let Some(status) = query.status {
            qb.push(" AND p.status = ").push_bind(status);
        }
        if let Some(ref vlan) = query.vlan {
            qb.push(" AND p.vlan = ").push_bind(vlan.clone());
        }
        if let Some(tipo_conexao) = query.tipo_conexao {
            qb.push(" AND p.tipo_conexao = ").push_bind(tipo_conexao);
        }
        qb.push(" ORDER BY e.nome, e.id, p.numero");

        let rows = qb
            .build_query_as::<PortaDetalhe>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn portas_get_by_id(&self, id: i32) -> AppResult<PortaDetalhe> {
        sqlx::query_as::<_, PortaDetalhe>(&format!("{} WHERE p.id = $1", SELECT_DETALHE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn portas_by_equipamento(&self, equipamento_id: i32) -> AppResult<Vec<PortaSwitch>> {
        let rows = sqlx::query_as::<_, PortaSwitch>(
            "SELECT * FROM portas_switch WHERE equipamento_id = $1 ORDER BY numero",
        )
        .bind(equipamento_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn portas_create(&self, data: &PortaInput) -> AppResult<PortaSwitch> {
        sqlx::query_as::<_, PortaSwitch>(
            r#"
            INSERT INTO portas_switch (
                equipamento_id, numero, descricao, equipamento_conectado_id,
                vlan, velocidade, duplex, tipo_conexao, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(data.equipamento_id)
        .bind(data.numero)
        .bind(&data.descricao)
        .bind(data.equipamento_conectado_id)
        .bind(&data.vlan)
        .bind(data.velocidade)
        .bind(data.duplex)
        .bind(data.tipo_conexao)
        .bind(data.status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn portas_update(&self, id: i32, data: &PortaInput) -> AppResult<PortaSwitch> {
        sqlx::query_as::<_, PortaSwitch>(
            r#"
            UPDATE portas_switch SET
                equipamento_id = $1, numero = $2, descricao = $3,
                equipamento_conectado_id = $4, vlan = $5, velocidade = $6,
                duplex = $7, tipo_conexao = $8, status = $9,
                data_atualizacao = NOW()
            WHERE id = $10
            RETURNING *
            "#,
        )
        .bind(data.equipamento_id)
        .bind(data.numero)
        .bind(&data.descricao)
        .bind(data.equipamento_conectado_id)
        .bind(&data.vlan)
        .bind(data.velocidade)
        .bind(data.duplex)
        .bind(data.tipo_conexao)
        .bind(data.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| not_found(id))
    }

    async fn portas_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM portas_switch WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn portas_bulk_update(&self, updates: &[PortaBulkUpdate]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;
        for update in updates {
            let vlan = update.vlan.as_deref().map(str::trim);
            let result = sqlx::query(
                r#"
                UPDATE portas_switch SET
                    status = COALESCE($1, status),
                    vlan = CASE WHEN $2 THEN NULLIF($3, '') ELSE vlan END,
                    data_atualizacao = NOW()
                WHERE id = $4
                "#,
            )
            .bind(update.status)
            .bind(vlan.is_some())
            .bind(vlan)
            .bind(update.id)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;
            if result.rows_affected() == 0 {
                return Err(not_found(update.id));
            }
            affected += result.rows_affected();
        }
        tx.commit().await?;
        Ok(affected)
    }
}
