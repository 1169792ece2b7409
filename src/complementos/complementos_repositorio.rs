// src/complementos/complementos_repositorio.rs

use async_trait::async_trait;
use sqlx::{query_as, PgPool};

use super::complementos_structs::{Complemento, NovoComplemento};
use crate::pedidos::precificacao::CatalogoComplementos;

const COLUNAS: &str = "id, nome, tipo, preco, ativo";

/// Lista todos os complementos em ordem alfabética.
pub async fn listar(pool: &PgPool) -> Result<Vec<Complemento>, sqlx::Error> {
    query_as::<_, Complemento>(&format!("SELECT {} FROM complementos ORDER BY nome ASC, id ASC", COLUNAS))
        .fetch_all(pool)
        .await
}

/// Busca de uma vez todos os complementos cujos IDs estão em `ids`.
/// IDs inexistentes simplesmente não aparecem no resultado.
pub async fn buscar_por_ids(pool: &PgPool, ids: &[i32]) -> Result<Vec<Complemento>, sqlx::Error> {
    query_as::<_, Complemento>(&format!("SELECT {} FROM complementos WHERE id = ANY($1)", COLUNAS))
        .bind(ids)
        .fetch_all(pool)
        .await
}

/// Insere vários complementos numa única transação: ou todos são criados, ou nenhum.
pub async fn inserir_varios(
    pool: &PgPool,
    novos: &[NovoComplemento],
) -> Result<Vec<Complemento>, sqlx::Error> {
    let mut transaction = pool.begin().await?;
    let mut criados = Vec::with_capacity(novos.len());

    for novo in novos {
        let complemento = query_as::<_, Complemento>(&format!(
            "INSERT INTO complementos (nome, tipo, preco, ativo) VALUES ($1, $2, $3, $4) RETURNING {}",
            COLUNAS
        ))
        .bind(novo.nome.trim())
        .bind(novo.tipo.as_str())
        .bind(&novo.preco)
        .bind(novo.ativo)
        .fetch_one(&mut *transaction)
        .await?;

        criados.push(complemento);
    }

    transaction.commit().await?;
    Ok(criados)
}

/// Remove um complemento. `None` quando o ID não existe.
pub async fn remover(pool: &PgPool, id: i32) -> Result<Option<Complemento>, sqlx::Error> {
    query_as::<_, Complemento>(&format!("DELETE FROM complementos WHERE id = $1 RETURNING {}", COLUNAS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Catálogo de complementos lido direto do Postgres.
#[derive(Clone)]
pub struct PgComplementos {
    pool: PgPool,
}

impl PgComplementos {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogoComplementos for PgComplementos {
    async fn buscar_complementos(&self, ids: &[i32]) -> Result<Vec<Complemento>, sqlx::Error> {
        buscar_por_ids(&self.pool, ids).await
    }
}
