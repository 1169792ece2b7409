// src/produtos/produtos_repositorio.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{query, query_as, PgPool, Postgres, Transaction};

use super::produtos_structs::{NovoProduto, Produto, ProdutoLinha, Tamanho, TamanhoLinha};
use crate::pedidos::precificacao::CatalogoProdutos;

/// Lista os produtos, do mais novo para o mais antigo.
pub async fn listar(pool: &PgPool) -> Result<Vec<Produto>, sqlx::Error> {
    let linhas = query_as::<_, ProdutoLinha>(
        "SELECT id, nome, descricao, imagem, criado_em FROM produtos ORDER BY criado_em DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    let ids: Vec<i32> = linhas.iter().map(|p| p.id).collect();
    let mut tamanhos = tamanhos_por_produto(pool, &ids).await?;

    Ok(linhas
        .into_iter()
        .map(|linha| {
            let t = tamanhos.remove(&linha.id).unwrap_or_default();
            linha.com_tamanhos(t)
        })
        .collect())
}

/// Busca um produto e os seus tamanhos. `None` quando o ID não existe.
pub async fn buscar_por_id(pool: &PgPool, id: i32) -> Result<Option<Produto>, sqlx::Error> {
    let linha = query_as::<_, ProdutoLinha>(
        "SELECT id, nome, descricao, imagem, criado_em FROM produtos WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match linha {
        Some(linha) => {
            let mut tamanhos = tamanhos_por_produto(pool, &[id]).await?;
            let t = tamanhos.remove(&id).unwrap_or_default();
            Ok(Some(linha.com_tamanhos(t)))
        }
        None => Ok(None),
    }
}

/// Insere o produto e os seus tamanhos na mesma transação.
pub async fn inserir(pool: &PgPool, novo: &NovoProduto) -> Result<Produto, sqlx::Error> {
    let mut transaction = pool.begin().await?;

    let linha = query_as::<_, ProdutoLinha>(
        "INSERT INTO produtos (nome, descricao, imagem) VALUES ($1, $2, $3) \
         RETURNING id, nome, descricao, imagem, criado_em",
    )
    .bind(&novo.nome)
    .bind(&novo.descricao)
    .bind(&novo.imagem)
    .fetch_one(&mut *transaction)
    .await?;

    let tamanhos = inserir_tamanhos(&mut transaction, linha.id, &novo.tamanhos).await?;

    transaction.commit().await?;
    Ok(linha.com_tamanhos(tamanhos))
}

/// Grava os tamanhos na ordem recebida e devolve o que o banco guardou.
async fn inserir_tamanhos(
    transaction: &mut Transaction<'_, Postgres>,
    produto_id: i32,
    tamanhos: &[Tamanho],
) -> Result<Vec<Tamanho>, sqlx::Error> {
    let mut gravados = Vec::with_capacity(tamanhos.len());
    for (posicao, tamanho) in tamanhos.iter().enumerate() {
        let linha = query_as::<_, TamanhoLinha>(
            "INSERT INTO produto_tamanhos (produto_id, posicao, nome, preco) VALUES ($1, $2, $3, $4) \
             RETURNING produto_id, nome, preco",
        )
        .bind(produto_id)
        .bind(posicao as i32)
        .bind(&tamanho.nome)
        .bind(&tamanho.preco)
        .fetch_one(&mut **transaction)
        .await?;

        gravados.push(Tamanho {
            nome: linha.nome,
            preco: linha.preco,
        });
    }
    Ok(gravados)
}

/// Remove o produto (os tamanhos saem em cascata) e devolve o que foi removido,
/// para que a imagem também possa ser apagada.
pub async fn remover(pool: &PgPool, id: i32) -> Result<Option<Produto>, sqlx::Error> {
    let produto = match buscar_por_id(pool, id).await? {
        Some(p) => p,
        None => return Ok(None),
    };

    let resultado = query("DELETE FROM produtos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(Some(produto))
}

async fn tamanhos_por_produto(
    pool: &PgPool,
    ids: &[i32],
) -> Result<HashMap<i32, Vec<Tamanho>>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let linhas = query_as::<_, TamanhoLinha>(
        "SELECT produto_id, nome, preco FROM produto_tamanhos \
         WHERE produto_id = ANY($1) ORDER BY produto_id, posicao",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    let mut mapa: HashMap<i32, Vec<Tamanho>> = HashMap::new();
    for linha in linhas {
        mapa.entry(linha.produto_id).or_default().push(Tamanho {
            nome: linha.nome,
            preco: linha.preco,
        });
    }
    Ok(mapa)
}

/// Catálogo de produtos lido direto do Postgres.
#[derive(Clone)]
pub struct PgProdutos {
    pool: PgPool,
}

impl PgProdutos {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogoProdutos for PgProdutos {
    async fn buscar_produto(&self, id: i32) -> Result<Option<Produto>, sqlx::Error> {
        buscar_por_id(&self.pool, id).await
    }
}
