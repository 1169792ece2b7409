// src/pedidos/pedidos_repositorio.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{query, query_as, PgPool, Row};

use super::pedidos_structs::{
    ItemComplementoLinha, NovoPedido, Pedido, PedidoItem, PedidoItemLinha, PedidoLinha,
    PedidoPrecificado,
};
use crate::complementos::complementos_structs::Complemento;

/// Status de todo pedido recém-criado.
pub const STATUS_INICIAL: &str = "pendente";

const COLUNAS_PEDIDO: &str =
    "id, nome_cliente, telefone, endereco, metodo_pagamento, status, valor_total, criado_em";

/// Onde os pedidos precificados são gravados.
#[async_trait]
pub trait RepositorioPedidos: Send + Sync {
    /// Grava o pedido com todos os itens de forma atômica: tudo ou nada.
    async fn inserir(
        &self,
        novo: &NovoPedido,
        precificado: &PedidoPrecificado,
    ) -> Result<Pedido, sqlx::Error>;

    /// Lista os pedidos do mais antigo para o mais novo.
    async fn listar(&self) -> Result<Vec<Pedido>, sqlx::Error>;
}

/// Repositório de pedidos no Postgres.
#[derive(Clone)]
pub struct PgPedidos {
    pool: PgPool,
}

impl PgPedidos {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Carrega itens e complementos dos pedidos e monta a estrutura completa.
    async fn montar(&self, linhas: Vec<PedidoLinha>) -> Result<Vec<Pedido>, sqlx::Error> {
        if linhas.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = linhas.iter().map(|p| p.id).collect();
        let itens = query_as::<_, PedidoItemLinha>(
            "SELECT i.id, i.pedido_id, i.produto_id, p.nome AS produto_nome, i.tamanho, \
                    i.preco_base, i.preco_complementos, i.preco \
             FROM pedido_itens i JOIN produtos p ON p.id = i.produto_id \
             WHERE i.pedido_id = ANY($1) ORDER BY i.pedido_id, i.posicao",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let ids_itens: Vec<i32> = itens.iter().map(|i| i.id).collect();
        let complementos = if ids_itens.is_empty() {
            Vec::new()
        } else {
            query_as::<_, ItemComplementoLinha>(
                "SELECT ic.item_id, c.id, c.nome, c.tipo, ic.preco, c.ativo \
                 FROM pedido_item_complementos ic JOIN complementos c ON c.id = ic.complemento_id \
                 WHERE ic.item_id = ANY($1) ORDER BY ic.item_id, ic.posicao",
            )
            .bind(&ids_itens)
            .fetch_all(&self.pool)
            .await?
        };

        let mut complementos_por_item: HashMap<i32, Vec<Complemento>> = HashMap::new();
        for c in complementos {
            complementos_por_item.entry(c.item_id).or_default().push(Complemento {
                id: c.id,
                nome: c.nome,
                tipo: c.tipo,
                preco: c.preco,
                ativo: c.ativo,
            });
        }

        let mut itens_por_pedido: HashMap<i32, Vec<PedidoItem>> = HashMap::new();
        for i in itens {
            let complementos = complementos_por_item.remove(&i.id).unwrap_or_default();
            itens_por_pedido.entry(i.pedido_id).or_default().push(PedidoItem {
                id: i.id,
                produto_id: i.produto_id,
                produto_nome: i.produto_nome,
                tamanho: i.tamanho,
                preco_base: i.preco_base,
                preco_complementos: i.preco_complementos,
                preco: i.preco,
                complementos,
            });
        }

        Ok(linhas
            .into_iter()
            .map(|linha| {
                let itens = itens_por_pedido.remove(&linha.id).unwrap_or_default();
                linha.com_itens(itens)
            })
            .collect())
    }
}

#[async_trait]
impl RepositorioPedidos for PgPedidos {
    async fn inserir(
        &self,
        novo: &NovoPedido,
        precificado: &PedidoPrecificado,
    ) -> Result<Pedido, sqlx::Error> {
        // Qualquer `?` abaixo descarta a transação, que faz rollback ao ser dropada
        let mut transaction = self.pool.begin().await?;

        let linha = query_as::<_, PedidoLinha>(&format!(
            "INSERT INTO pedidos (nome_cliente, telefone, endereco, metodo_pagamento, status, valor_total) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            COLUNAS_PEDIDO
        ))
        .bind(novo.nome_cliente.trim())
        .bind(novo.telefone.trim())
        .bind(novo.endereco.trim())
        .bind(novo.metodo_pagamento.trim())
        .bind(STATUS_INICIAL)
        .bind(&precificado.valor_total)
        .fetch_one(&mut *transaction)
        .await?;
        let pedido_id = linha.id;

        let mut ids_itens = Vec::with_capacity(precificado.itens.len());
        for (posicao, item) in precificado.itens.iter().enumerate() {
            let row = query(
                "INSERT INTO pedido_itens \
                 (pedido_id, posicao, produto_id, tamanho, preco_base, preco_complementos, preco) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
            )
            .bind(pedido_id)
            .bind(posicao as i32)
            .bind(item.produto_id)
            .bind(&item.tamanho)
            .bind(&item.preco_base)
            .bind(&item.preco_complementos)
            .bind(&item.preco_total)
            .fetch_one(&mut *transaction)
            .await?;
            let item_id = row.try_get::<i32, &str>("id")?;
            ids_itens.push(item_id);

            for (ordem, complemento) in item.complementos_cobrados.iter().enumerate() {
                query(
                    "INSERT INTO pedido_item_complementos (item_id, posicao, complemento_id, preco) \
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(item_id)
                .bind(ordem as i32)
                .bind(complemento.id)
                .bind(&complemento.preco)
                .execute(&mut *transaction)
                .await?;
            }
        }

        transaction.commit().await?;

        // Montado em memória: nenhuma consulta depois do commit
        Ok(linha.com_itens_precificados(&ids_itens, precificado))
    }

    async fn listar(&self) -> Result<Vec<Pedido>, sqlx::Error> {
        let linhas = query_as::<_, PedidoLinha>(&format!(
            "SELECT {} FROM pedidos ORDER BY criado_em ASC, id ASC",
            COLUNAS_PEDIDO
        ))
        .fetch_all(&self.pool)
        .await?;

        self.montar(linhas).await
    }
}
