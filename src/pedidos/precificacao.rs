// src/pedidos/precificacao.rs

//! Precificação de pedidos.
//!
//! Cada item é resolvido contra o catálogo: produto, tamanho (preço base) e
//! complementos (soma dos preços). O cliente nunca informa preço. Se qualquer
//! item falhar, o pedido inteiro falha e nada é devolvido parcialmente.

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use futures::future::join_all;

use super::pedidos_erros::ErroPedido;
use super::pedidos_structs::{ItemPedidoRequest, ItemPrecificado, PedidoPrecificado};
use crate::complementos::complementos_structs::Complemento;
use crate::produtos::produtos_structs::Produto;

/// Leitura de produtos do catálogo.
#[async_trait]
pub trait CatalogoProdutos: Send + Sync {
    async fn buscar_produto(&self, id: i32) -> Result<Option<Produto>, sqlx::Error>;
}

/// Leitura de complementos do catálogo, sempre em lote.
#[async_trait]
pub trait CatalogoComplementos: Send + Sync {
    /// Devolve os complementos encontrados; IDs inexistentes ficam de fora.
    async fn buscar_complementos(&self, ids: &[i32]) -> Result<Vec<Complemento>, sqlx::Error>;
}

/// Valida a forma dos itens antes de qualquer consulta ao catálogo.
pub fn validar_itens(itens: &[ItemPedidoRequest]) -> Result<(), ErroPedido> {
    if itens.is_empty() {
        return Err(ErroPedido::Validacao(
            "O pedido deve ter ao menos um produto.".to_string(),
        ));
    }

    for (indice, item) in itens.iter().enumerate() {
        if item.tamanho.trim().is_empty() {
            return Err(ErroPedido::Validacao(format!(
                "Item {} (produto {}): tamanho é obrigatório.",
                indice + 1,
                item.produto_id
            )));
        }

        let mut vistos = HashSet::new();
        let repetidos: BTreeSet<i32> = item
            .complementos
            .iter()
            .copied()
            .filter(|id| !vistos.insert(*id))
            .collect();
        if !repetidos.is_empty() {
            return Err(ErroPedido::Validacao(format!(
                "Item {} (produto {}): complemento(s) repetido(s): {:?}.",
                indice + 1,
                item.produto_id,
                repetidos.into_iter().collect::<Vec<_>>()
            )));
        }
    }

    Ok(())
}

/// Resolve os preços de todos os itens e calcula o total do pedido.
///
/// Os itens são resolvidos de forma concorrente, mas a saída segue a ordem
/// da entrada. Quando mais de um item falha, o erro devolvido é o do
/// primeiro item (menor índice) que falhou.
pub async fn precificar_pedido(
    itens: &[ItemPedidoRequest],
    produtos: &dyn CatalogoProdutos,
    complementos: &dyn CatalogoComplementos,
) -> Result<PedidoPrecificado, ErroPedido> {
    validar_itens(itens)?;

    let resultados = join_all(
        itens
            .iter()
            .map(|item| precificar_item(item, produtos, complementos)),
    )
    .await;

    let mut precificados = Vec::with_capacity(itens.len());
    let mut valor_total = BigDecimal::from(0);

    for (indice, resultado) in resultados.into_iter().enumerate() {
        let item = resultado.map_err(|erro| {
            tracing::debug!(item = indice + 1, erro = %erro, "Item de pedido não precificado");
            erro
        })?;
        valor_total += item.preco_total.clone();
        precificados.push(item);
    }

    Ok(PedidoPrecificado {
        valor_total,
        itens: precificados,
    })
}

async fn precificar_item(
    item: &ItemPedidoRequest,
    produtos: &dyn CatalogoProdutos,
    complementos: &dyn CatalogoComplementos,
) -> Result<ItemPrecificado, ErroPedido> {
    let produto = produtos
        .buscar_produto(item.produto_id)
        .await?
        .ok_or(ErroPedido::ProdutoNaoEncontrado(item.produto_id))?;

    let tamanho = match produto.tamanho(&item.tamanho) {
        Some(t) => t,
        None => {
            tracing::warn!(
                produto_id = produto.id,
                tamanho = %item.tamanho,
                disponiveis = ?produto.nomes_tamanhos(),
                "Tamanho não encontrado para o produto"
            );
            return Err(ErroPedido::TamanhoNaoEncontrado {
                produto_id: produto.id,
                tamanho: item.tamanho.clone(),
                disponiveis: produto.nomes_tamanhos(),
            });
        }
    };

    let complementos_cobrados = if item.complementos.is_empty() {
        Vec::new()
    } else {
        let encontrados = complementos.buscar_complementos(&item.complementos).await?;
        complementos_na_ordem(&item.complementos, encontrados)?
    };

    let preco_complementos = complementos_cobrados
        .iter()
        .fold(BigDecimal::from(0), |total, c| total + &c.preco);
    let preco_base = tamanho.preco.clone();
    let preco_total = &preco_base + &preco_complementos;

    Ok(ItemPrecificado {
        produto_id: item.produto_id,
        produto_nome: produto.nome.clone(),
        tamanho: tamanho.nome.clone(),
        complementos: item.complementos.clone(),
        complementos_cobrados,
        preco_base,
        preco_complementos,
        preco_total,
    })
}

/// Complementos pedidos, na ordem do pedido.
/// Falha listando exatamente os IDs que o catálogo não devolveu.
fn complementos_na_ordem(
    pedidos: &[i32],
    encontrados: Vec<Complemento>,
) -> Result<Vec<Complemento>, ErroPedido> {
    let mut cobrados = Vec::with_capacity(pedidos.len());
    let mut faltando = Vec::new();

    for id in pedidos {
        match encontrados.iter().find(|c| c.id == *id) {
            Some(complemento) => cobrados.push(complemento.clone()),
            None => faltando.push(*id),
        }
    }

    if !faltando.is_empty() {
        return Err(ErroPedido::ComplementosNaoEncontrados(faltando));
    }
    Ok(cobrados)
}
