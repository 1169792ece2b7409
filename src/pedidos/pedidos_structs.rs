// src/pedidos/pedidos_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::complementos::complementos_structs::Complemento;

/// Um item pedido pelo cliente: produto, tamanho e complementos opcionais.
///
/// Não existe campo de preço: o preço vem sempre do catálogo. Campos
/// desconhecidos (como um `preco` enviado pelo cliente) são rejeitados.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ItemPedidoRequest {
    pub produto_id: i32,
    pub tamanho: String,
    #[serde(default)]
    pub complementos: Vec<i32>,
}

/// Corpo da requisição de criação de pedido.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NovoPedido {
    pub nome_cliente: String,
    pub telefone: String,
    pub endereco: String,
    pub metodo_pagamento: String,
    pub produtos: Vec<ItemPedidoRequest>,
}

/// Item com os preços resolvidos a partir do catálogo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPrecificado {
    pub produto_id: i32,
    #[serde(skip_serializing)]
    pub produto_nome: String,
    pub tamanho: String,
    pub complementos: Vec<i32>,
    /// Complementos cobrados, com o preço do catálogo, na mesma ordem de `complementos`.
    #[serde(skip_serializing)]
    pub complementos_cobrados: Vec<Complemento>,
    pub preco_base: BigDecimal,
    pub preco_complementos: BigDecimal,
    pub preco_total: BigDecimal,
}

/// Resultado da precificação: itens na ordem da requisição e o total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PedidoPrecificado {
    pub valor_total: BigDecimal,
    pub itens: Vec<ItemPrecificado>,
}

/// Pedido gravado, com os seus itens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pedido {
    pub id: i32,
    pub nome_cliente: String,
    pub telefone: String,
    pub endereco: String,
    pub metodo_pagamento: String,
    pub status: String,
    pub valor_total: BigDecimal,
    pub criado_em: DateTime<Utc>,
    pub produtos: Vec<PedidoItem>,
}

/// Item gravado de um pedido. `complementos` traz o preço cobrado na época.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PedidoItem {
    pub id: i32,
    pub produto_id: i32,
    pub produto_nome: String,
    pub tamanho: String,
    pub preco_base: BigDecimal,
    pub preco_complementos: BigDecimal,
    pub preco: BigDecimal,
    pub complementos: Vec<Complemento>,
}

/// Resposta da criação: o pedido gravado e o detalhamento dos preços.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PedidoCriado {
    pub pedido: Pedido,
    pub detalhes_precos: PedidoPrecificado,
}

/// Linha da tabela `pedidos`
#[derive(FromRow)]
pub struct PedidoLinha {
    pub id: i32,
    pub nome_cliente: String,
    pub telefone: String,
    pub endereco: String,
    pub metodo_pagamento: String,
    pub status: String,
    pub valor_total: BigDecimal,
    pub criado_em: DateTime<Utc>,
}

impl PedidoLinha {
    pub fn com_itens(self, produtos: Vec<PedidoItem>) -> Pedido {
        Pedido {
            id: self.id,
            nome_cliente: self.nome_cliente,
            telefone: self.telefone,
            endereco: self.endereco,
            metodo_pagamento: self.metodo_pagamento,
            status: self.status,
            valor_total: self.valor_total,
            criado_em: self.criado_em,
            produtos,
        }
    }

    /// Monta o pedido recém-gravado a partir dos dados já precificados.
    /// `ids_itens` são os IDs gerados para os itens, na ordem de `precificado.itens`.
    pub fn com_itens_precificados(self, ids_itens: &[i32], precificado: &PedidoPrecificado) -> Pedido {
        let produtos = precificado
            .itens
            .iter()
            .zip(ids_itens)
            .map(|(item, id)| PedidoItem {
                id: *id,
                produto_id: item.produto_id,
                produto_nome: item.produto_nome.clone(),
                tamanho: item.tamanho.clone(),
                preco_base: item.preco_base.clone(),
                preco_complementos: item.preco_complementos.clone(),
                preco: item.preco_total.clone(),
                complementos: item.complementos_cobrados.clone(),
            })
            .collect();

        self.com_itens(produtos)
    }
}

/// Linha de `pedido_itens` já com o nome do produto
#[derive(FromRow)]
pub struct PedidoItemLinha {
    pub id: i32,
    pub pedido_id: i32,
    pub produto_id: i32,
    pub produto_nome: String,
    pub tamanho: String,
    pub preco_base: BigDecimal,
    pub preco_complementos: BigDecimal,
    pub preco: BigDecimal,
}

/// Complemento de um item de pedido, com o preço cobrado
#[derive(FromRow)]
pub struct ItemComplementoLinha {
    pub item_id: i32,
    pub id: i32,
    pub nome: String,
    pub tipo: String,
    pub preco: BigDecimal,
    pub ativo: bool,
}
