// src/pedidos/pedidos_servico.rs

use std::sync::Arc;

use super::pedidos_erros::ErroPedido;
use super::pedidos_repositorio::RepositorioPedidos;
use super::pedidos_structs::{NovoPedido, Pedido, PedidoCriado};
use super::precificacao::{precificar_pedido, CatalogoComplementos, CatalogoProdutos};

/// Orquestra a criação de pedidos: valida, precifica e grava uma única vez.
///
/// Os catálogos e o repositório são injetados, o que permite trocar o
/// Postgres por implementações em memória nos testes.
#[derive(Clone)]
pub struct ServicoPedidos {
    produtos: Arc<dyn CatalogoProdutos>,
    complementos: Arc<dyn CatalogoComplementos>,
    repositorio: Arc<dyn RepositorioPedidos>,
}

impl ServicoPedidos {
    pub fn new(
        produtos: Arc<dyn CatalogoProdutos>,
        complementos: Arc<dyn CatalogoComplementos>,
        repositorio: Arc<dyn RepositorioPedidos>,
    ) -> Self {
        Self {
            produtos,
            complementos,
            repositorio,
        }
    }

    /// Cria o pedido. Nada é gravado se a validação ou a precificação falhar.
    pub async fn criar(&self, novo: &NovoPedido) -> Result<PedidoCriado, ErroPedido> {
        validar_cliente(novo)?;

        let precificado = precificar_pedido(
            &novo.produtos,
            self.produtos.as_ref(),
            self.complementos.as_ref(),
        )
        .await?;

        let pedido = self.repositorio.inserir(novo, &precificado).await?;

        tracing::info!(
            pedido_id = pedido.id,
            itens = precificado.itens.len(),
            valor_total = %precificado.valor_total,
            "Pedido criado"
        );

        Ok(PedidoCriado {
            pedido,
            detalhes_precos: precificado,
        })
    }

    pub async fn listar(&self) -> Result<Vec<Pedido>, ErroPedido> {
        Ok(self.repositorio.listar().await?)
    }
}

fn validar_cliente(novo: &NovoPedido) -> Result<(), ErroPedido> {
    let campos = [
        ("nomeCliente", &novo.nome_cliente),
        ("telefone", &novo.telefone),
        ("endereco", &novo.endereco),
        ("metodoPagamento", &novo.metodo_pagamento),
    ];

    let vazios: Vec<&str> = campos
        .iter()
        .filter(|(_, valor)| valor.trim().is_empty())
        .map(|(nome, _)| *nome)
        .collect();

    if !vazios.is_empty() {
        return Err(ErroPedido::Validacao(format!(
            "Dados incompletos ou inválidos para o pedido: {}.",
            vazios.join(", ")
        )));
    }
    Ok(())
}
