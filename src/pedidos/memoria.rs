// src/pedidos/memoria.rs

//! Catálogo e repositório em memória para os testes de pedidos.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;

use super::pedidos_repositorio::{RepositorioPedidos, STATUS_INICIAL};
use super::pedidos_structs::{NovoPedido, Pedido, PedidoLinha, PedidoPrecificado};
use super::precificacao::{CatalogoComplementos, CatalogoProdutos};
use crate::complementos::complementos_structs::Complemento;
use crate::produtos::produtos_structs::{Produto, Tamanho};

#[derive(Default)]
pub struct CatalogoEmMemoria {
    produtos: HashMap<i32, Produto>,
    complementos: HashMap<i32, Complemento>,
    atrasos: HashMap<i32, Duration>,
    falhar: bool,
    buscas_produtos: AtomicUsize,
    buscas_complementos: AtomicUsize,
}

impl CatalogoEmMemoria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn com_produto(mut self, id: i32, nome: &str, tamanhos: &[(&str, &str)]) -> Self {
        let tamanhos = tamanhos
            .iter()
            .map(|(nome, preco)| Tamanho {
                nome: nome.to_string(),
                preco: BigDecimal::from_str(preco).unwrap(),
            })
            .collect();

        self.produtos.insert(
            id,
            Produto {
                id,
                nome: nome.to_string(),
                descricao: String::new(),
                imagem: format!("/uploads/produto-{}.png", id),
                tamanhos,
                criado_em: Utc::now(),
            },
        );
        self
    }

    pub fn com_complemento(mut self, id: i32, nome: &str, preco: &str) -> Self {
        self.complementos.insert(
            id,
            Complemento {
                id,
                nome: nome.to_string(),
                tipo: "ADICIONAL".to_string(),
                preco: BigDecimal::from_str(preco).unwrap(),
                ativo: true,
            },
        );
        self
    }

    /// A busca deste produto demora `atraso` para responder.
    pub fn com_atraso(mut self, produto_id: i32, atraso: Duration) -> Self {
        self.atrasos.insert(produto_id, atraso);
        self
    }

    /// Toda busca falha como se o banco estivesse fora do ar.
    pub fn falhando(mut self) -> Self {
        self.falhar = true;
        self
    }

    pub fn buscas_de_produtos(&self) -> usize {
        self.buscas_produtos.load(Ordering::SeqCst)
    }

    pub fn buscas_de_complementos(&self) -> usize {
        self.buscas_complementos.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogoProdutos for CatalogoEmMemoria {
    async fn buscar_produto(&self, id: i32) -> Result<Option<Produto>, sqlx::Error> {
        self.buscas_produtos.fetch_add(1, Ordering::SeqCst);
        if let Some(atraso) = self.atrasos.get(&id) {
            actix_web::rt::time::sleep(*atraso).await;
        }
        if self.falhar {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.produtos.get(&id).cloned())
    }
}

#[async_trait]
impl CatalogoComplementos for CatalogoEmMemoria {
    async fn buscar_complementos(&self, ids: &[i32]) -> Result<Vec<Complemento>, sqlx::Error> {
        self.buscas_complementos.fetch_add(1, Ordering::SeqCst);
        if self.falhar {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.complementos.get(id).cloned())
            .collect())
    }
}

/// Repositório que guarda os pedidos num vetor.
#[derive(Default)]
pub struct RepositorioEmMemoria {
    pedidos: Mutex<Vec<Pedido>>,
    falhar_gravacao: bool,
    falhar_leitura: bool,
}

impl RepositorioEmMemoria {
    /// Gravação e leitura falham.
    pub fn falhando() -> Self {
        Self {
            falhar_gravacao: true,
            falhar_leitura: true,
            ..Self::default()
        }
    }

    /// Grava normalmente, mas toda leitura falha.
    pub fn com_leitura_falhando() -> Self {
        Self {
            falhar_leitura: true,
            ..Self::default()
        }
    }

    pub fn gravados(&self) -> Vec<Pedido> {
        self.pedidos.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositorioPedidos for RepositorioEmMemoria {
    async fn inserir(
        &self,
        novo: &NovoPedido,
        precificado: &PedidoPrecificado,
    ) -> Result<Pedido, sqlx::Error> {
        if self.falhar_gravacao {
            return Err(sqlx::Error::PoolTimedOut);
        }

        let mut pedidos = self.pedidos.lock().unwrap();
        let id = pedidos.len() as i32 + 1;
        let ids_itens: Vec<i32> = (0..precificado.itens.len() as i32).map(|p| id * 100 + p).collect();

        let linha = PedidoLinha {
            id,
            nome_cliente: novo.nome_cliente.clone(),
            telefone: novo.telefone.clone(),
            endereco: novo.endereco.clone(),
            metodo_pagamento: novo.metodo_pagamento.clone(),
            status: STATUS_INICIAL.to_string(),
            valor_total: precificado.valor_total.clone(),
            criado_em: Utc::now(),
        };
        let pedido = linha.com_itens_precificados(&ids_itens, precificado);
        pedidos.push(pedido.clone());
        Ok(pedido)
    }

    async fn listar(&self) -> Result<Vec<Pedido>, sqlx::Error> {
        if self.falhar_leitura {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.gravados())
    }
}
