// src/pedidos/pedidos_erros.rs

use serde_json::json;

use crate::shared::erros::ApiError;

/// Falhas na criação ou leitura de pedidos.
///
/// Validação e "não encontrado" são erros do cliente e nunca são repetidos
/// automaticamente. `Armazenamento` é falha de infraestrutura.
#[derive(Debug, thiserror::Error)]
pub enum ErroPedido {
    #[error("{0}")]
    Validacao(String),

    #[error("Produto com ID {0} não encontrado.")]
    ProdutoNaoEncontrado(i32),

    #[error("Tamanho \"{tamanho}\" não disponível para o produto com ID {produto_id}.")]
    TamanhoNaoEncontrado {
        produto_id: i32,
        tamanho: String,
        disponiveis: Vec<String>,
    },

    #[error("Complemento(s) com ID(s) {} não encontrado(s).", lista_ids(.0))]
    ComplementosNaoEncontrados(Vec<i32>),

    #[error("Falha de armazenamento: {0}")]
    Armazenamento(#[from] sqlx::Error),
}

fn lista_ids(ids: &[i32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<ErroPedido> for ApiError {
    fn from(erro: ErroPedido) -> Self {
        let mensagem = erro.to_string();
        match erro {
            ErroPedido::Validacao(_) => ApiError::validacao(mensagem),
            ErroPedido::ProdutoNaoEncontrado(produto_id) => ApiError::Validacao {
                mensagem,
                detalhes: Some(json!({ "entidade": "produto", "produtoId": produto_id })),
            },
            ErroPedido::TamanhoNaoEncontrado {
                produto_id,
                tamanho,
                disponiveis,
            } => ApiError::Validacao {
                mensagem,
                detalhes: Some(json!({
                    "entidade": "tamanho",
                    "produtoId": produto_id,
                    "tamanho": tamanho,
                    "disponiveis": disponiveis,
                })),
            },
            ErroPedido::ComplementosNaoEncontrados(ids) => ApiError::Validacao {
                mensagem,
                detalhes: Some(json!({ "entidade": "complemento", "complementos": ids })),
            },
            ErroPedido::Armazenamento(e) => ApiError::interno("Erro ao processar pedido", e),
        }
    }
}
