// src/shared/erros.rs

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use serde_json::Value;

use super::shared_structs::GenericResponse;

/// Código SQLSTATE do Postgres para violação de chave estrangeira.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Erro devolvido pelas rotas. Cada variante vira um status HTTP e uma
/// resposta no formato `GenericResponse`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{mensagem}")]
    Validacao {
        mensagem: String,
        detalhes: Option<Value>,
    },

    #[error("{mensagem}")]
    NaoEncontrado {
        mensagem: String,
        detalhes: Option<Value>,
    },

    #[error("{0}")]
    Conflito(String),

    /// A causa real já foi registrada no log; aqui fica só a mensagem pública.
    #[error("{0}")]
    Interno(String),
}

impl ApiError {
    pub fn validacao(mensagem: impl Into<String>) -> Self {
        ApiError::Validacao {
            mensagem: mensagem.into(),
            detalhes: None,
        }
    }

    pub fn nao_encontrado(mensagem: impl Into<String>) -> Self {
        ApiError::NaoEncontrado {
            mensagem: mensagem.into(),
            detalhes: None,
        }
    }

    /// Registra a causa e devolve um erro 500 com mensagem genérica.
    pub fn interno<E: std::fmt::Debug>(contexto: &str, causa: E) -> Self {
        tracing::error!(erro = ?causa, "{}", contexto);
        ApiError::Interno(contexto.to_string())
    }

    fn detalhes(&self) -> Option<Value> {
        match self {
            ApiError::Validacao { detalhes, .. } | ApiError::NaoEncontrado { detalhes, .. } => {
                detalhes.clone()
            }
            _ => None,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validacao { .. } => StatusCode::BAD_REQUEST,
            ApiError::NaoEncontrado { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflito(_) => StatusCode::CONFLICT,
            ApiError::Interno(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(GenericResponse::erro(self.to_string(), self.detalhes()))
    }
}

/// Indica se a falha do banco foi causada por uma chave estrangeira,
/// por exemplo ao excluir um produto que já aparece em pedidos.
pub fn violacao_chave_estrangeira(erro: &sqlx::Error) -> bool {
    erro.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == FOREIGN_KEY_VIOLATION)
        .unwrap_or(false)
}

/// Configuração do extrator `web::Json`: qualquer corpo malformado, com tipos
/// errados ou campos desconhecidos é rejeitado com 400 no formato padrão.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(erro = %err, "Corpo JSON rejeitado");
        ApiError::validacao(format!("Dados inválidos: {}", err)).into()
    })
}

/// Configuração do extrator `web::Path` para IDs não numéricos.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, _req| ApiError::validacao("ID inválido").into())
}
