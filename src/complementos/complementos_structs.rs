// src/complementos/complementos_structs.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::dinheiro::normalizar_preco;

/// Classificação de um complemento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplementoTipo {
    Adicional,
    Inclusao,
}

impl ComplementoTipo {
    /// Valor gravado na coluna `tipo`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplementoTipo::Adicional => "ADICIONAL",
            ComplementoTipo::Inclusao => "INCLUSAO",
        }
    }
}

/// Estrutura para receber um novo complemento na requisição POST.
/// O corpo da rota é um array destes.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NovoComplemento {
    pub nome: String,
    pub tipo: ComplementoTipo,
    pub preco: BigDecimal,
    #[serde(default = "ativo_por_padrao")]
    pub ativo: bool,
}

fn ativo_por_padrao() -> bool {
    true
}

impl NovoComplemento {
    /// Regras que o tipo sozinho não garante.
    pub fn validar(&self) -> Result<(), String> {
        if self.nome.trim().is_empty() {
            return Err("Cada complemento deve ter nome, tipo e preço".to_string());
        }
        normalizar_preco(&self.preco).map_err(|motivo| {
            format!("Preço inválido para o complemento \"{}\": {}", self.nome, motivo)
        })?;
        Ok(())
    }
}

/// Estrutura que representa um complemento no banco de dados
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Complemento {
    pub id: i32,
    pub nome: String,
    pub tipo: String,
    pub preco: BigDecimal,
    pub ativo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ativo_e_verdadeiro_quando_omitido() {
        let novo: NovoComplemento =
            serde_json::from_str(r#"{"nome":"Granola","tipo":"ADICIONAL","preco":2.5}"#).unwrap();

        assert!(novo.ativo);
        assert_eq!(novo.tipo, ComplementoTipo::Adicional);
        assert_eq!(novo.preco, BigDecimal::from_str("2.5").unwrap());
        assert!(novo.validar().is_ok());
    }

    #[test]
    fn tipo_desconhecido_e_rejeitado() {
        let resultado =
            serde_json::from_str::<NovoComplemento>(r#"{"nome":"Granola","tipo":"BRINDE","preco":2.5}"#);
        assert!(resultado.is_err());
    }

    #[test]
    fn nome_vazio_e_preco_negativo_sao_invalidos() {
        let sem_nome: NovoComplemento =
            serde_json::from_str(r#"{"nome":"  ","tipo":"INCLUSAO","preco":1}"#).unwrap();
        assert!(sem_nome.validar().is_err());

        let negativo: NovoComplemento =
            serde_json::from_str(r#"{"nome":"Leite Ninho","tipo":"ADICIONAL","preco":-1}"#).unwrap();
        assert!(negativo.validar().is_err());
    }

    #[test]
    fn preco_fora_da_coluna_e_invalido() {
        let fracao: NovoComplemento =
            serde_json::from_str(r#"{"nome":"Granola","tipo":"ADICIONAL","preco":"2.555"}"#).unwrap();
        let erro = fracao.validar().unwrap_err();
        assert!(erro.contains("Granola"));

        let enorme: NovoComplemento =
            serde_json::from_str(r#"{"nome":"Granola","tipo":"ADICIONAL","preco":"100000000"}"#).unwrap();
        assert!(enorme.validar().is_err());
    }
}
