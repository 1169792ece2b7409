// src/produtos/produtos_structs.rs

use std::collections::HashSet;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::dinheiro::normalizar_preco;

/// Um tamanho vendável do produto e o seu preço (ex.: "Grande" = 12.00).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tamanho {
    pub nome: String,
    pub preco: BigDecimal,
}

/// Dados de um novo produto, montados a partir dos campos do formulário multipart.
#[derive(Debug)]
pub struct NovoProduto {
    pub nome: String,
    pub descricao: String,
    pub imagem: String,
    pub tamanhos: Vec<Tamanho>,
}

/// Produto completo, com os tamanhos na ordem em que foram cadastrados.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Produto {
    pub id: i32,
    pub nome: String,
    pub descricao: String,
    pub imagem: String,
    pub tamanhos: Vec<Tamanho>,
    pub criado_em: DateTime<Utc>,
}

impl Produto {
    /// Procura o tamanho pelo nome exato (diferencia maiúsculas de minúsculas).
    pub fn tamanho(&self, nome: &str) -> Option<&Tamanho> {
        self.tamanhos.iter().find(|t| t.nome == nome)
    }

    pub fn nomes_tamanhos(&self) -> Vec<String> {
        self.tamanhos.iter().map(|t| t.nome.clone()).collect()
    }
}

/// Linha da tabela `produtos`
#[derive(FromRow)]
pub struct ProdutoLinha {
    pub id: i32,
    pub nome: String,
    pub descricao: String,
    pub imagem: String,
    pub criado_em: DateTime<Utc>,
}

/// Linha da tabela `produto_tamanhos`
#[derive(FromRow)]
pub struct TamanhoLinha {
    pub produto_id: i32,
    pub nome: String,
    pub preco: BigDecimal,
}

impl ProdutoLinha {
    pub fn com_tamanhos(self, tamanhos: Vec<Tamanho>) -> Produto {
        Produto {
            id: self.id,
            nome: self.nome,
            descricao: self.descricao,
            imagem: self.imagem,
            tamanhos,
            criado_em: self.criado_em,
        }
    }
}

/// Interpreta o campo `tamanhos` do formulário: um array JSON de `{nome, preco}`.
///
/// Exige ao menos um tamanho, nomes não vazios e únicos, e preços que caibam
/// na coluna do banco. Os preços saem com duas casas decimais.
pub fn parse_tamanhos(bruto: &str) -> Result<Vec<Tamanho>, String> {
    let tamanhos: Vec<Tamanho> =
        serde_json::from_str(bruto).map_err(|_| "Formato de tamanhos inválido".to_string())?;

    if tamanhos.is_empty() {
        return Err("Tamanhos são obrigatórios".to_string());
    }

    let mut vistos = HashSet::new();
    let mut normalizados = Vec::with_capacity(tamanhos.len());

    for tamanho in tamanhos {
        let nome = tamanho.nome.trim().to_string();
        if nome.is_empty() {
            return Err("Dados de tamanhos inválidos".to_string());
        }
        let preco = normalizar_preco(&tamanho.preco)
            .map_err(|motivo| format!("Preço inválido para o tamanho \"{}\": {}", nome, motivo))?;
        if !vistos.insert(nome.clone()) {
            return Err(format!("Tamanho \"{}\" informado mais de uma vez", nome));
        }
        normalizados.push(Tamanho { nome, preco });
    }

    Ok(normalizados)
}
