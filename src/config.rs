// src/config.rs

use std::path::PathBuf;

/// Erros ao montar a configuração a partir das variáveis de ambiente.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ErroConfig {
    #[error("Variável de ambiente obrigatória ausente: {0}")]
    Ausente(&'static str),

    #[error("Valor inválido para {variavel}: {valor}")]
    Invalida { variavel: &'static str, valor: String },
}

/// Configuração do processo. Carregada uma vez no `main`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Pasta onde as imagens dos produtos são gravadas.
    pub upload_dir: PathBuf,
    pub db_max_connections: u32,
}

impl Config {
    /// Lê o `.env` (se existir) e depois as variáveis de ambiente.
    pub fn from_env() -> Result<Self, ErroConfig> {
        // Sem .env o processo segue só com as variáveis já exportadas
        let _ = dotenv::dotenv();
        Self::from_lookup(|chave| std::env::var(chave).ok())
    }

    /// Monta a configuração a partir de uma função de busca qualquer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ErroConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ErroConfig::Ausente("DATABASE_URL"))?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_ou_padrao(&lookup, "PORT", 3000)?;
        let upload_dir = lookup("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("public/uploads"));
        let db_max_connections = parse_ou_padrao(&lookup, "DB_MAX_CONNECTIONS", 5)?;

        Ok(Config {
            database_url,
            host,
            port,
            upload_dir,
            db_max_connections,
        })
    }
}

fn parse_ou_padrao<F, T>(lookup: &F, variavel: &'static str, padrao: T) -> Result<T, ErroConfig>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(variavel) {
        Some(valor) => valor
            .trim()
            .parse()
            .map_err(|_| ErroConfig::Invalida { variavel, valor }),
        None => Ok(padrao),
    }
}
