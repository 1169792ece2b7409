// src/produtos/imagens.rs

use std::path::{Path, PathBuf};

use actix_web::web;
use async_trait::async_trait;
use uuid::Uuid;

/// Tamanho máximo aceito para a imagem de um produto (5MB).
pub const TAMANHO_MAXIMO: usize = 5 * 1024 * 1024;

/// Formatos aceitos, tanto na extensão quanto no content type.
const FORMATOS: &[&str] = &["jpeg", "jpg", "png", "gif"];

/// Prefixo público das imagens servidas pela rota `/uploads/{arquivo}`.
pub const PREFIXO_PUBLICO: &str = "/uploads/";

#[derive(Debug, thiserror::Error)]
pub enum ErroImagem {
    #[error("{0}")]
    Invalida(String),

    #[error("Falha de E/S ao gravar imagem: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operação de arquivo interrompida")]
    Bloqueio,
}

/// Onde as imagens dos produtos ficam guardadas.
#[async_trait]
pub trait ArmazenamentoImagens: Send + Sync {
    /// Grava a imagem e devolve a referência pública (URL) dela.
    async fn salvar(&self, nome_original: &str, dados: Vec<u8>) -> Result<String, ErroImagem>;

    /// Apaga a imagem apontada pela referência. Referências desconhecidas são ignoradas.
    async fn remover(&self, referencia: &str) -> Result<(), ErroImagem>;
}

/// Valida uma imagem enviada antes de gravá-la.
/// Devolve a extensão normalizada em minúsculas.
pub fn validar_imagem(
    nome_original: &str,
    content_type: Option<&str>,
    dados: &[u8],
) -> Result<String, ErroImagem> {
    if dados.is_empty() {
        return Err(ErroImagem::Invalida("Imagem é obrigatória".to_string()));
    }
    if dados.len() > TAMANHO_MAXIMO {
        return Err(ErroImagem::Invalida(format!(
            "Imagem muito grande. Tamanho máximo: {}MB",
            TAMANHO_MAXIMO / 1024 / 1024
        )));
    }

    let extensao = Path::new(nome_original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let mime_ok = content_type
        .and_then(|ct| ct.strip_prefix("image/"))
        .map(|sub| FORMATOS.contains(&sub.to_lowercase().as_str()))
        .unwrap_or(false);

    if !mime_ok || !FORMATOS.contains(&extensao.as_str()) {
        return Err(ErroImagem::Invalida("Apenas imagens são permitidas".to_string()));
    }

    Ok(extensao)
}

/// Armazenamento em disco local, servido de volta em `/uploads`.
#[derive(Debug, Clone)]
pub struct DiscoLocal {
    pasta: PathBuf,
}

impl DiscoLocal {
    /// Cria a pasta de uploads se ainda não existir.
    pub fn new(pasta: impl Into<PathBuf>) -> std::io::Result<Self> {
        let pasta = pasta.into();
        std::fs::create_dir_all(&pasta)?;
        Ok(Self { pasta })
    }

    pub fn pasta(&self) -> &Path {
        &self.pasta
    }

    /// Caminho em disco de um arquivo publicado, sem permitir sair da pasta.
    pub fn caminho_do_arquivo(&self, arquivo: &str) -> Option<PathBuf> {
        let valido = !arquivo.is_empty()
            && arquivo
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
            && !arquivo.starts_with('.');
        valido.then(|| self.pasta.join(arquivo))
    }
}

#[async_trait]
impl ArmazenamentoImagens for DiscoLocal {
    async fn salvar(&self, nome_original: &str, dados: Vec<u8>) -> Result<String, ErroImagem> {
        let extensao = Path::new(nome_original)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| "bin".to_string());

        let arquivo = format!("{}.{}", Uuid::new_v4(), extensao);
        let destino = self.pasta.join(&arquivo);

        web::block(move || std::fs::write(destino, dados))
            .await
            .map_err(|_| ErroImagem::Bloqueio)??;

        tracing::debug!(arquivo = %arquivo, "Imagem gravada");
        Ok(format!("{}{}", PREFIXO_PUBLICO, arquivo))
    }

    async fn remover(&self, referencia: &str) -> Result<(), ErroImagem> {
        let caminho = match referencia
            .strip_prefix(PREFIXO_PUBLICO)
            .and_then(|arquivo| self.caminho_do_arquivo(arquivo))
        {
            Some(c) => c,
            None => return Ok(()),
        };

        let resultado = web::block(move || std::fs::remove_file(caminho))
            .await
            .map_err(|_| ErroImagem::Bloqueio)?;

        match resultado {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pasta_temporaria() -> PathBuf {
        std::env::temp_dir().join(format!("acaiteria-uploads-{}", Uuid::new_v4()))
    }

    #[test]
    fn aceita_png_e_jpeg() {
        assert_eq!(validar_imagem("acai.PNG", Some("image/png"), b"x").unwrap(), "png");
        assert_eq!(validar_imagem("acai.jpg", Some("image/jpeg"), b"x").unwrap(), "jpg");
    }

    #[test]
    fn rejeita_formato_nao_imagem() {
        assert!(validar_imagem("cardapio.pdf", Some("application/pdf"), b"x").is_err());
        assert!(validar_imagem("acai.png", Some("text/plain"), b"x").is_err());
        assert!(validar_imagem("acai", Some("image/png"), b"x").is_err());
        assert!(validar_imagem("acai.png", None, b"x").is_err());
    }

    #[test]
    fn rejeita_vazia_e_muito_grande() {
        assert!(validar_imagem("acai.png", Some("image/png"), b"").is_err());
        let grande = vec![0u8; TAMANHO_MAXIMO + 1];
        assert!(validar_imagem("acai.png", Some("image/png"), &grande).is_err());
    }

    #[test]
    fn caminho_do_arquivo_nao_sai_da_pasta() {
        let disco = DiscoLocal {
            pasta: PathBuf::from("/tmp/uploads"),
        };
        assert!(disco.caminho_do_arquivo("../etc/passwd").is_none());
        assert!(disco.caminho_do_arquivo(".env").is_none());
        assert!(disco.caminho_do_arquivo("").is_none());
        assert_eq!(
            disco.caminho_do_arquivo("abc-123.png"),
            Some(PathBuf::from("/tmp/uploads/abc-123.png"))
        );
    }

    #[actix_web::test]
    async fn salva_e_remove_no_disco() {
        let pasta = pasta_temporaria();
        let disco = DiscoLocal::new(&pasta).unwrap();

        let referencia = disco.salvar("acai.png", vec![1, 2, 3]).await.unwrap();
        assert!(referencia.starts_with(PREFIXO_PUBLICO));
        assert!(referencia.ends_with(".png"));

        let arquivo = referencia.trim_start_matches(PREFIXO_PUBLICO);
        let caminho = disco.caminho_do_arquivo(arquivo).unwrap();
        assert_eq!(std::fs::read(&caminho).unwrap(), vec![1, 2, 3]);

        disco.remover(&referencia).await.unwrap();
        assert!(!caminho.exists());

        // Remover de novo, ou algo fora de /uploads, não é erro
        disco.remover(&referencia).await.unwrap();
        disco.remover("https://cdn.exemplo.com/acai.png").await.unwrap();

        std::fs::remove_dir_all(&pasta).unwrap();
    }
}
