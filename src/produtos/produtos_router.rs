// src/produtos/produtos_router.rs

use actix_multipart::Multipart;
use actix_web::{delete, get, post, web, HttpResponse};
use futures::TryStreamExt;

use super::imagens::{validar_imagem, ArmazenamentoImagens, ErroImagem, TAMANHO_MAXIMO};
use super::produtos_repositorio;
use super::produtos_structs::{parse_tamanhos, NovoProduto};
use crate::shared::erros::{violacao_chave_estrangeira, ApiError};
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Limite para os campos de texto do formulário.
const TAMANHO_MAXIMO_CAMPO: usize = 64 * 1024;

/// Arquivo recebido no campo `imagem`.
struct ArquivoEnviado {
    nome: String,
    content_type: Option<String>,
    dados: Vec<u8>,
}

/// Campos do formulário multipart de cadastro de produto.
#[derive(Default)]
struct FormularioProduto {
    nome: Option<String>,
    descricao: Option<String>,
    tamanhos: Option<String>,
    imagem: Option<ArquivoEnviado>,
}

impl From<ErroImagem> for ApiError {
    fn from(erro: ErroImagem) -> Self {
        match erro {
            ErroImagem::Invalida(mensagem) => ApiError::validacao(mensagem),
            outro => ApiError::interno("Erro ao gravar imagem", outro),
        }
    }
}

/// Rota para buscar todos os produtos, com os seus tamanhos.
#[get("/produtos")]
pub async fn buscar_produtos(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let produtos = produtos_repositorio::listar(&data.db_pool)
        .await
        .map_err(|e| ApiError::interno("Erro ao buscar produtos", e))?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Produtos listados com sucesso!",
        produtos,
    )))
}

/// Rota para buscar um produto por ID.
#[get("/produtos/{id}")]
pub async fn buscar_produto_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let produto = produtos_repositorio::buscar_por_id(&data.db_pool, id)
        .await
        .map_err(|e| ApiError::interno("Erro ao buscar produto", e))?
        .ok_or_else(|| ApiError::nao_encontrado(format!("Produto com ID {} não encontrado.", id)))?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Produto com ID {} encontrado.", id),
        produto,
    )))
}

/// Rota para cadastrar um produto com imagem.
///
/// Recebe `multipart/form-data` com os campos `imagem` (arquivo), `nome`,
/// `descricao` e `tamanhos` (array JSON de `{nome, preco}`).
/// Tudo é validado antes de a imagem ser gravada; se a inserção no banco
/// falhar, a imagem gravada é apagada.
#[post("/produtos")]
pub async fn cadastrar_produto(
    data: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let formulario = ler_formulario(payload).await?;

    let imagem = formulario
        .imagem
        .ok_or_else(|| ApiError::validacao("Imagem é obrigatória"))?;
    let nome = formulario
        .nome
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::validacao("Nome é obrigatório"))?;
    let tamanhos_brutos = formulario
        .tamanhos
        .ok_or_else(|| ApiError::validacao("Tamanhos são obrigatórios"))?;
    let tamanhos = parse_tamanhos(&tamanhos_brutos).map_err(ApiError::validacao)?;

    validar_imagem(&imagem.nome, imagem.content_type.as_deref(), &imagem.dados)?;
    let referencia = data.imagens.salvar(&imagem.nome, imagem.dados).await?;

    let novo = NovoProduto {
        nome,
        descricao: formulario.descricao.unwrap_or_default(),
        imagem: referencia,
        tamanhos,
    };

    match produtos_repositorio::inserir(&data.db_pool, &novo).await {
        Ok(produto) => {
            tracing::info!(produto_id = produto.id, nome = %produto.nome, "Produto cadastrado");
            Ok(HttpResponse::Created().json(GenericResponse::sucesso(
                format!("Produto cadastrado com sucesso! ID: {}", produto.id),
                produto,
            )))
        }
        Err(e) => {
            if let Err(erro_imagem) = data.imagens.remover(&novo.imagem).await {
                tracing::warn!(erro = %erro_imagem, imagem = %novo.imagem, "Imagem órfã não removida");
            }
            Err(ApiError::interno("Erro ao inserir produto", e))
        }
    }
}

/// Rota para excluir um produto e a sua imagem.
#[delete("/produtos/{id}")]
pub async fn deletar_produto(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let produto = match produtos_repositorio::remover(&data.db_pool, id).await {
        Ok(Some(produto)) => produto,
        Ok(None) => {
            return Err(ApiError::nao_encontrado(format!(
                "Produto com ID {} não encontrado.",
                id
            )))
        }
        Err(e) if violacao_chave_estrangeira(&e) => {
            tracing::warn!(produto_id = id, "Exclusão de produto usado em pedidos");
            return Err(ApiError::Conflito(format!(
                "Produto com ID {} faz parte de pedidos e não pode ser excluído.",
                id
            )));
        }
        Err(e) => return Err(ApiError::interno("Erro ao excluir produto", e)),
    };

    if let Err(e) = data.imagens.remover(&produto.imagem).await {
        tracing::warn!(erro = %e, imagem = %produto.imagem, "Falha ao apagar imagem do produto");
    }

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Produto com ID {} excluído com sucesso.", id),
        produto,
    )))
}

/// Rota que serve as imagens gravadas no disco local.
#[get("/uploads/{arquivo}")]
pub async fn servir_imagem(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let arquivo = path.into_inner();
    let caminho = data
        .imagens
        .caminho_do_arquivo(&arquivo)
        .ok_or_else(|| ApiError::nao_encontrado("Imagem não encontrada"))?;

    let conteudo = web::block(move || std::fs::read(caminho))
        .await
        .map_err(|e| ApiError::interno("Erro ao ler imagem", e))?;

    match conteudo {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .content_type(content_type_por_extensao(&arquivo))
            .body(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::nao_encontrado("Imagem não encontrada"))
        }
        Err(e) => Err(ApiError::interno("Erro ao ler imagem", e)),
    }
}

fn content_type_por_extensao(arquivo: &str) -> &'static str {
    let extensao = arquivo.rsplit('.').next().unwrap_or("").to_lowercase();
    match extensao.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Lê todos os campos do formulário, respeitando os limites de tamanho.
async fn ler_formulario(mut payload: Multipart) -> Result<FormularioProduto, ApiError> {
    let mut formulario = FormularioProduto::default();

    while let Some(mut campo) = payload
        .try_next()
        .await
        .map_err(|e| ApiError::validacao(format!("Formulário inválido: {}", e)))?
    {
        let disposicao = campo.content_disposition().clone();
        let nome_campo = disposicao.get_name().unwrap_or("").to_string();
        let limite = if nome_campo == "imagem" {
            TAMANHO_MAXIMO
        } else {
            TAMANHO_MAXIMO_CAMPO
        };

        let mut dados = Vec::new();
        while let Some(pedaco) = campo
            .try_next()
            .await
            .map_err(|e| ApiError::validacao(format!("Formulário inválido: {}", e)))?
        {
            if dados.len() + pedaco.len() > limite {
                return Err(ApiError::validacao(format!(
                    "Campo \"{}\" excede o tamanho máximo permitido",
                    nome_campo
                )));
            }
            dados.extend_from_slice(&pedaco);
        }

        match nome_campo.as_str() {
            "imagem" => {
                formulario.imagem = Some(ArquivoEnviado {
                    nome: disposicao.get_filename().unwrap_or("").to_string(),
                    content_type: campo.content_type().map(|m| m.essence_str().to_string()),
                    dados,
                });
            }
            "nome" => formulario.nome = Some(texto(&nome_campo, dados)?),
            "descricao" => formulario.descricao = Some(texto(&nome_campo, dados)?),
            "tamanhos" => formulario.tamanhos = Some(texto(&nome_campo, dados)?),
            outro => tracing::debug!(campo = %outro, "Campo de formulário ignorado"),
        }
    }

    Ok(formulario)
}

fn texto(nome_campo: &str, dados: Vec<u8>) -> Result<String, ApiError> {
    String::from_utf8(dados)
        .map_err(|_| ApiError::validacao(format!("Campo \"{}\" não é texto UTF-8", nome_campo)))
}
