// src/complementos/complementos_router.rs

use actix_web::{delete, get, post, web, HttpResponse};

use super::complementos_repositorio;
use super::complementos_structs::NovoComplemento;
use crate::shared::erros::{violacao_chave_estrangeira, ApiError};
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Rota para cadastrar vários complementos de uma vez.
///
/// O corpo é um array. Todos os itens são validados antes de qualquer
/// inserção, e a inserção acontece numa transação única.
#[post("/complementos")]
pub async fn cadastrar_complementos(
    data: web::Data<AppState>,
    itens: web::Json<Vec<NovoComplemento>>,
) -> Result<HttpResponse, ApiError> {
    let itens = itens.into_inner();
    if itens.is_empty() {
        return Err(ApiError::validacao(
            "O corpo da requisição deve ser um array de complementos",
        ));
    }

    for item in &itens {
        item.validar().map_err(ApiError::validacao)?;
    }

    let criados = complementos_repositorio::inserir_varios(&data.db_pool, &itens)
        .await
        .map_err(|e| ApiError::interno("Erro ao criar complementos", e))?;

    tracing::info!(quantidade = criados.len(), "Complementos cadastrados");

    Ok(HttpResponse::Created().json(GenericResponse::sucesso(
        format!("{} complemento(s) cadastrado(s) com sucesso!", criados.len()),
        criados,
    )))
}

/// Rota para listar todos os complementos, em ordem alfabética.
#[get("/complementos")]
pub async fn buscar_complementos(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let complementos = complementos_repositorio::listar(&data.db_pool)
        .await
        .map_err(|e| ApiError::interno("Erro ao buscar complementos", e))?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Complementos listados com sucesso!",
        complementos,
    )))
}

/// Rota para excluir um complemento.
#[delete("/complementos/{id}")]
pub async fn deletar_complemento(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    match complementos_repositorio::remover(&data.db_pool, id).await {
        Ok(Some(complemento)) => Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
            format!("Complemento com ID {} excluído com sucesso.", id),
            complemento,
        ))),
        Ok(None) => Err(ApiError::nao_encontrado(format!(
            "Complemento com ID {} não encontrado.",
            id
        ))),
        Err(e) if violacao_chave_estrangeira(&e) => {
            tracing::warn!(complemento_id = id, "Exclusão de complemento usado em pedidos");
            Err(ApiError::Conflito(format!(
                "Complemento com ID {} faz parte de pedidos e não pode ser excluído.",
                id
            )))
        }
        Err(e) => Err(ApiError::interno("Erro ao excluir complemento", e)),
    }
}
