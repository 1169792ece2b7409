// src/pedidos/pedidos_router.rs

use actix_web::{get, post, web, HttpResponse};

use super::pedidos_servico::ServicoPedidos;
use super::pedidos_structs::NovoPedido;
use crate::shared::erros::ApiError;
use crate::shared::shared_structs::GenericResponse;

/// Rota para listar os pedidos, do mais antigo para o mais novo,
/// com os itens e os complementos de cada um.
#[get("/pedidos")]
pub async fn buscar_pedidos(servico: web::Data<ServicoPedidos>) -> Result<HttpResponse, ApiError> {
    let pedidos = servico.listar().await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Pedidos listados com sucesso!",
        pedidos,
    )))
}

/// Rota para criar um pedido.
///
/// Os preços vêm do catálogo: o corpo só informa produto, tamanho e
/// complementos de cada item. Se algum item não puder ser resolvido, o
/// pedido não é criado e a resposta é 400 com o detalhe do problema.
#[post("/pedidos")]
pub async fn criar_pedido(
    servico: web::Data<ServicoPedidos>,
    novo: web::Json<NovoPedido>,
) -> Result<HttpResponse, ApiError> {
    let criado = servico.criar(&novo).await?;

    Ok(HttpResponse::Created().json(GenericResponse::sucesso(
        format!("Pedido criado com sucesso! ID: {}", criado.pedido.id),
        criado,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedidos::memoria::{CatalogoEmMemoria, RepositorioEmMemoria};
    use crate::shared::erros::json_config;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use bigdecimal::BigDecimal;
    use serde_json::{json, Value};
    use std::str::FromStr;
    use std::sync::Arc;

    fn servico_de_teste(repositorio: Arc<RepositorioEmMemoria>) -> web::Data<ServicoPedidos> {
        let catalogo = Arc::new(
            CatalogoEmMemoria::new()
                .com_produto(1, "Açaí tradicional", &[("Pequeno", "8.00"), ("Grande", "12.00")])
                .com_complemento(5, "Granola", "2.00")
                .com_complemento(6, "Leite condensado", "1.50"),
        );
        web::Data::new(ServicoPedidos::new(catalogo.clone(), catalogo, repositorio))
    }

    fn corpo_pedido(produtos: Value) -> Value {
        json!({
            "nomeCliente": "Maria",
            "telefone": "91 99999-0000",
            "endereco": "Tv. Padre Eutíquio, 100",
            "metodoPagamento": "pix",
            "produtos": produtos,
        })
    }

    fn decimal(valor: &Value) -> BigDecimal {
        serde_json::from_value(valor.clone()).unwrap()
    }

    #[actix_web::test]
    async fn cria_pedido_e_devolve_detalhes_de_preco() {
        let repositorio = Arc::new(RepositorioEmMemoria::default());
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(servico_de_teste(repositorio.clone()))
                .service(criar_pedido),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/pedidos")
            .set_json(corpo_pedido(json!([
                { "produtoId": 1, "tamanho": "Grande", "complementos": [5, 6] }
            ])))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let corpo: Value = test::read_body_json(resp).await;
        assert_eq!(corpo["status"], "success");
        let detalhes = &corpo["body"]["detalhesPrecos"];
        assert_eq!(decimal(&detalhes["valorTotal"]), BigDecimal::from_str("15.50").unwrap());
        assert_eq!(decimal(&detalhes["itens"][0]["precoBase"]), BigDecimal::from(12));
        assert_eq!(
            decimal(&detalhes["itens"][0]["precoComplementos"]),
            BigDecimal::from_str("3.50").unwrap()
        );
        assert_eq!(detalhes["itens"][0]["complementos"], json!([5, 6]));
        assert_eq!(corpo["body"]["pedido"]["status"], "pendente");
        assert_eq!(repositorio.gravados().len(), 1);
    }

    #[actix_web::test]
    async fn complemento_inexistente_devolve_400_com_ids() {
        let repositorio = Arc::new(RepositorioEmMemoria::default());
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(servico_de_teste(repositorio.clone()))
                .service(criar_pedido),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/pedidos")
            .set_json(corpo_pedido(json!([
                { "produtoId": 1, "tamanho": "Grande", "complementos": [5, 42] }
            ])))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let corpo: Value = test::read_body_json(resp).await;
        assert_eq!(corpo["status"], "error");
        assert_eq!(corpo["body"]["entidade"], "complemento");
        assert_eq!(corpo["body"]["complementos"], json!([42]));
        assert!(repositorio.gravados().is_empty());
    }

    #[actix_web::test]
    async fn preco_enviado_pelo_cliente_e_rejeitado() {
        let repositorio = Arc::new(RepositorioEmMemoria::default());
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(servico_de_teste(repositorio.clone()))
                .service(criar_pedido),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/pedidos")
            .set_json(corpo_pedido(json!([
                { "produtoId": 1, "tamanho": "Grande", "preco": 0.01 }
            ])))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let corpo: Value = test::read_body_json(resp).await;
        assert_eq!(corpo["status"], "error");
        assert!(repositorio.gravados().is_empty());
    }

    #[actix_web::test]
    async fn falha_ao_gravar_devolve_500() {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(servico_de_teste(Arc::new(RepositorioEmMemoria::falhando())))
                .service(criar_pedido),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/pedidos")
            .set_json(corpo_pedido(json!([{ "produtoId": 1, "tamanho": "Pequeno" }])))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn lista_pedidos() {
        let repositorio = Arc::new(RepositorioEmMemoria::default());
        let servico = servico_de_teste(repositorio);
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(servico.clone())
                .service(buscar_pedidos)
                .service(criar_pedido),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/pedidos")
            .set_json(corpo_pedido(json!([{ "produtoId": 1, "tamanho": "Pequeno" }])))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/pedidos").to_request();
        let corpo: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(corpo["body"].as_array().map(|p| p.len()), Some(1));
        assert_eq!(corpo["body"][0]["nomeCliente"], "Maria");
    }
}
