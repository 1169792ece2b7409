// src/main.rs

use std::sync::Arc;

use actix_web::{middleware, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// Importa os módulos
mod complementos; // Módulo de complementos (adicionais)
mod config;       // Configuração via variáveis de ambiente
mod pedidos;      // Módulo de pedidos e precificação
mod produtos;     // Módulo de produtos, tamanhos e imagens
mod shared;       // Módulo shared

use complementos::complementos_repositorio::PgComplementos;
use config::Config;
use pedidos::pedidos_repositorio::PgPedidos;
use pedidos::pedidos_servico::ServicoPedidos;
use produtos::imagens::DiscoLocal;
use produtos::produtos_repositorio::PgProdutos;

// Estado compartilhado com as rotas de catálogo: conexão com o banco e as imagens.
pub struct AppState {
    pub db_pool: Pool<Postgres>,
    pub imagens: DiscoLocal,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "acaiteria"
    }))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Logs estruturados; o nível pode ser trocado com RUST_LOG
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,acaiteria=debug")),
        )
        .init();

    let config = Config::from_env()?;

    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Falha ao conectar ao banco PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Falha ao aplicar as migrações")?;

    let imagens = DiscoLocal::new(&config.upload_dir).with_context(|| {
        format!("Falha ao criar a pasta de uploads {}", config.upload_dir.display())
    })?;
    tracing::info!(pasta = %imagens.pasta().display(), "Imagens gravadas em disco local");

    // Os catálogos e o repositório de pedidos são injetados no serviço
    let servico_pedidos = web::Data::new(ServicoPedidos::new(
        Arc::new(PgProdutos::new(db_pool.clone())),
        Arc::new(PgComplementos::new(db_pool.clone())),
        Arc::new(PgPedidos::new(db_pool.clone())),
    ));

    let app_state = web::Data::new(AppState { db_pool, imagens });

    tracing::info!("Iniciando API da açaiteria em {}:{}", config.host, config.port);

    // Configura e inicia o servidor HTTP.
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            // Erros de JSON e de path no mesmo formato das demais respostas
            .app_data(shared::erros::json_config())
            .app_data(shared::erros::path_config())
            .app_data(app_state.clone())
            .app_data(servico_pedidos.clone())

            // Módulo de Produtos
            .service(produtos::produtos_router::buscar_produtos)
            .service(produtos::produtos_router::buscar_produto_por_id)
            .service(produtos::produtos_router::cadastrar_produto)
            .service(produtos::produtos_router::deletar_produto)
            .service(produtos::produtos_router::servir_imagem)

            // Módulo de Complementos
            .service(complementos::complementos_router::cadastrar_complementos)
            .service(complementos::complementos_router::buscar_complementos)
            .service(complementos::complementos_router::deletar_complemento)

            // Módulo de Pedidos
            .service(pedidos::pedidos_router::buscar_pedidos)
            .service(pedidos::pedidos_router::criar_pedido)

            .route("/health", web::get().to(health))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
