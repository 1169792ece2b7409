// src/pedidos/mod.rs

// Structs de requisição, precificação e pedidos gravados
pub mod pedidos_structs;
// Erros da criação de pedidos
pub mod pedidos_erros;
// Resolução dos preços a partir do catálogo
pub mod precificacao;
// Gravação e leitura de pedidos no banco
pub mod pedidos_repositorio;
// Orquestração: valida, precifica e grava
pub mod pedidos_servico;
// Rotas HTTP
pub mod pedidos_router;

#[cfg(test)]
mod memoria;
