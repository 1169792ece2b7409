// src/shared/mod.rs

// Envelope padrão das respostas da API
pub mod shared_structs;
// Erros HTTP e configuração dos extratores
pub mod erros;
// Preços em reais
pub mod dinheiro;
