// src/produtos/mod.rs

// Structs do produto e dos seus tamanhos
pub mod produtos_structs;
// Consultas SQL e o catálogo usado na precificação
pub mod produtos_repositorio;
// Armazenamento das imagens dos produtos
pub mod imagens;
// Rotas HTTP
pub mod produtos_router;
