// src/complementos/mod.rs

// Structs dos complementos (adicionais e inclusões)
pub mod complementos_structs;
// Consultas SQL e o catálogo usado na precificação
pub mod complementos_repositorio;
// Rotas HTTP
pub mod complementos_router;
