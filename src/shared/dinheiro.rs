// src/shared/dinheiro.rs

use bigdecimal::BigDecimal;

/// Confere se o preço cabe numa coluna `NUMERIC(10, 2)` e devolve o valor
/// com exatamente duas casas decimais, como o banco o guarda.
///
/// Rejeita preços negativos, a partir de 100 milhões, ou com frações de
/// centavo (`8.555`). Zeros à direita são aceitos (`12.000` vira `12.00`).
pub fn normalizar_preco(preco: &BigDecimal) -> Result<BigDecimal, String> {
    if *preco < BigDecimal::from(0) {
        return Err("o preço não pode ser negativo".to_string());
    }
    if *preco >= BigDecimal::from(100_000_000) {
        return Err("o preço máximo é 99999999.99".to_string());
    }

    let centavos = preco.with_scale(2);
    if centavos != *preco {
        return Err("o preço aceita no máximo duas casas decimais".to_string());
    }
    Ok(centavos)
}
