// src/common/ids.rs

//! Política de identificadores e carimbos de tempo do armazenamento local.
//!
//! O backend remoto gera as próprias chaves primárias; nada fora daqui deve
//! presumir um formato fixo de id.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::common::error::AppError;

/// Quantidade de ids de 4 dígitos possíveis por coleção.
pub const FOUR_DIGIT_CAPACITY: usize = 9000;

// Limite de sorteios antes de desistir de achar um id livre
const MAX_ID_ATTEMPTS: usize = 100_000;

/// Orçamentos, clientes e produtos: 4 dígitos aleatórios (1000..=9999).
pub fn four_digit_id() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

/// Ordens de serviço: `OS-` + 5 dígitos aleatórios.
pub fn service_order_id() -> String {
    format!("OS-{}", rand::thread_rng().gen_range(10000..=99999))
}

/// Vendas: `V-` + timestamp em milissegundos.
pub fn sale_id(now: DateTime<Utc>) -> String {
    format!("V-{}", now.timestamp_millis())
}

/// Linhas embutidas de OS e lançamentos de caixa.
pub fn opaque_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Sorteia ids até achar um que ainda não existe na coleção.
pub fn unique_id<G, F>(mut generate: G, exists: F) -> Result<String, AppError>
where
    G: FnMut() -> String,
    F: Fn(&str) -> bool,
{
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = generate();
        if !exists(&candidate) {
            return Ok(candidate);
        }
    }
    Err(AppError::StorageError(
        "não foi possível gerar um id livre para a coleção".into(),
    ))
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_digit_ids_stay_in_range() {
        for _ in 0..500 {
            let id = four_digit_id();
            assert_eq!(id.len(), 4);
            let n: u32 = id.parse().unwrap();
            assert!((1000..=9999).contains(&n));
        }
    }

    #[test]
    fn service_order_ids_have_prefix_and_five_digits() {
        for _ in 0..500 {
            let id = service_order_id();
            let suffix = id.strip_prefix("OS-").expect("prefixo OS-");
            assert_eq!(suffix.len(), 5);
            assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn sale_id_embeds_the_timestamp() {
        let now = Utc::now();
        assert_eq!(sale_id(now), format!("V-{}", now.timestamp_millis()));
    }

    #[test]
    fn unique_id_skips_taken_candidates() {
        let mut seq = vec!["1000", "1000", "1001"].into_iter();
        let id = unique_id(|| seq.next().unwrap().to_string(), |c| c == "1000").unwrap();
        assert_eq!(id, "1001");
    }

    #[test]
    fn unique_id_gives_up_when_every_candidate_is_taken() {
        let result = unique_id(four_digit_id, |_| true);
        assert!(matches!(result, Err(AppError::StorageError(_))));
    }
}
