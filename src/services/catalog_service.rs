// src/services/catalog_service.rs

use crate::{
    common::error::AppError,
    db::Repositories,
    models::catalog::{ServiceCatalogItem, ServiceCategory},
};

// Tabela de preços padrão, embutida no binário
const DEFAULT_CATALOG: &str = include_str!("../../data/service_catalog.json");

pub fn default_catalog() -> Result<Vec<ServiceCatalogItem>, AppError> {
    Ok(serde_json::from_str(DEFAULT_CATALOG)?)
}

#[derive(Clone)]
pub struct CatalogService {
    repos: Repositories,
}

impl CatalogService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn list_catalog(
        &self,
        category: Option<ServiceCategory>,
        only_active: bool,
    ) -> Result<Vec<ServiceCatalogItem>, AppError> {
        let items = self.repos.catalog.list_catalog().await?;
        Ok(items
            .into_iter()
            .filter(|i| category.is_none_or(|c| i.category == c))
            .filter(|i| !only_active || i.active)
            .collect())
    }

    pub async fn save_item(&self, item: ServiceCatalogItem) -> Result<ServiceCatalogItem, AppError> {
        if item.code.trim().is_empty() {
            return Err(AppError::InvalidInput("O código do serviço é obrigatório.".into()));
        }
        if item.value.is_sign_negative() || item.cost.is_some_and(|c| c.is_sign_negative()) {
            return Err(AppError::InvalidInput("O valor não pode ser negativo.".into()));
        }
        self.repos.catalog.save_catalog_item(item).await
    }

    /// Carrega a tabela padrão se o catálogo estiver vazio.
    pub async fn seed_defaults(&self) -> Result<usize, AppError> {
        let inserted = self.repos.catalog.seed_catalog(default_catalog()?).await?;
        if inserted > 0 {
            tracing::info!("✅ Catálogo de serviços populado com {} itens", inserted);
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::local::LocalStore;
    use rust_decimal_macros::dec;

    #[test]
    fn bundled_catalog_is_valid() {
        let items = default_catalog().unwrap();
        assert!(!items.is_empty());
        for category in [
            ServiceCategory::ComputadoresNotebooks,
            ServiceCategory::Impressoras,
            ServiceCategory::Celulares,
            ServiceCategory::CamerasSeguranca,
        ] {
            assert!(items.iter().any(|i| i.category == category));
        }
    }

    #[tokio::test]
    async fn seed_runs_only_once_and_filters_work() {
        let service = CatalogService::new(Repositories::local(LocalStore::in_memory()));
        let total = default_catalog().unwrap().len();

        assert_eq!(service.seed_defaults().await.unwrap(), total);
        assert_eq!(service.seed_defaults().await.unwrap(), 0);

        let mut item = service
            .list_catalog(Some(ServiceCategory::Impressoras), true)
            .await
            .unwrap()
            .remove(0);
        item.active = false;
        item.value = dec!(95);
        service.save_item(item.clone()).await.unwrap();

        let all = service.list_catalog(None, false).await.unwrap();
        assert_eq!(all.len(), total);
        assert_eq!(service.list_catalog(None, true).await.unwrap().len(), total - 1);
        let saved = all.iter().find(|i| i.code == item.code).unwrap();
        assert_eq!(saved.value, dec!(95));
    }
}
