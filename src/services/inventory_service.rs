// src/services/inventory_service.rs

use validator::Validate;

use crate::{
    common::error::AppError,
    db::Repositories,
    models::inventory::{NewProduct, Product},
};

#[derive(Clone)]
pub struct InventoryService {
    repos: Repositories,
}

impl InventoryService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn create_product(&self, new: NewProduct) -> Result<Product, AppError> {
        new.validate()?;
        self.repos.products.create_product(new).await
    }

    /// Filtro opcional por código de barras ou descrição.
    pub async fn list_products(&self, query: Option<&str>) -> Result<Vec<Product>, AppError> {
        let products = self.repos.products.list_products().await?;
        Ok(match query {
            Some(q) => products.into_iter().filter(|p| p.matches(q)).collect(),
            None => products,
        })
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, AppError> {
        self.repos
            .products
            .get_product(id)
            .await?
            .ok_or_else(|| AppError::not_found("Produto"))
    }

    pub async fn save_product(&self, product: &Product) -> Result<Product, AppError> {
        if product.description.trim().is_empty() {
            return Err(AppError::InvalidInput("A descrição é obrigatória.".into()));
        }
        if product.purchase_price.is_sign_negative() || product.resale_price.is_sign_negative() {
            return Err(AppError::InvalidInput("O valor não pode ser negativo.".into()));
        }
        self.repos.products.save_product(product).await
    }

    /// Entrada (delta positivo) ou ajuste manual de estoque.
    pub async fn adjust_stock(&self, id: &str, delta: i32) -> Result<Product, AppError> {
        self.repos
            .products
            .adjust_stock(id, delta)
            .await?
            .ok_or_else(|| AppError::not_found("Produto"))
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), AppError> {
        if !self.repos.products.delete_product(id).await? {
            return Err(AppError::not_found("Produto"));
        }
        tracing::info!("🗑️ Produto {} removido", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::local::LocalStore;
    use rust_decimal_macros::dec;

    fn new_product(barcode: &str, description: &str) -> NewProduct {
        NewProduct {
            barcode: barcode.into(),
            description: description.into(),
            purchase_price: dec!(10),
            resale_price: dec!(25),
            stock_quantity: 4,
            image_url: String::new(),
            supplier: "Distribuidora".into(),
        }
    }

    #[tokio::test]
    async fn search_by_barcode_or_description() {
        let service = InventoryService::new(Repositories::local(LocalStore::in_memory()));
        service.create_product(new_product("7891", "Cabo USB-C")).await.unwrap();
        service.create_product(new_product("5550", "Fonte 65W")).await.unwrap();

        assert_eq!(service.list_products(Some("usb")).await.unwrap().len(), 1);
        assert_eq!(service.list_products(Some("555")).await.unwrap().len(), 1);
        assert_eq!(service.list_products(Some("")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_and_adjust_unknown_product() {
        let service = InventoryService::new(Repositories::local(LocalStore::in_memory()));
        let product = service.create_product(new_product("1", "Mouse")).await.unwrap();

        let product = service.adjust_stock(&product.id, 6).await.unwrap();
        assert_eq!(product.stock_quantity, 10);

        service.delete_product(&product.id).await.unwrap();
        assert!(matches!(
            service.delete_product(&product.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.adjust_stock(&product.id, 1).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn create_rejects_negative_price() {
        let service = InventoryService::new(Repositories::local(LocalStore::in_memory()));
        let mut new = new_product("1", "Teclado");
        new.resale_price = dec!(-1);

        assert!(matches!(
            service.create_product(new).await,
            Err(AppError::ValidationError(_))
        ));
    }
}
