// src/services/sales_service.rs

use validator::Validate;

use crate::{
    common::error::AppError,
    db::Repositories,
    models::{
        finance::Transaction,
        sales::{NewSale, Sale, SaleDraft},
    },
};

#[derive(Clone)]
pub struct SalesService {
    repos: Repositories,
}

impl SalesService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Registra a venda: grava, baixa o estoque e lança a entrada no caixa.
    pub async fn create_sale(&self, mut new: NewSale) -> Result<(Sale, Transaction), AppError> {
        new.validate()?;

        // Itens sem descrição herdam a do produto
        for item in new.items.iter_mut().filter(|i| i.description.trim().is_empty()) {
            if let Some(product) = self.repos.products.get_product(&item.product_id).await? {
                item.description = product.description;
            }
        }

        let draft = SaleDraft::from_new(new)?;
        let (sale, transaction) = self.repos.sales.record_sale(draft).await?;
        tracing::info!(
            "🛒 Venda {} registrada: {} itens, total {}",
            sale.id,
            sale.items.len(),
            sale.total_value
        );
        Ok((sale, transaction))
    }

    pub async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        self.repos.sales.list_sales().await
    }

    pub async fn get_sale(&self, id: &str) -> Result<Sale, AppError> {
        self.repos
            .sales
            .get_sale(id)
            .await?
            .ok_or_else(|| AppError::not_found("Venda"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::local::LocalStore,
        models::{
            finance::{TransactionType, CATEGORY_SALES},
            inventory::NewProduct,
            sales::{NewSaleItem, PaymentMethod, SaleStatus},
        },
    };
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn sale_decrements_stock_and_posts_income() {
        let repos = Repositories::local(LocalStore::in_memory());
        let service = SalesService::new(repos.clone());
        let product = repos
            .products
            .create_product(NewProduct {
                barcode: "789".into(),
                description: "Carregador 20W".into(),
                purchase_price: dec!(30),
                resale_price: dec!(59.90),
                stock_quantity: 10,
                image_url: String::new(),
                supplier: String::new(),
            })
            .await
            .unwrap();

        let (sale, transaction) = service
            .create_sale(NewSale {
                client_id: None,
                customer_name: "Balcão".into(),
                items: vec![NewSaleItem {
                    product_id: product.id.clone(),
                    description: String::new(),
                    quantity: 3,
                    unit_price: dec!(59.90),
                }],
                payment_method: PaymentMethod::Pix,
            })
            .await
            .unwrap();

        assert_eq!(sale.status, SaleStatus::Completed);
        assert_eq!(sale.total_value, dec!(179.70));
        assert_eq!(sale.items[0].description, "Carregador 20W");
        assert!(sale.id.starts_with("V-"));

        let product = repos.products.get_product(&product.id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 7);

        assert_eq!(transaction.transaction_type, TransactionType::Income);
        assert_eq!(transaction.amount, sale.total_value);
        assert_eq!(transaction.category, CATEGORY_SALES);
        assert_eq!(repos.transactions.list_transactions().await.unwrap().len(), 1);
        assert_eq!(service.get_sale(&sale.id).await.unwrap(), sale);
    }

    #[tokio::test]
    async fn sale_without_items_is_rejected() {
        let repos = Repositories::local(LocalStore::in_memory());
        let service = SalesService::new(repos.clone());

        let result = service
            .create_sale(NewSale {
                client_id: None,
                customer_name: "Balcão".into(),
                items: Vec::new(),
                payment_method: PaymentMethod::Money,
            })
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert!(repos.sales.list_sales().await.unwrap().is_empty());
        assert!(repos.transactions.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_price_is_rejected_before_anything_is_written() {
        let repos = Repositories::local(LocalStore::in_memory());
        let service = SalesService::new(repos.clone());

        let result = service
            .create_sale(NewSale {
                client_id: None,
                customer_name: "Balcão".into(),
                items: vec![NewSaleItem {
                    product_id: "1234".into(),
                    description: "Placa-mãe".into(),
                    quantity: 2,
                    unit_price: rust_decimal::Decimal::MAX,
                }],
                payment_method: PaymentMethod::Money,
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert!(repos.sales.list_sales().await.unwrap().is_empty());
        assert!(repos.transactions.list_transactions().await.unwrap().is_empty());
    }
}
