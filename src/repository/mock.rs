use mockall::mock;

use super::{ProductReader, ProductWriter, PromotionReader, PromotionWriter, RepositoryResult};
use crate::domain::{
    product::{NewProduct, Product, ProductListQuery},
    promotion::{NewPromotion, Promotion},
};

mock! {
    pub PromotionReader {}

    impl PromotionReader for PromotionReader {
        fn get_promotion_by_id(&self, id: i64) -> RepositoryResult<Option<Promotion>>;
        fn list_promotions(&self) -> RepositoryResult<Vec<Promotion>>;
    }
}

mock! {
    pub PromotionWriter {}

    impl PromotionWriter for PromotionWriter {
        fn create_promotion(&self, new_promotion: &NewPromotion) -> RepositoryResult<Promotion>;
        fn update_promotion(&self, id: i64, updates: &NewPromotion) -> RepositoryResult<Promotion>;
        fn set_promotion_active(&self, id: i64, active: bool) -> RepositoryResult<Promotion>;
        fn delete_promotion(&self, id: i64) -> RepositoryResult<()>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
    }
}
