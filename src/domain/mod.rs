pub mod pricing;
pub mod product;
pub mod promotion;
