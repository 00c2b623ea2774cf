//! Catalog product types.

use serde::Serialize;

use backstock_core::{Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Full-size image path.
    pub image: String,
    /// Thumbnail image path.
    pub small_image: String,
    /// Alt text for both images.
    pub image_alt: String,
    /// List price.
    pub price: Price,
    /// Promotional price, if the product is on promotion.
    pub promotion: Option<Price>,
}

impl Product {
    /// The price a customer pays right now.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.price.with_promotion(self.promotion)
    }

    /// Whether a promotion is attached.
    #[must_use]
    pub const fn is_on_promotion(&self) -> bool {
        self.promotion.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(promotion: Option<Price>) -> Product {
        Product {
            id: ProductId::new(3),
            name: "Strat".to_owned(),
            description: "Electric guitar".to_owned(),
            image: "img/strat.jpeg".to_owned(),
            small_image: "img/strat-small.jpeg".to_owned(),
            image_alt: "strat".to_owned(),
            price: Price::from_cents(89_900),
            promotion,
        }
    }

    #[test]
    fn test_effective_price_uses_promotion() {
        let p = product(Some(Price::from_cents(69_900)));
        assert!(p.is_on_promotion());
        assert_eq!(p.effective_price(), Price::from_cents(69_900));
    }

    #[test]
    fn test_effective_price_without_promotion() {
        let p = product(None);
        assert!(!p.is_on_promotion());
        assert_eq!(p.effective_price(), Price::from_cents(89_900));
    }
}
