//! Product editor form
//!
//! Holds the raw text of the six writable fields and turns it into a
//! [`ProductInput`]. Checks are limited to what the form itself enforces:
//! every field present, non-negative numbers, an absolute http(s) image
//! URL. Everything else is the server's call.

use reqwest::Url;
use thiserror::Error;

use crate::client::{Product, ProductInput};

/// Editable fields of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Description,
    Price,
    Category,
    Stock,
    Image,
}

impl ProductField {
    pub const ALL: [ProductField; 6] = [
        ProductField::Name,
        ProductField::Description,
        ProductField::Price,
        ProductField::Category,
        ProductField::Stock,
        ProductField::Image,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProductField::Name => "Name",
            ProductField::Description => "Description",
            ProductField::Price => "Price",
            ProductField::Category => "Category",
            ProductField::Stock => "Stock",
            ProductField::Image => "Image URL",
        }
    }
}

impl std::str::FromStr for ProductField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(ProductField::Name),
            "description" => Ok(ProductField::Description),
            "price" => Ok(ProductField::Price),
            "category" => Ok(ProductField::Category),
            "stock" => Ok(ProductField::Stock),
            "image" => Ok(ProductField::Image),
            _ => Err(FormError::UnknownField(s.to_string())),
        }
    }
}

/// Validation failures of the product form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{} is required", .0.label())]
    Missing(ProductField),

    #[error("{} must be a number, got '{value}'", .field.label())]
    InvalidNumber { field: ProductField, value: String },

    #[error("{} cannot be negative", .0.label())]
    Negative(ProductField),

    #[error("Image URL must be an absolute http(s) URL, got '{0}'")]
    InvalidUrl(String),

    #[error("Unknown product field: {0}")]
    UnknownField(String),
}

/// Raw form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub stock: String,
    pub image: String,
}

impl ProductForm {
    /// Form pre-filled with an existing product
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            category: product.category.clone(),
            stock: product.stock.to_string(),
            image: product.image.clone(),
        }
    }

    pub fn get(&self, field: ProductField) -> &str {
        match field {
            ProductField::Name => &self.name,
            ProductField::Description => &self.description,
            ProductField::Price => &self.price,
            ProductField::Category => &self.category,
            ProductField::Stock => &self.stock,
            ProductField::Image => &self.image,
        }
    }

    pub fn set(&mut self, field: ProductField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProductField::Name => self.name = value,
            ProductField::Description => self.description = value,
            ProductField::Price => self.price = value,
            ProductField::Category => self.category = value,
            ProductField::Stock => self.stock = value,
            ProductField::Image => self.image = value,
        }
    }

    /// Check the form and build the request body
    pub fn validate(&self) -> Result<ProductInput, FormError> {
        for field in ProductField::ALL {
            if self.get(field).trim().is_empty() {
                return Err(FormError::Missing(field));
            }
        }

        let price = parse_price(self.price.trim())?;
        let stock = parse_stock(self.stock.trim())?;

        let image = self.image.trim();
        match Url::parse(image) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(FormError::InvalidUrl(image.to_string())),
        }

        Ok(ProductInput {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            category: self.category.trim().to_string(),
            stock,
            image: image.to_string(),
        })
    }
}

fn parse_price(raw: &str) -> Result<f64, FormError> {
    let price: f64 = raw.parse().map_err(|_| FormError::InvalidNumber {
        field: ProductField::Price,
        value: raw.to_string(),
    })?;

    if !price.is_finite() {
        return Err(FormError::InvalidNumber {
            field: ProductField::Price,
            value: raw.to_string(),
        });
    }
    if price < 0.0 {
        return Err(FormError::Negative(ProductField::Price));
    }
    Ok(price)
}

fn parse_stock(raw: &str) -> Result<u32, FormError> {
    match raw.parse::<i64>() {
        Ok(n) if n < 0 => Err(FormError::Negative(ProductField::Stock)),
        Ok(n) => u32::try_from(n).map_err(|_| FormError::InvalidNumber {
            field: ProductField::Stock,
            value: raw.to_string(),
        }),
        Err(_) => Err(FormError::InvalidNumber {
            field: ProductField::Stock,
            value: raw.to_string(),
        }),
    }
}
