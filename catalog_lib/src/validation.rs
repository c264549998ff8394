//! Create-form validation.
//!
//! A [`ProductForm`] holds raw user input. Only [`ProductForm::validate`] can
//! turn it into a [`NewProduct`], so invalid input never reaches the cached
//! client.

use std::collections::BTreeMap;
use std::fmt;

pub const MIN_TITLE_LENGTH: usize = 3;
pub const MIN_DESCRIPTION_LENGTH: usize = 10;

/// Brands offered by the create form.
pub const PRODUCT_BRANDS: &[&str] = &[
    "Apple",
    "Samsung",
    "Sony",
    "Microsoft",
    "Google",
    "HP",
    "Dell",
    "Lenovo",
    "Nike",
    "Adidas",
    "Canon",
    "Nikon",
    "LG",
    "Panasonic",
    "Philips",
];

/// Categories offered by the create form.
pub const PRODUCT_CATEGORIES: &[&str] = &[
    "smartphones",
    "laptops",
    "fragrances",
    "skincare",
    "groceries",
    "home-decoration",
    "furniture",
    "tops",
    "womens-dresses",
    "womens-shoes",
    "mens-shirts",
    "mens-shoes",
    "mens-watches",
    "womens-watches",
    "womens-bags",
    "womens-jewellery",
    "sunglasses",
    "automotive",
    "motorcycle",
    "lighting",
];

/// Form fields, used as error keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Title,
    Description,
    Price,
    Brand,
    Category,
    Stock,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FormField::Title => "title",
                FormField::Description => "description",
                FormField::Price => "price",
                FormField::Brand => "brand",
                FormField::Category => "category",
                FormField::Stock => "stock",
            }
        )
    }
}

/// Per-field validation messages. Empty means the form is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<FormField, String>,
}

impl FormErrors {
    fn insert(&mut self, field: FormField, message: &str) {
        self.errors.insert(field, message.to_string());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Drops the message for one field, as when the user edits it again.
    pub fn clear(&mut self, field: FormField) {
        self.errors.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        write!(f, "{}", lines.join("; "))
    }
}

impl std::error::Error for FormErrors {}

/// Raw create-form input, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub brand: String,
    pub category: String,
    pub stock: String,
}

/// Validated input for creating a product.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub brand: String,
    pub category: String,
    pub stock: u32,
}

impl ProductForm {
    /// Checks every field and returns either the typed input or all the
    /// field errors at once.
    pub fn validate(&self) -> Result<NewProduct, FormErrors> {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.insert(FormField::Title, "Title is required");
        } else if title.chars().count() < MIN_TITLE_LENGTH {
            errors.insert(FormField::Title, "Title must be at least 3 characters");
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.insert(FormField::Description, "Description is required");
        } else if description.chars().count() < MIN_DESCRIPTION_LENGTH {
            errors.insert(
                FormField::Description,
                "Description must be at least 10 characters",
            );
        }

        let price = self.price.trim().parse::<f64>().ok();
        if self.price.trim().is_empty() {
            errors.insert(FormField::Price, "Price is required");
        } else if !matches!(price, Some(p) if p.is_finite() && p > 0.0) {
            errors.insert(FormField::Price, "Price must be a positive number");
        }

        if self.brand.is_empty() {
            errors.insert(FormField::Brand, "Brand is required");
        }

        if self.category.is_empty() {
            errors.insert(FormField::Category, "Category is required");
        }

        let stock = self.stock.trim().parse::<u32>().ok();
        if self.stock.trim().is_empty() {
            errors.insert(FormField::Stock, "Stock is required");
        } else if stock.is_none() {
            errors.insert(FormField::Stock, "Stock must be a non-negative number");
        }

        match (price, stock) {
            (Some(price), Some(stock)) if errors.is_empty() => Ok(NewProduct {
                // Stored as typed; only the checks above trim.
                title: self.title.clone(),
                description: self.description.clone(),
                price,
                brand: self.brand.clone(),
                category: self.category.clone(),
                stock,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
