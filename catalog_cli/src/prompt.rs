//! Line-based prompts on stdin, shared by `login`, `create` and the shell.

use std::io::Write;

use anyhow::Result;
use catalog_lib::validation::{FormField, PRODUCT_BRANDS, PRODUCT_CATEGORIES};
use catalog_lib::{FormErrors, NewProduct, ProductForm};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Prints `label` and reads one line. `None` means stdin is closed.
    pub async fn ask(&mut self, label: &str) -> Result<Option<String>> {
        print!("{}", label);
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }

    /// Asks for a value unless one was already given on the command line.
    pub async fn ask_or(&mut self, given: Option<&str>, label: &str) -> Result<String> {
        match given {
            Some(value) => Ok(value.to_string()),
            None => Ok(self.ask(label).await?.unwrap_or_default()),
        }
    }

    /// Fills in the missing fields of `form`, then re-asks only the fields
    /// that fail validation until the form is valid. Returns `None` if the
    /// user gives up or stdin closes.
    pub async fn complete_form(&mut self, mut form: ProductForm) -> Result<Option<NewProduct>> {
        for field in ALL_FIELDS {
            if field_value(&form, field).is_empty() {
                let Some(answer) = self.ask(&field_label(field)).await? else {
                    return Ok(None);
                };
                set_field(&mut form, field, answer);
            }
        }

        loop {
            let errors: FormErrors = match form.validate() {
                Ok(product) => return Ok(Some(product)),
                Err(errors) => errors,
            };
            for (field, message) in errors.iter() {
                eprintln!("  {}: {}", field, message);
            }
            match self.ask("Fix and try again? [Y/n] ").await? {
                Some(answer) if answer.trim().eq_ignore_ascii_case("n") => return Ok(None),
                None => return Ok(None),
                Some(_) => {}
            }
            for (field, _) in errors.iter() {
                let Some(answer) = self.ask(&field_label(field)).await? else {
                    return Ok(None);
                };
                set_field(&mut form, field, answer);
            }
        }
    }
}

const ALL_FIELDS: [FormField; 6] = [
    FormField::Title,
    FormField::Description,
    FormField::Price,
    FormField::Brand,
    FormField::Category,
    FormField::Stock,
];

fn field_label(field: FormField) -> String {
    match field {
        FormField::Brand => format!("brand ({}): ", PRODUCT_BRANDS.join(", ")),
        FormField::Category => format!("category ({}): ", PRODUCT_CATEGORIES.join(", ")),
        other => format!("{}: ", other),
    }
}

fn field_value(form: &ProductForm, field: FormField) -> &str {
    match field {
        FormField::Title => &form.title,
        FormField::Description => &form.description,
        FormField::Price => &form.price,
        FormField::Brand => &form.brand,
        FormField::Category => &form.category,
        FormField::Stock => &form.stock,
    }
}

fn set_field(form: &mut ProductForm, field: FormField, value: String) {
    let slot = match field {
        FormField::Title => &mut form.title,
        FormField::Description => &mut form.description,
        FormField::Price => &mut form.price,
        FormField::Brand => &mut form.brand,
        FormField::Category => &mut form.category,
        FormField::Stock => &mut form.stock,
    };
    *slot = value;
}
