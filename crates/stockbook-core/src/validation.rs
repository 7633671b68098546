//! # Validation Module
//!
//! Input checks the front end runs before it calls a store mutator.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  ├── Types and enum values                                             │
//! │  └── Money / date parsing                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths, positive amounts                        │
//! │  └── Duplicates (product code, customer contact / CNIC)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: EntityStore                                                  │
//! │  └── Trusts its input; unknown ids are silent no-ops                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockbook_core::validation::{validate_product_code, validate_quantity};
//!
//! validate_product_code("SSD-512-NVME").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Customer, Product, SaleItem};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product code accepted.
pub const MAX_CODE_LEN: usize = 50;

/// Longest name (product, customer, shopkeeper) accepted.
pub const MAX_NAME_LEN: usize = 200;

/// Largest unit count on a sale line or a product's stock level.
pub const MAX_QUANTITY: i64 = 1_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Rejects empty or whitespace-only values.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a product code (SKU / barcode).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, hyphens and underscores only
///
/// ```rust
/// use stockbook_core::validation::validate_product_code;
///
/// assert!(validate_product_code("GPU-RTX4060").is_ok());
/// assert!(validate_product_code("").is_err());
/// assert!(validate_product_code("has space").is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();
    validate_required("code", code)?;

    if code.len() > MAX_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name for `field` (product, customer, shopkeeper...).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();
    validate_required(field, name)?;

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a CNIC in the `XXXXX-XXXXXXX-X` layout (dashes optional).
pub fn validate_cnic(cnic: &str) -> ValidationResult<()> {
    let cnic = cnic.trim();
    let digits: String = cnic.chars().filter(|c| *c != '-').collect();

    let dashed_ok = match cnic.split('-').collect::<Vec<_>>().as_slice() {
        [whole] => whole.len() == 13,
        [a, b, c] => a.len() == 5 && b.len() == 7 && c.len() == 1,
        _ => false,
    };

    if !dashed_ok || digits.len() != 13 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "cnic".to_string(),
            reason: "expected 13 digits as XXXXX-XXXXXXX-X".to_string(),
        });
    }

    Ok(())
}

/// A deliberately loose email check: one `@` with text either side and a
/// dot in the domain.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "expected name@domain".to_string(),
    };

    let (local, domain) = email.trim().split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn too_many_units() -> ValidationError {
    ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: format!("must be at most {MAX_QUANTITY}"),
    }
}

/// Quantity on a sale line: positive, at most [`MAX_QUANTITY`].
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if qty > MAX_QUANTITY {
        return Err(too_many_units());
    }
    Ok(())
}

/// Opening stock for a product: may be zero, never negative.
pub fn validate_stock_level(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }
    if qty > MAX_QUANTITY {
        return Err(too_many_units());
    }
    Ok(())
}

/// One sale line: valid quantity and price, and a total that fits in
/// [`Money`]. Returns the line total.
pub fn validate_line(quantity: i64, price: Money) -> ValidationResult<Money> {
    validate_quantity(quantity)?;
    validate_price("price", price)?;
    price
        .checked_multiply_quantity(quantity)
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "line total is too large".to_string(),
        })
}

/// Prices and costs: zero is allowed (free items), negatives are not.
pub fn validate_price(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Ledger amounts, expenses and payments: strictly positive.
pub fn validate_positive_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Cross-Entity Validators
// =============================================================================

/// Product codes are unique. `except_id` skips the product being edited.
pub fn ensure_unique_product_code(
    products: &[Product],
    code: &str,
    except_id: Option<&str>,
) -> ValidationResult<()> {
    let code = code.trim();
    let clash = products
        .iter()
        .filter(|p| Some(p.id.as_str()) != except_id)
        .any(|p| p.code.eq_ignore_ascii_case(code));

    if clash {
        return Err(ValidationError::Duplicate {
            field: "code".to_string(),
            value: code.to_string(),
        });
    }
    Ok(())
}

/// No two customers share a contact number or a CNIC.
pub fn ensure_unique_customer(
    customers: &[Customer],
    contact: Option<&str>,
    cnic: Option<&str>,
    except_id: Option<&str>,
) -> ValidationResult<()> {
    let others = || {
        customers
            .iter()
            .filter(move |c| Some(c.id.as_str()) != except_id)
    };

    if let Some(contact) = contact.map(str::trim).filter(|c| !c.is_empty()) {
        if others().any(|c| c.contact.as_deref().map(str::trim) == Some(contact)) {
            return Err(ValidationError::Duplicate {
                field: "contact".to_string(),
                value: contact.to_string(),
            });
        }
    }

    if let Some(cnic) = cnic.map(normalize_cnic).filter(|c| !c.is_empty()) {
        let taken = others().any(|c| {
            c.cnic
                .as_deref()
                .map(normalize_cnic)
                .is_some_and(|existing| existing == cnic)
        });
        if taken {
            return Err(ValidationError::Duplicate {
                field: "cnic".to_string(),
                value: cnic,
            });
        }
    }

    Ok(())
}

fn normalize_cnic(cnic: &str) -> String {
    cnic.chars().filter(char::is_ascii_digit).collect()
}

/// A sale goes on a shopkeeper account or to a customer, not both.
pub fn validate_sale_party(
    shopkeeper_id: Option<&str>,
    customer_id: Option<&str>,
) -> ValidationResult<()> {
    if shopkeeper_id.is_some() && customer_id.is_some() {
        return Err(ValidationError::Exclusive {
            first: "shopkeeper".to_string(),
            second: "customer".to_string(),
        });
    }
    Ok(())
}

/// A sale needs at least one line, each with a positive quantity.
pub fn validate_sale_items(items: &[SaleItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }
    let mut total = Money::zero();
    for item in items {
        let line = validate_line(item.quantity, item.price)?;
        total = total
            .checked_add(line)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "items".to_string(),
                reason: "sale total is too large".to_string(),
            })?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn product(id: &str, code: &str) -> Product {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Product {
            id: id.to_string(),
            code: code.to_string(),
            name: "Logitech G102".to_string(),
            description: String::new(),
            price: Money::from_major(4_500),
            cost_price: Money::from_major(3_800),
            quantity: 10,
            category: "Peripherals".to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    fn customer(id: &str, contact: Option<&str>, cnic: Option<&str>) -> Customer {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Customer {
            id: id.to_string(),
            name: "Usman".to_string(),
            contact: contact.map(str::to_string),
            cnic: cnic.map(str::to_string),
            email: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_validate_product_code() {
        assert!(validate_product_code("MOUSE-G102").is_ok());
        assert!(validate_product_code("ssd_1tb").is_ok());

        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("   ").is_err());
        assert!(validate_product_code("has space").is_err());
        assert!(validate_product_code(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Samsung 970 EVO Plus").is_ok());
        assert!(matches!(
            validate_name("name", " "),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_name("name", &"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_cnic() {
        assert!(validate_cnic("35202-1234567-1").is_ok());
        assert!(validate_cnic("3520212345671").is_ok());

        assert!(validate_cnic("35202-1234567").is_err());
        assert!(validate_cnic("3520-21234567-1").is_err());
        assert!(validate_cnic("35202-12345a7-1").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("sales@techzone.pk").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("@techzone.pk").is_err());
        assert!(validate_email("a b@techzone.pk").is_err());
    }

    #[test]
    fn test_numeric_validators() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_stock_level(0).is_ok());
        assert!(validate_stock_level(-1).is_err());
        assert!(validate_price("price", Money::zero()).is_ok());
        assert!(validate_price("price", Money::from_minor(-1)).is_err());
        assert!(validate_positive_amount("amount", Money::zero()).is_err());
        assert!(validate_positive_amount("amount", Money::from_minor(1)).is_ok());
    }

    #[test]
    fn test_quantity_ceiling() {
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert!(matches!(
            validate_quantity(MAX_QUANTITY + 1),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(validate_quantity(90_000_000_000_000).is_err());
        assert!(validate_stock_level(MAX_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_line_overflow() {
        assert_eq!(
            validate_line(3, Money::from_major(2_200)).unwrap(),
            Money::from_major(6_600)
        );
        assert!(matches!(
            validate_line(MAX_QUANTITY, Money::from_minor(i64::MAX / 2)),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_sale_total_overflow() {
        let p = product("p1", "MOUSE-G102");
        let huge = Money::from_minor(i64::MAX / 2 + 1);
        let items = vec![SaleItem::with_price(&p, 1, huge), SaleItem::with_price(&p, 1, huge)];
        assert!(matches!(
            validate_sale_items(&items),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_duplicate_product_code() {
        let products = vec![product("p1", "CPU-I5-12400")];
        assert!(matches!(
            ensure_unique_product_code(&products, "cpu-i5-12400", None),
            Err(ValidationError::Duplicate { .. })
        ));
        // Editing the same product keeps its code.
        assert!(ensure_unique_product_code(&products, "CPU-I5-12400", Some("p1")).is_ok());
        assert!(ensure_unique_product_code(&products, "CPU-I7-12700", None).is_ok());
    }

    #[test]
    fn test_duplicate_customer_contact_and_cnic() {
        let customers = vec![customer("c1", Some("0300-1111111"), Some("35202-1234567-1"))];

        let err = ensure_unique_customer(&customers, Some("0300-1111111"), None, None).unwrap_err();
        assert_eq!(err.to_string(), "contact '0300-1111111' already exists");

        assert!(ensure_unique_customer(&customers, None, Some("3520212345671"), None).is_err());
        assert!(ensure_unique_customer(&customers, Some("0300-1111111"), None, Some("c1")).is_ok());
        assert!(ensure_unique_customer(&customers, Some(""), None, None).is_ok());
        assert!(ensure_unique_customer(&customers, Some("0311-2222222"), None, None).is_ok());
    }

    #[test]
    fn test_sale_party_is_exclusive() {
        assert!(validate_sale_party(Some("s1"), None).is_ok());
        assert!(validate_sale_party(None, Some("c1")).is_ok());
        assert!(validate_sale_party(None, None).is_ok());
        assert!(matches!(
            validate_sale_party(Some("s1"), Some("c1")),
            Err(ValidationError::Exclusive { .. })
        ));
    }

    #[test]
    fn test_sale_items() {
        let p = product("p1", "KB-K120");
        assert!(validate_sale_items(&[]).is_err());
        assert!(validate_sale_items(&[SaleItem::from_product(&p, 2)]).is_ok());

        let mut zero = SaleItem::from_product(&p, 1);
        zero.quantity = 0;
        assert!(validate_sale_items(&[zero]).is_err());
    }
}
