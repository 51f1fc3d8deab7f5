//! Input batch validation.
//!
//! This module checks that input records are fit for matching:
//! - Identifier presence and invoice-id uniqueness
//! - Positive quantities and unit prices
//! - Finite amounts
//!
//! Structural validation (field presence, types) is the caller's parsing
//! concern; the engine never coerces or silently drops a malformed record.

use crate::types::{GoodsReceiptLine, InvoiceLine, PurchaseOrderLine};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// Batch Validation
// ============================================================================

/// One validation failure, tied to the record that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValidationError {
    /// Identifier of the offending record (invoice line id, PO number and
    /// position, or GR item number).
    pub record: String,
    /// Machine-readable failure code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for InputValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.record, self.message)
    }
}

fn error(record: impl Into<String>, code: &'static str, message: impl Into<String>) -> InputValidationError {
    InputValidationError {
        record: record.into(),
        code,
        message: message.into(),
    }
}

/// Validate all three input batches.
///
/// Returns every failure found, in record order, so callers can report them
/// all at once. An empty result means the batch is fit for matching.
#[must_use]
pub fn validate_batches(
    invoice_lines: &[InvoiceLine],
    po_lines: &[PurchaseOrderLine],
    gr_lines: &[GoodsReceiptLine],
) -> Vec<InputValidationError> {
    let mut errors = Vec::new();

    let mut seen_ids: HashSet<&str> = HashSet::new();
    for line in invoice_lines {
        let record = if line.id.is_empty() { "<blank>" } else { line.id.as_str() };

        if line.id.is_empty() {
            errors.push(error(record, "EMPTY_ID", "invoice line id must not be empty"));
        } else if !seen_ids.insert(&line.id) {
            errors.push(error(
                record,
                "DUPLICATE_INVOICE_ID",
                "invoice line id appears more than once in the batch",
            ));
        }
        if line.uom.is_empty() {
            errors.push(error(record, "EMPTY_UOM", "unit of measure must not be empty"));
        }
        if line.quantity.is_nan() || line.quantity <= 0.0 {
            errors.push(error(
                record,
                "NONPOSITIVE_QUANTITY",
                format!("quantity must be positive, got {}", line.quantity),
            ));
        }
        if line.unit_price.is_nan() || line.unit_price <= 0.0 {
            errors.push(error(
                record,
                "NONPOSITIVE_UNIT_PRICE",
                format!("unit price must be positive, got {}", line.unit_price),
            ));
        }
        if !line.amount.is_finite() {
            errors.push(error(record, "NONFINITE_AMOUNT", "amount must be finite"));
        }
    }

    for line in po_lines {
        let record = format!("{}/{}", line.po_number, line.position);

        if line.po_number.is_empty() {
            errors.push(error(&record, "EMPTY_PO_NUMBER", "PO number must not be empty"));
        }
        if line.position.is_empty() {
            errors.push(error(&record, "EMPTY_PO_POSITION", "PO position must not be empty"));
        }
        if line.uom.is_empty() {
            errors.push(error(&record, "EMPTY_UOM", "unit of measure must not be empty"));
        }
        if line.ordered_quantity.is_nan() || line.ordered_quantity <= 0.0 {
            errors.push(error(
                &record,
                "NONPOSITIVE_QUANTITY",
                format!("ordered quantity must be positive, got {}", line.ordered_quantity),
            ));
        }
        if line.unit_price.is_nan() || line.unit_price <= 0.0 {
            errors.push(error(
                &record,
                "NONPOSITIVE_UNIT_PRICE",
                format!("unit price must be positive, got {}", line.unit_price),
            ));
        }
        if !line.line_amount.is_finite() {
            errors.push(error(&record, "NONFINITE_AMOUNT", "line amount must be finite"));
        }
    }

    for line in gr_lines {
        let record = if line.item_number.is_empty() {
            "<blank>"
        } else {
            line.item_number.as_str()
        };

        if line.item_number.is_empty() {
            errors.push(error(record, "EMPTY_ID", "GR item number must not be empty"));
        }
        if line.po_number.is_empty() {
            errors.push(error(record, "EMPTY_PO_NUMBER", "PO number must not be empty"));
        }
        if line.po_position.is_empty() {
            errors.push(error(record, "EMPTY_PO_POSITION", "PO line reference must not be empty"));
        }
        if line.received_quantity.is_nan() || line.received_quantity <= 0.0 {
            errors.push(error(
                record,
                "NONPOSITIVE_QUANTITY",
                format!("received quantity must be positive, got {}", line.received_quantity),
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_invoice() -> InvoiceLine {
        InvoiceLine {
            id: "INV1001".to_string(),
            description: "Asphalt Mix - PG 64-22".to_string(),
            quantity: 75.0,
            uom: "TON".to_string(),
            unit_price: 95.0,
            amount: 7125.0,
        }
    }

    fn valid_po() -> PurchaseOrderLine {
        PurchaseOrderLine {
            position: "10".to_string(),
            po_number: "PO4001".to_string(),
            description: "Asphalt mix PG 64-22".to_string(),
            ordered_quantity: 75.0,
            uom: "TON".to_string(),
            unit_price: 95.0,
            line_amount: 7125.0,
        }
    }

    fn valid_gr() -> GoodsReceiptLine {
        GoodsReceiptLine {
            item_number: "GR2001".to_string(),
            description: "Asphalt mix PG 64-22".to_string(),
            received_quantity: 75.0,
            consumed: false,
            po_number: "PO4001".to_string(),
            po_position: "10".to_string(),
        }
    }

    #[test]
    fn test_valid_batch_passes() {
        let errors = validate_batches(&[valid_invoice()], &[valid_po()], &[valid_gr()]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_duplicate_invoice_id() {
        let errors = validate_batches(&[valid_invoice(), valid_invoice()], &[], &[]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "DUPLICATE_INVOICE_ID");
        assert_eq!(errors[0].record, "INV1001");
    }

    #[test]
    fn test_negative_quantity_identifies_record() {
        let mut invoice = valid_invoice();
        invoice.quantity = -5.0;

        let errors = validate_batches(&[invoice], &[], &[]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "NONPOSITIVE_QUANTITY");
        assert_eq!(errors[0].record, "INV1001");
    }

    #[test]
    fn test_nan_quantity_rejected() {
        let mut invoice = valid_invoice();
        invoice.quantity = f64::NAN;

        let errors = validate_batches(&[invoice], &[], &[]);
        assert_eq!(errors[0].code, "NONPOSITIVE_QUANTITY");
    }

    #[test]
    fn test_po_record_reference() {
        let mut po = valid_po();
        po.unit_price = 0.0;

        let errors = validate_batches(&[], &[po], &[]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "NONPOSITIVE_UNIT_PRICE");
        assert_eq!(errors[0].record, "PO4001/10");
    }

    #[test]
    fn test_gr_missing_po_reference() {
        let mut gr = valid_gr();
        gr.po_position = String::new();

        let errors = validate_batches(&[], &[], &[gr]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "EMPTY_PO_POSITION");
        assert_eq!(errors[0].record, "GR2001");
    }

    #[test]
    fn test_multiple_errors_reported_together() {
        let mut invoice = valid_invoice();
        invoice.quantity = 0.0;
        invoice.uom = String::new();

        let errors = validate_batches(&[invoice], &[], &[]);
        let codes: Vec<&str> = errors.iter().map(|e| e.code).collect();
        assert_eq!(codes, vec!["EMPTY_UOM", "NONPOSITIVE_QUANTITY"]);
    }

    #[test]
    fn test_display_format() {
        let err = error("INV1", "EMPTY_UOM", "unit of measure must not be empty");
        assert_eq!(
            err.to_string(),
            "[EMPTY_UOM] INV1: unit of measure must not be empty"
        );
    }
}
