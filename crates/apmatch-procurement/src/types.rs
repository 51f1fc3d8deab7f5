//! Procurement matching types.
//!
//! Field names keep the wire shapes of the upstream AP system (serde renames),
//! so callers can exchange these records as the same JSON documents the
//! operator tooling produces.

use serde::{Deserialize, Serialize};

// ============================================================================
// Input Record Types
// ============================================================================

/// One line of a supplier invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Invoice line identifier, unique within a batch.
    #[serde(rename = "invLineId")]
    pub id: String,
    /// Free-text item description.
    #[serde(rename = "Description")]
    pub description: String,
    /// Billed quantity.
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    /// Unit of measure code.
    #[serde(rename = "UOM")]
    pub uom: String,
    /// Billed unit price.
    #[serde(rename = "UnitPrice")]
    pub unit_price: f64,
    /// Billed line amount, taken as given and never re-derived.
    #[serde(rename = "Amount")]
    pub amount: f64,
}

/// One line of a purchase order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    /// Line-sequence identifier within the PO.
    #[serde(rename = "Position")]
    pub position: String,
    /// Purchase order number.
    #[serde(rename = "PONumber")]
    pub po_number: String,
    /// Free-text item description.
    #[serde(rename = "Po Description")]
    pub description: String,
    /// Ordered quantity.
    #[serde(rename = "PO Qty")]
    pub ordered_quantity: f64,
    /// Unit of measure code.
    #[serde(rename = "PO UOM")]
    pub uom: String,
    /// Agreed unit price.
    #[serde(rename = "PO Unit Price")]
    pub unit_price: f64,
    /// Ordered line amount.
    #[serde(rename = "PO Line Amount")]
    pub line_amount: f64,
}

/// One line of a goods receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodsReceiptLine {
    /// Goods receipt item number.
    #[serde(rename = "GR_ITEM_NO")]
    pub item_number: String,
    /// Free-text item description.
    #[serde(rename = "GR_ITEM_DES")]
    pub description: String,
    /// Received quantity.
    #[serde(rename = "GR_QTY")]
    pub received_quantity: f64,
    /// Whether this receipt was already allocated by a prior invoice match.
    /// The engine reads this flag and never mutates it.
    #[serde(rename = "IS_CONSUMED")]
    pub consumed: bool,
    /// Owning purchase order number.
    #[serde(rename = "PONumber")]
    pub po_number: String,
    /// Owning PO line reference.
    #[serde(rename = "PO_LINE_NO")]
    pub po_position: String,
}

// ============================================================================
// Match Outcome Types
// ============================================================================

/// PO match outcome for one invoice line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoMatchOutcome {
    /// A PO line was selected.
    Matched,
    /// No PO line passed every criterion.
    Unmatched,
}

/// GR match outcome for one invoice line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrMatchOutcome {
    /// A single GR line covers the invoice quantity exactly.
    Exact,
    /// Multiple GR lines together sum exactly to the invoice quantity.
    Consolidated,
    /// No GR line or combination reconciles the quantity.
    Unmatched,
}

/// Result of matching one invoice line.
///
/// Exactly one of `matched_po` / `po_failure_reason` is populated. The GR
/// fields are populated only when the PO stage succeeded, and then exactly one
/// of a non-empty `matched_grs` / `gr_failure_reason` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Identifier of the invoice line this result belongs to.
    #[serde(rename = "invLineId")]
    pub invoice_line_id: String,
    /// PO match outcome.
    #[serde(rename = "poMatchType")]
    pub po_outcome: PoMatchOutcome,
    /// The matched PO line, when the PO stage succeeded.
    #[serde(rename = "matchedPO", skip_serializing_if = "Option::is_none")]
    pub matched_po: Option<PurchaseOrderLine>,
    /// Description similarity of the accepted PO match.
    #[serde(rename = "poSimilarity", skip_serializing_if = "Option::is_none")]
    pub po_similarity: Option<f64>,
    /// Why the PO stage failed, when it did.
    #[serde(
        rename = "poMatchFailureReason",
        skip_serializing_if = "Option::is_none"
    )]
    pub po_failure_reason: Option<String>,
    /// GR match outcome; absent when the PO stage failed.
    #[serde(rename = "grMatchType", skip_serializing_if = "Option::is_none")]
    pub gr_outcome: Option<GrMatchOutcome>,
    /// The GR lines evidencing receipt, when the GR stage succeeded.
    #[serde(rename = "matchedGRs", skip_serializing_if = "Vec::is_empty", default)]
    pub matched_grs: Vec<GoodsReceiptLine>,
    /// Why the GR stage failed, when it did.
    #[serde(
        rename = "grMatchFailureReason",
        skip_serializing_if = "Option::is_none"
    )]
    pub gr_failure_reason: Option<String>,
}

// ============================================================================
// Batch Types
// ============================================================================

/// Input batch for the 3-way match orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreeWayMatchInput {
    /// Invoice lines, in presentation order.
    pub invoice_lines: Vec<InvoiceLine>,
    /// Purchase order lines.
    pub po_lines: Vec<PurchaseOrderLine>,
    /// Goods receipt lines.
    pub gr_lines: Vec<GoodsReceiptLine>,
}

/// Output of one 3-way match run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutput {
    /// One result per input invoice line, in input order.
    pub matches: Vec<MatchResult>,
    /// Batch statistics.
    pub stats: MatchStats,
}

/// Batch matching statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    /// Total invoice lines processed.
    pub total_lines: usize,
    /// Invoice lines with a PO match.
    pub po_matched: usize,
    /// Invoice lines reconciled by a single GR line.
    pub gr_exact: usize,
    /// Invoice lines reconciled by a GR combination.
    pub gr_consolidated: usize,
    /// Invoice lines with a PO match but no GR reconciliation.
    pub gr_unmatched: usize,
    /// Fraction of invoice lines fully reconciled through both stages.
    pub reconciliation_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_line_wire_shape() {
        let json = r#"{
            "invLineId": "INV1001",
            "Description": "Ready Mix Concrete, 4,000 psi",
            "Quantity": 100,
            "UOM": "YRD",
            "UnitPrice": 85,
            "Amount": 8500
        }"#;
        let line: InvoiceLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.id, "INV1001");
        assert_eq!(line.quantity, 100.0);
        assert_eq!(line.uom, "YRD");
    }

    #[test]
    fn test_gr_line_wire_shape() {
        let json = r#"{
            "GR_ITEM_NO": "GR2001",
            "GR_ITEM_DES": "Asphalt Mix - PG 64-22",
            "GR_QTY": 60,
            "IS_CONSUMED": false,
            "PONumber": "PO4001",
            "PO_LINE_NO": "10"
        }"#;
        let line: GoodsReceiptLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.item_number, "GR2001");
        assert!(!line.consumed);
        assert_eq!(line.po_position, "10");
    }

    #[test]
    fn test_match_result_omits_absent_fields() {
        let result = MatchResult {
            invoice_line_id: "INV1".to_string(),
            po_outcome: PoMatchOutcome::Unmatched,
            matched_po: None,
            po_similarity: None,
            po_failure_reason: Some("No PO line with matching unit of measure".to_string()),
            gr_outcome: None,
            matched_grs: Vec::new(),
            gr_failure_reason: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("poMatchFailureReason"));
        assert!(!json.contains("matchedPO"));
        assert!(!json.contains("grMatchType"));
        assert!(!json.contains("matchedGRs"));
    }
}
