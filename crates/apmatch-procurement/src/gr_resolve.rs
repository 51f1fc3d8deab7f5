//! Goods-receipt consolidation kernel.
//!
//! This module reconciles a PO-matched invoice line against goods receipts:
//! - Eligibility filter (unconsumed, same PO line, similar description)
//! - Exact single-line quantity check
//! - Smallest-subset exact-sum search, bounded in size and enumeration count
//!
//! Quantity reconciliation is an exact-equality requirement; unlike the price
//! and amount checks of the PO stage there is no tolerance band. Each invoice
//! line re-considers the full unconsumed GR set: the engine does not track
//! provisional consumption within a batch, so two invoice lines in one run
//! can select overlapping GR lines.

use crate::config::MatchConfig;
use crate::similarity::DescriptionSimilarity;
use crate::types::{GoodsReceiptLine, InvoiceLine, PurchaseOrderLine};
use apmatch_core::{domain::Domain, kernel::KernelMetadata, traits::Kernel};

/// Representation-level slack for float quantity sums. Not a tolerance band:
/// it only absorbs binary round-off of sums that are exact in decimal.
const QTY_EPSILON: f64 = 1e-9;

/// Exact quantity equality, up to float representation slack.
fn quantities_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= QTY_EPSILON * b.abs().max(1.0)
}

// ============================================================================
// GR Consolidation Kernel
// ============================================================================

/// Decision of the GR reconciliation stage for one invoice line.
#[derive(Debug, Clone)]
pub enum GrDecision {
    /// A single GR line covers the invoice quantity exactly.
    Exact {
        /// The covering GR line.
        line: GoodsReceiptLine,
    },
    /// Multiple GR lines together sum exactly to the invoice quantity.
    Consolidated {
        /// The combined GR lines, ascending by item number.
        lines: Vec<GoodsReceiptLine>,
    },
    /// No GR line or admissible combination reconciles the quantity.
    Unmatched {
        /// Why the stage failed.
        reason: String,
    },
}

/// Outcome of a subset search pass.
enum SearchOutcome {
    /// Indices of the first exact-sum subset found.
    Found(Vec<usize>),
    /// Every admissible subset was evaluated without an exact sum.
    Exhausted,
    /// The enumeration cap was hit before the search completed.
    BudgetExceeded,
}

/// GR consolidation kernel.
///
/// Invoked only for invoice lines whose PO stage succeeded.
#[derive(Debug, Clone)]
pub struct GrConsolidation {
    metadata: KernelMetadata,
}

impl Default for GrConsolidation {
    fn default() -> Self {
        Self::new()
    }
}

impl GrConsolidation {
    /// Create a new GR consolidation kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("procurement/gr-consolidation", Domain::Procurement)
                .with_description("Invoice quantity reconciliation against goods receipts")
                .with_throughput(10_000)
                .with_latency_us(200.0),
        }
    }

    /// Reconcile an invoice line against the GR set for its matched PO line.
    #[must_use]
    pub fn resolve(
        invoice: &InvoiceLine,
        matched_po: &PurchaseOrderLine,
        gr_lines: &[GoodsReceiptLine],
        config: &MatchConfig,
    ) -> GrDecision {
        // Eligibility: unconsumed receipts of the matched PO line whose
        // description names the invoiced item.
        let mut eligible: Vec<&GoodsReceiptLine> = gr_lines
            .iter()
            .filter(|gr| {
                !gr.consumed
                    && gr.po_number == matched_po.po_number
                    && gr.po_position == matched_po.position
                    && DescriptionSimilarity::score(&invoice.description, &gr.description)
                        >= config.similarity_threshold
            })
            .collect();

        if eligible.is_empty() {
            return GrDecision::Unmatched {
                reason: "No unconsumed GR lines match the PO item and description".to_string(),
            };
        }

        // Stable enumeration order: ascending GR item number.
        eligible.sort_by(|a, b| a.item_number.cmp(&b.item_number));

        let target = invoice.quantity;

        // Exact check: first single line covering the quantity.
        if let Some(line) = eligible
            .iter()
            .find(|gr| quantities_equal(gr.received_quantity, target))
        {
            return GrDecision::Exact {
                line: (*line).clone(),
            };
        }

        // Consolidated check: smallest subset with an exact sum.
        let mut budget = config.enumeration_cap;
        let outcome = if eligible.len() > config.max_gr_candidates {
            Self::search_branch_and_bound(&mut eligible, target, config, &mut budget)
        } else {
            Self::search_lexicographic(&eligible, target, config, &mut budget)
        };

        match outcome {
            SearchOutcome::Found(indices) => {
                let mut lines: Vec<GoodsReceiptLine> =
                    indices.into_iter().map(|i| eligible[i].clone()).collect();
                lines.sort_by(|a, b| a.item_number.cmp(&b.item_number));
                GrDecision::Consolidated { lines }
            }
            SearchOutcome::Exhausted => GrDecision::Unmatched {
                reason: "Sum of GR quantities does not equal invoice quantity".to_string(),
            },
            SearchOutcome::BudgetExceeded => GrDecision::Unmatched {
                reason: "GR combination search bound exceeded before an exact match was found"
                    .to_string(),
            },
        }
    }

    /// Plain enumeration over index combinations, smallest size first,
    /// lexicographic within a size (candidates ascend by item number).
    fn search_lexicographic(
        lines: &[&GoodsReceiptLine],
        target: f64,
        config: &MatchConfig,
        budget: &mut u64,
    ) -> SearchOutcome {
        let n = lines.len();

        for k in 2..=config.max_subset_size.min(n) {
            let mut idx: Vec<usize> = (0..k).collect();
            loop {
                if *budget == 0 {
                    return SearchOutcome::BudgetExceeded;
                }
                *budget -= 1;

                let sum: f64 = idx.iter().map(|&i| lines[i].received_quantity).sum();
                if quantities_equal(sum, target) {
                    return SearchOutcome::Found(idx);
                }

                // Advance to the next combination of size k.
                let mut advanced = false;
                let mut pos = k;
                while pos > 0 {
                    pos -= 1;
                    if idx[pos] < n - k + pos {
                        idx[pos] += 1;
                        for j in pos + 1..k {
                            idx[j] = idx[j - 1] + 1;
                        }
                        advanced = true;
                        break;
                    }
                }
                if !advanced {
                    break;
                }
            }
        }

        SearchOutcome::Exhausted
    }

    /// Branch-and-bound search for larger candidate sets.
    ///
    /// Reorders `eligible` by descending quantity (item number as tie-break)
    /// so prefix windows bound the best achievable sum, then runs an
    /// iterative-deepening stack walk over index sets: a level dies as soon
    /// as the largest remaining picks cannot reach the target.
    fn search_branch_and_bound(
        eligible: &mut [&GoodsReceiptLine],
        target: f64,
        config: &MatchConfig,
        budget: &mut u64,
    ) -> SearchOutcome {
        eligible.sort_by(|a, b| {
            b.received_quantity
                .partial_cmp(&a.received_quantity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.item_number.cmp(&b.item_number))
        });

        let n = eligible.len();
        let quantities: Vec<f64> = eligible.iter().map(|gr| gr.received_quantity).collect();
        let mut prefix = vec![0.0; n + 1];
        for (i, q) in quantities.iter().enumerate() {
            prefix[i + 1] = prefix[i] + q;
        }
        let slack = QTY_EPSILON * target.abs().max(1.0);

        for k in 2..=config.max_subset_size.min(n) {
            let mut chosen: Vec<usize> = Vec::with_capacity(k);
            let mut sum = 0.0;
            let mut candidate = 0usize;

            loop {
                let needed = k - chosen.len();
                let mut descend = false;
                let mut level_dead = false;

                if candidate >= n || n - candidate < needed {
                    level_dead = true;
                } else {
                    // Best achievable from here: the `needed` largest
                    // remaining quantities. Candidates only shrink, so a miss
                    // kills the whole level.
                    let best_add = prefix[candidate + needed] - prefix[candidate];
                    if sum + best_add < target - slack {
                        level_dead = true;
                    } else {
                        if *budget == 0 {
                            return SearchOutcome::BudgetExceeded;
                        }
                        *budget -= 1;

                        let with_candidate = sum + quantities[candidate];
                        if needed == 1 {
                            if quantities_equal(with_candidate, target) {
                                chosen.push(candidate);
                                return SearchOutcome::Found(chosen);
                            }
                        } else if with_candidate < target - slack {
                            descend = true;
                        }
                        // Overshoot: skip this candidate, smaller ones follow.
                    }
                }

                if descend {
                    chosen.push(candidate);
                    sum += quantities[candidate];
                    candidate += 1;
                } else if level_dead {
                    match chosen.pop() {
                        Some(last) => {
                            sum -= quantities[last];
                            candidate = last + 1;
                        }
                        None => break,
                    }
                } else {
                    candidate += 1;
                }
            }
        }

        SearchOutcome::Exhausted
    }
}

impl Kernel for GrConsolidation {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}
