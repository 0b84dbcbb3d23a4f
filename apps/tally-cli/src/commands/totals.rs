//! Compute order totals.
//!
//! ## Config Resolution
//! ```text
//! document.config ──► used as-is
//!       │ absent
//!       ▼
//! document.meta ────► config_for_edit (saved order being edited)
//!       │ absent
//!       ▼
//! TaxPolicy[--party-type | document.partyType | default_party_type], no discount
//! ```

use serde::{Deserialize, Serialize};
use tally_core::order::config_for_edit;
use tally_core::validation::{
    validate_discount, validate_line_items, validate_order_result, validate_tax_config,
};
use tally_core::{compute_totals, LineItem, OrderMeta, OrderPayload, OrderTotalsConfig};
use tracing::{debug, info, warn};

use super::{print_json, read_document, TotalsArgs};
use crate::config::AppConfig;
use crate::error::CliResult;

/// Input document of `tally totals`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocument {
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Explicit discount and tax settings.
    #[serde(default)]
    pub config: Option<OrderTotalsConfig>,

    #[serde(default)]
    pub party_type: Option<String>,

    /// Meta of a saved order, when re-computing it for an edit.
    #[serde(default)]
    pub meta: Option<OrderMeta>,
}

/// Rounded totals rendered with the configured currency symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsDisplay {
    pub raw_subtotal: String,
    pub discount: String,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub tax_mode: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsResponse {
    pub payload: OrderPayload,
    pub display: TotalsDisplay,
}

/// Run the totals command.
pub fn run(args: TotalsArgs, config: &AppConfig) -> CliResult<()> {
    let document: OrderDocument = read_document(&args.input)?;
    let response = execute(&document, args.party_type.as_deref(), config)?;
    print_json(&response)
}

/// Picks the engine configuration for a document.
pub fn resolve_config(
    document: &OrderDocument,
    party_type: Option<&str>,
    config: &AppConfig,
) -> OrderTotalsConfig {
    if let Some(explicit) = document.config {
        debug!("Using explicit order config");
        return explicit;
    }

    let party_type = party_type
        .or(document.party_type.as_deref())
        .unwrap_or(&config.default_party_type);

    debug!(party_type, has_meta = document.meta.is_some(), "Resolving order config");
    config_for_edit(document.meta.as_ref(), &config.tax_policy, party_type)
}

pub fn execute(
    document: &OrderDocument,
    party_type: Option<&str>,
    config: &AppConfig,
) -> CliResult<TotalsResponse> {
    validate_line_items(&document.items)?;

    let order_config = resolve_config(document, party_type, config);
    validate_tax_config(&order_config.tax)?;

    if let Err(err) = validate_discount(&order_config.discount) {
        warn!("Discount adjusted by engine: {err}");
    }

    let totals = compute_totals(&document.items, &order_config);
    validate_order_result(&totals)?;

    let payload = OrderPayload::from_totals(&order_config, &totals);
    let shown = totals.presented();

    info!(
        items = document.items.len(),
        total = payload.total,
        tax_mode = order_config.tax.mode.as_str(),
        "Computed order totals"
    );

    Ok(TotalsResponse {
        payload,
        display: TotalsDisplay {
            raw_subtotal: config.format_money(shown.raw_subtotal),
            discount: config.format_money(shown.discount_amount),
            subtotal: config.format_money(shown.tax_base),
            tax: config.format_money(shown.tax),
            total: config.format_money(shown.total),
            tax_mode: order_config.tax.mode.as_str(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use tally_core::{DiscountConfig, TaxConfig, TaxMode, ValidationError};

    fn items() -> Vec<LineItem> {
        vec![LineItem::new(1.0, 1000.0)]
    }

    #[test]
    fn test_party_type_flag_selects_policy() {
        let document = OrderDocument {
            items: items(),
            ..Default::default()
        };

        let response = execute(&document, Some("business"), &AppConfig::default()).unwrap();
        assert_eq!(response.payload.total, 1120.0);
        assert_eq!(response.display.tax, "₱120.00");
        assert_eq!(response.display.tax_mode, "exclusive");
    }

    #[test]
    fn test_default_party_type_is_vat_inclusive() {
        let document = OrderDocument {
            items: items(),
            ..Default::default()
        };

        let response = execute(&document, None, &AppConfig::default()).unwrap();
        assert_eq!(response.payload.total, 1000.0);
        assert_eq!(response.display.tax, "₱107.14");
        assert_eq!(response.payload.meta.tax_type, TaxMode::Inclusive);
    }

    #[test]
    fn test_explicit_config_wins() {
        let document = OrderDocument {
            items: items(),
            config: Some(OrderTotalsConfig::new(
                DiscountConfig::percentage(10.0),
                TaxConfig::exclusive(12.0),
            )),
            party_type: Some("vat_exempt".to_string()),
            meta: None,
        };

        let response = execute(&document, Some("regular"), &AppConfig::default()).unwrap();
        assert_eq!(response.display.tax, "₱108.00");
        assert_eq!(response.display.total, "₱1008.00");
        assert_eq!(response.display.discount, "₱100.00");
    }

    #[test]
    fn test_saved_meta_is_reused() {
        let saved_config =
            OrderTotalsConfig::new(DiscountConfig::fixed_amount(50.0), TaxConfig::exclusive(30.0));
        let saved = OrderPayload::build(&items(), &saved_config);

        let document = OrderDocument {
            items: items(),
            meta: Some(saved.meta),
            ..Default::default()
        };

        assert_eq!(resolve_config(&document, Some("business"), &AppConfig::default()), saved_config);
        let response = execute(&document, Some("business"), &AppConfig::default()).unwrap();
        assert_eq!(response.payload, saved);
    }

    #[test]
    fn test_document_json_shape() {
        let document: OrderDocument = serde_json::from_str(
            r#"{
                "items": [{ "description": "Screen", "quantity": 2, "unitPrice": 500 }],
                "config": { "discount": { "type": "percentage", "value": "10" } },
                "partyType": "business"
            }"#,
        )
        .unwrap();

        let response = execute(&document, None, &AppConfig::default()).unwrap();
        assert_eq!(response.payload.subtotal, 900.0);
        assert_eq!(response.payload.total, 900.0);
    }

    #[test]
    fn test_bad_discount_is_not_fatal() {
        let document = OrderDocument {
            items: items(),
            config: Some(OrderTotalsConfig::default().with_discount(DiscountConfig::percentage(-5.0))),
            ..Default::default()
        };

        let response = execute(&document, None, &AppConfig::default()).unwrap();
        assert_eq!(response.payload.meta.discount_amount, 0.0);
        assert_eq!(response.payload.total, 1000.0);
    }

    #[test]
    fn test_negative_line_item_is_rejected() {
        let document = OrderDocument {
            items: vec![LineItem::new(-1.0, 10.0)],
            ..Default::default()
        };

        let err = execute(&document, None, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Validation(ValidationError::Negative { .. })));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_overflowing_totals_are_refused() {
        let document = OrderDocument {
            items: vec![LineItem::new(1e308, 10.0)],
            ..Default::default()
        };

        let err = execute(&document, None, &AppConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CliError::Validation(ValidationError::NotFinite { ref field }) if field == "rawSubtotal"
        ));
    }

    #[test]
    fn test_out_of_range_tax_is_rejected() {
        let document = OrderDocument {
            items: items(),
            config: Some(OrderTotalsConfig::default().with_tax(TaxConfig::exclusive(150.0))),
            ..Default::default()
        };

        assert!(execute(&document, None, &AppConfig::default()).is_err());
    }
}
