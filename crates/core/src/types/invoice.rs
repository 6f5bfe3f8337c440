//! Tax invoice for a delivered order.

use serde::{Deserialize, Serialize};

use super::price::Price;

/// Seller block, including invoice and order references.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SoldBy {
    pub company: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub state_code: String,
    pub phone: String,
    pub gstin: String,
    pub invoice_no: String,
    pub invoice_date: String,
    pub order_no: String,
    pub order_date: String,
}

/// Buyer block with shipment references.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveredTo {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub state_code: String,
    pub payment_method: String,
    pub shipped_by: String,
    pub awb_no: String,
    pub waybill_no: String,
}

/// One invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub description: String,
    #[serde(default)]
    pub hsn: String,
    #[serde(default)]
    pub sku: String,
    pub qty: u32,
    pub unit_price: Price,
    #[serde(default)]
    pub unit_disc: Price,
    pub taxable_value: Price,
    #[serde(default)]
    pub igst: Price,
    pub total: Price,
}

/// Invoice payload from `GET orders/invoice/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    pub sold_by: SoldBy,
    pub delivered_to: DeliveredTo,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    pub net_total: Price,
}

impl InvoiceData {
    /// Sum of line totals.
    #[must_use]
    pub fn computed_total(&self) -> Price {
        self.items.iter().map(|i| i.total).sum()
    }

    /// Whether `netTotal` agrees with the line items.
    #[must_use]
    pub fn totals_match(&self) -> bool {
        self.computed_total() == self.net_total
    }

    /// Total IGST across lines.
    #[must_use]
    pub fn total_tax(&self) -> Price {
        self.items.iter().map(|i| i.igst).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_totals() {
        let invoice: InvoiceData = serde_json::from_value(json!({
            "soldBy": {"company": "Favobliss Retail", "invoiceNo": "INV-1"},
            "deliveredTo": {"name": "A. Kumar"},
            "items": [
                {"description": "Linen Shirt", "qty": 1, "unitPrice": 999, "taxableValue": 892, "igst": 107, "total": 999},
                {"description": "Chinos", "qty": 2, "unitPrice": 500, "taxableValue": 893, "igst": 107, "total": 1000}
            ],
            "netTotal": 1999
        }))
        .unwrap();

        assert_eq!(invoice.computed_total().amount(), dec!(1999));
        assert!(invoice.totals_match());
        assert_eq!(invoice.total_tax().amount(), dec!(214));
        assert_eq!(invoice.sold_by.invoice_no, "INV-1");
        assert!(invoice.delivered_to.awb_no.is_empty());
    }
}
