//! Printable invoice page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use favobliss_core::{InvoiceData, OrderId, Price};

use super::not_found;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Invoice page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/invoice.html")]
pub struct InvoiceTemplate {
    pub title: String,
    pub invoice: InvoiceData,
    pub total_tax: Price,
}

/// Display the invoice for an order.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Response> {
    let order_id = OrderId::new(order_id);
    let Some(invoice) = state.store().invoice(&order_id).await? else {
        return Ok(not_found::page("We could not find that invoice.").into_response());
    };
    if !invoice.totals_match() {
        tracing::warn!(
            order_id = %order_id,
            net_total = %invoice.net_total,
            computed = %invoice.computed_total(),
            "Invoice line totals do not add up to the net total"
        );
    }

    Ok(InvoiceTemplate {
        title: format!("Invoice {}", invoice.sold_by.invoice_no),
        total_tax: invoice.total_tax(),
        invoice,
    }
    .into_response())
}
