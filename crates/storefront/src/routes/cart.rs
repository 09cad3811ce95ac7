//! Cart route handlers.
//!
//! The cart lives in the visitor session. Every mutating route answers with
//! a 303 redirect so a browser refresh never resubmits the form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header::REFERER},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use url::Url;

use threadline_core::ProductId;

use super::layout::PageContext;
use super::products::ProductView;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::flash;
use crate::services::notify;
use crate::services::{Cart, CartError, CartSummary};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub product: ProductView,
    pub quantity: u32,
    pub subtotal: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&CartSummary<'_>> for CartView {
    fn from(summary: &CartSummary<'_>) -> Self {
        Self {
            items: summary
                .lines
                .iter()
                .map(|line| CartItemView {
                    product: ProductView::from(line.product),
                    quantity: line.quantity,
                    subtotal: line.subtotal.to_string(),
                })
                .collect(),
            total: summary.total.to_string(),
            item_count: summary.item_count,
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<String>,
}

impl AddToCartForm {
    /// Requested quantity; blank or unparseable input counts as 1.
    fn quantity(&self) -> i64 {
        self.quantity
            .as_deref()
            .map(str::trim)
            .and_then(|q| q.parse::<i64>().ok())
            .unwrap_or(1)
    }
}

/// Remove from cart form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = Cart::load(&session).await;
    let summary = cart.summary(state.catalog());

    CartShowTemplate {
        page: PageContext::with_summary(&session, &summary).await,
        cart: CartView::from(&summary),
    }
}

/// Add item to cart.
///
/// Redirects back to the page the form was posted from.
///
/// # Errors
///
/// Returns `AppError::Session` if the cart can't be written to the session.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let Ok(product_id) = form.product_id.parse::<ProductId>() else {
        flash::danger(&session, "Product does not exist.").await;
        return Ok(Redirect::to("/"));
    };

    let mut cart = Cart::load(&session).await;
    match cart.add(state.catalog(), product_id, form.quantity()) {
        Ok(product) => {
            cart.save(&session).await?;
            let id = product_id.to_string();
            add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
            flash::success(&session, format!("Added {} to cart.", product.name)).await;
            Ok(Redirect::to(&redirect_back(&headers)))
        }
        Err(CartError::ProductNotFound(id)) => {
            tracing::info!(product_id = %id, "Add to cart for unknown product");
            flash::danger(&session, "Product does not exist.").await;
            Ok(Redirect::to("/"))
        }
    }
}

/// Remove item from cart.
///
/// # Errors
///
/// Returns `AppError::Session` if the cart can't be written to the session.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    if let Ok(product_id) = form.product_id.parse::<ProductId>() {
        let mut cart = Cart::load(&session).await;
        if cart.remove(product_id) {
            cart.save(&session).await?;
            flash::success(&session, "Item removed from cart.").await;
        }
    }

    Ok(Redirect::to("/cart"))
}

/// Place the order.
///
/// The order notification is best-effort: once the cart has items, the
/// order is confirmed and the cart cleared whether or not delivery worked.
///
/// # Errors
///
/// Returns `AppError::Session` if the cleared cart can't be written back.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let mut cart = Cart::load(&session).await;
    let summary = cart.summary(state.catalog());

    if summary.is_empty() {
        flash::danger(&session, "Your cart is empty.").await;
        return Ok(Redirect::to("/"));
    }

    state
        .notifier()
        .send_best_effort(&notify::order_summary(&summary))
        .await;

    tracing::info!(
        items = summary.item_count,
        total = %summary.total,
        "Order placed"
    );
    add_breadcrumb("checkout", "Order placed", None);

    cart.clear();
    cart.save(&session).await?;
    flash::success(
        &session,
        "✅ Your order has been placed. We will contact you shortly.",
    )
    .await;

    Ok(Redirect::to("/"))
}

/// Local path to return to after adding to cart.
///
/// Only the path and query of the `Referer` are used, so the redirect can
/// never leave this site.
fn redirect_back(headers: &HeaderMap) -> String {
    headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|referer| Url::parse(referer).ok())
        .map(|url| match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        })
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| "/".to_string())
}
