//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use threadline_core::{Product, ProductId};

use super::layout::PageContext;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::flash;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: i32,
    pub path: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            path: product.path(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<ProductView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductView,
}

/// Display the catalog listing.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    ProductsIndexTemplate {
        page: PageContext::load(&session, state.catalog()).await,
        products: state.catalog().all().iter().map(ProductView::from).collect(),
    }
}

/// Display a product detail page.
///
/// Unknown numeric IDs bounce back to the listing with a flash; IDs that
/// aren't numbers are plain 404s.
///
/// # Errors
///
/// Returns `AppError::NotFound` if `id` is not an integer.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let product_id = id
        .parse::<ProductId>()
        .map_err(|_| AppError::NotFound(format!("product {id}")))?;

    let Some(product) = state.catalog().get(product_id) else {
        tracing::info!(product_id = %product_id, "Unknown product requested");
        flash::danger(&session, "Product not found").await;
        return Ok(Redirect::to("/").into_response());
    };

    Ok(ProductShowTemplate {
        page: PageContext::load(&session, state.catalog()).await,
        product: ProductView::from(product),
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use threadline_core::Price;

    use super::*;

    #[test]
    fn test_product_view_formats_price_and_path() {
        let product = Product::new(
            ProductId::new(3),
            "Denim Blue Jeans",
            Price::usd_cents(4999),
            "Classic slim-fit jeans.",
            "https://cdn.example.com/jeans.jpg",
        );

        let view = ProductView::from(&product);
        assert_eq!(view.id, 3);
        assert_eq!(view.path, "/product/3");
        assert_eq!(view.price, "$49.99");
    }
}
