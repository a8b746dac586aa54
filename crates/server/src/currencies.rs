use api_types::currency::CurrencyView;
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState, views::currency_view};

/// Handle requests for listing every known currency
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<CurrencyView>>, ServerError> {
    let currencies = state.engine.currencies().list().await?;

    Ok(Json(currencies.into_iter().map(currency_view).collect()))
}
