use axum::response::IntoResponse;

/// Service banner for `GET /`, mainly so load balancers and humans hitting the
/// bare host get something other than a 404.
pub async fn root() -> impl IntoResponse {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
