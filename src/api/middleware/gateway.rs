//! Gateway middleware in front of every route.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Runs every request through [`crate::gateway::Gateway::handle`].
///
/// On success the resolved [`crate::domain::identity::IdentityClaim`] is in
/// the request extensions, so handlers can take `Extension<IdentityClaim>`.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use crate::api::middleware::gateway;
///
/// let app = Router::new()
///     .merge(routes)
///     .layer(middleware::from_fn_with_state(state.clone(), gateway::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    st.gateway.handle(req, next).await
}
