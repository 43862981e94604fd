//! Response envelope shared by the resource endpoints.
//!
//! Resource responses are wrapped in `{ "data": ... }`; errors use the
//! `{ "error", "code" }` shape produced by [`crate::error::AppError`]. Auth
//! responses are the one exception and return their payload bare.

use serde::Serialize;

/// The `{ "data": T }` envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
