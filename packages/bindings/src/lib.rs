use napi::Result as NapiResult;
use napi_derive::napi;

use loan_dash_core::aggregate::ViewRequest;
use loan_dash_core::filter::LoanType;
use loan_dash_core::store::SeriesStore;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Dashboard views
// ---------------------------------------------------------------------------

#[napi]
pub fn aggregate_view(data_json: String, request_json: String) -> NapiResult<String> {
    let store = SeriesStore::from_json_str(&data_json).map_err(to_napi_error)?;
    let request: ViewRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let output =
        loan_dash_core::aggregate::compute_view(&store, &request).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn facet_dimensions(loan_type: String) -> NapiResult<String> {
    let loan_type: LoanType = loan_type.parse().map_err(to_napi_error)?;
    serde_json::to_string(loan_type.facet_dimensions()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Data file
// ---------------------------------------------------------------------------

#[napi]
pub fn extract_csv(csv_text: String) -> NapiResult<String> {
    let extraction =
        loan_dash_core::extract::extract_dataset(csv_text.as_bytes()).map_err(to_napi_error)?;
    serde_json::to_string(&extraction.dataset).map_err(to_napi_error)
}

#[napi]
pub fn describe_dataset(data_json: String) -> NapiResult<String> {
    let store = SeriesStore::from_json_str(&data_json).map_err(to_napi_error)?;
    serde_json::to_string(&store.summary()).map_err(to_napi_error)
}
