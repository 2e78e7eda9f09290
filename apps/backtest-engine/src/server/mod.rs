//! HTTP/JSON API for running backtests and managing saved strategies.

mod http;

pub use http::{create_router, ApiError, AppState, RunBacktestRequest};
