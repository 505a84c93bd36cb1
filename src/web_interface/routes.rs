use std::sync::Arc;

use warp::{reply, Filter, Rejection, Reply};

use crate::storage::status_file::StatusFile;

/// GET /
///
/// Raw trimmed status text.
pub fn status_text_route(
    status_file: Arc<StatusFile>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .map(move || status_file.read_text())
}

/// GET /status_info
///
/// `{"status": ..., "updated": ...}`, always with a 200; a missing file is
/// reported in the body.
pub fn status_info_route(
    status_file: Arc<StatusFile>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("status_info")
        .and(warp::path::end())
        .and(warp::get())
        .map(move || reply::json(&status_file.read_info()))
}

/// Both status routes combined.
pub fn status_routes(
    status_file: Arc<StatusFile>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    status_text_route(status_file.clone()).or(status_info_route(status_file))
}
