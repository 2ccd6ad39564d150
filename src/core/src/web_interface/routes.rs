use std::sync::Arc;

use log::error;
use serde::Serialize;
use warp::{http::StatusCode, reply, Filter, Rejection, Reply};

use super::types::{status_for, ApiError, DeletedResponse, UserView};
use crate::aggregation::{platform_overview, student_dashboard};
use crate::error_handling::types::DataError;
use crate::history::{delete_record, fetch_conversation, list_history};
use crate::models::SourceType;
use crate::query::{search_users, UserQuery};
use crate::storage::Store;

/// Runs a store operation on the blocking pool and turns its outcome into a
/// JSON reply. Store backends may block, so they never run on the reactor.
async fn blocking_json<T, F>(store: Arc<Store>, op: F) -> Result<reply::Response, Rejection>
where
    T: Serialize + Send + 'static,
    F: FnOnce(&Store) -> Result<T, DataError> + Send + 'static,
{
    let response = match tokio::task::spawn_blocking(move || op(&store)).await {
        Ok(Ok(value)) => reply::with_status(reply::json(&value), StatusCode::OK).into_response(),
        Ok(Err(err)) => {
            let status = status_for(&err);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                error!("Request failed: {}", err);
            }
            reply::with_status(reply::json(&ApiError::new(err.to_string())), status).into_response()
        }
        Err(join_err) => {
            error!("Store task panicked or was cancelled: {}", join_err);
            reply::with_status(
                reply::json(&ApiError::new("Internal error")),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response()
        }
    };
    Ok(response)
}

fn with_store(store: Arc<Store>) -> impl Filter<Extract = (Arc<Store>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || store.clone())
}

/// GET /api/overview
pub fn overview_route(store: Arc<Store>) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "overview")
        .and(warp::get())
        .and(with_store(store))
        .and_then(|store: Arc<Store>| blocking_json(store, |s| platform_overview(s).map_err(DataError::from)))
}

/// GET /api/users?term=&role=&level=&module=
pub fn users_route(store: Arc<Store>) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "users")
        .and(warp::get())
        .and(warp::query::<UserQuery>())
        .and(with_store(store))
        .and_then(|query: UserQuery, store: Arc<Store>| {
            blocking_json(store, move |s| {
                let users = search_users(s, &query)?;
                Ok(users.into_iter().map(UserView::from).collect::<Vec<_>>())
            })
        })
}

/// GET /api/students/:id/dashboard
pub fn dashboard_route(store: Arc<Store>) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "students" / String / "dashboard")
        .and(warp::get())
        .and(with_store(store))
        .and_then(|id: String, store: Arc<Store>| blocking_json(store, move |s| student_dashboard(s, &id)))
}

/// GET /api/students/:id/history
pub fn history_route(store: Arc<Store>) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "students" / String / "history")
        .and(warp::get())
        .and(with_store(store))
        .and_then(|id: String, store: Arc<Store>| {
            blocking_json(store, move |s| list_history(s, &id).map_err(DataError::from))
        })
}

/// GET /api/history/text/:id
pub fn conversation_route(store: Arc<Store>) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "history" / "text" / String)
        .and(warp::get())
        .and(with_store(store))
        .and_then(|id: String, store: Arc<Store>| blocking_json(store, move |s| fetch_conversation(s, &id)))
}

/// DELETE /api/history/:source/:id
pub fn delete_history_route(store: Arc<Store>) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "history" / String / String)
        .and(warp::delete())
        .and(with_store(store))
        .and_then(|source: String, id: String, store: Arc<Store>| {
            blocking_json(store, move |s| {
                let source_type = SourceType::parse(&source)
                    .ok_or_else(|| DataError::Malformed(format!("unknown history source '{}'", source)))?;
                delete_record(s, source_type, &id)?;
                Ok(DeletedResponse { source_type, id })
            })
        })
}
