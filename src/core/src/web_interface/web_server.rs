use std::net::SocketAddr;
use std::sync::Arc;

use log::info;
use warp::{Filter, Rejection, Reply};

use super::routes::*;
use crate::error_handling::types::WebError;
use crate::storage::Store;

/// JSON API over the Collection Store.
pub struct WebServer {
    store: Arc<Store>,
}

impl WebServer {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Every API route, composed.
    pub fn routes(&self) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
        let store = self.store.clone();
        overview_route(store.clone())
            .or(users_route(store.clone()))
            .or(dashboard_route(store.clone()))
            .or(history_route(store.clone()))
            .or(conversation_route(store.clone()))
            .or(delete_history_route(store))
            .with(warp::log("learnhub::web"))
    }

    /// Serves the API on `addr` until the process stops.
    pub async fn start(&self, addr: SocketAddr) -> Result<(), WebError> {
        let (bound, server) = warp::serve(self.routes())
            .try_bind_ephemeral(addr)
            .map_err(|e| WebError::BindFailed {
                addr: addr.to_string(),
                reason: e.to_string(),
            })?;
        info!("Web API listening on http://{}", bound);
        server.await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, TextConversation, VoiceSession};
    use crate::storage::Collection;
    use crate::test_support::{conversation, populated_store, voice_session};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    fn server() -> WebServer {
        WebServer::new(Arc::new(populated_store()))
    }

    #[tokio::test]
    async fn test_overview_endpoint() {
        let server = server();
        let res = warp::test::request()
            .method("GET")
            .path("/api/overview")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 200);
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["totalStudents"], 2);
        assert_eq!(body["totalTeachers"], 1);
        assert_eq!(body["pendingPayments"], 1);
    }

    #[tokio::test]
    async fn test_users_endpoint_filters_and_hides_secrets() {
        let server = server();
        let res = warp::test::request()
            .method("GET")
            .path("/api/users?role=student&level=all")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 200);
        let body: Vec<Value> = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body.len(), 2);
        assert!(body.iter().all(|u| u["role"] == Role::Student.as_str()));
        assert!(body.iter().all(|u| u.get("passwordSecret").is_none()));

        let res = warp::test::request()
            .method("GET")
            .path("/api/users?role=wizard")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 400);
    }

    #[tokio::test]
    async fn test_dashboard_not_found_maps_to_404() {
        let server = server();
        let res = warp::test::request()
            .method("GET")
            .path("/api/students/nobody/dashboard")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 404);
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert!(body["message"].as_str().unwrap().contains("nobody"));
    }

    #[tokio::test]
    async fn test_history_detail_and_delete() {
        let store = Arc::new(populated_store());
        let at = Utc.with_ymd_and_hms(2024, 1, 12, 10, 0, 0).unwrap();
        store
            .write(Collection::TextConversations, &vec![conversation("c1", "s1", at)])
            .unwrap();
        store
            .write(Collection::VoiceSessions, &vec![voice_session("v1", "s1", at)])
            .unwrap();
        let server = WebServer::new(store.clone());

        let res = warp::test::request()
            .method("GET")
            .path("/api/students/s1/history")
            .reply(&server.routes())
            .await;
        let body: Vec<Value> = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body.len(), 2);

        let res = warp::test::request()
            .method("GET")
            .path("/api/history/text/c1")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 200);
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);

        let res = warp::test::request()
            .method("DELETE")
            .path("/api/history/voice/v1")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 200);
        let voice: Vec<VoiceSession> = store.read(Collection::VoiceSessions).unwrap();
        let text: Vec<TextConversation> = store.read(Collection::TextConversations).unwrap();
        assert!(voice.is_empty());
        assert_eq!(text.len(), 1);

        let res = warp::test::request()
            .method("DELETE")
            .path("/api/history/voice/v1")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 404);

        let res = warp::test::request()
            .method("DELETE")
            .path("/api/history/video/v1")
            .reply(&server.routes())
            .await;
        assert_eq!(res.status(), 400);
    }
}
