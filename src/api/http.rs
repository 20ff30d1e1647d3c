//! JSON-over-HTTP implementation of the board API.

use std::time::Duration;

use log::{debug, warn};
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::{ApiError, ApiResult, BoardApi, TaskApi};
use crate::model::{
    Board, BoardId, CreateTagForm, CreatingTask, EditingTask, ServerConfig, State, Tag, Task,
    TaskId, User,
};

/// Error body returned by the server on non-2xx responses
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for a remote board server
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &ServerConfig) -> ApiResult<Self> {
        let mut raw = config.url.trim().to_string();
        // Url::join drops the last path segment unless the base ends in '/'
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(HttpApi {
            client,
            base_url,
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))?;
        debug!("{} {}", method, url);
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let res = builder.send().map_err(|e| {
            warn!("request failed: {}", e);
            ApiError::Network(e.to_string())
        })?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let text = res.text().unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.error,
            Err(_) => format!("HTTP {}", status),
        };
        warn!("server error {}: {}", status, message);
        Err(ApiError::Remote(message))
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let res = self.send(self.request(Method::GET, path)?)?;
        decode(res)
    }

    fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self.send(self.request(method, path)?.json(body))?;
        decode(res)
    }
}

fn decode<T: DeserializeOwned>(res: Response) -> ApiResult<T> {
    res.json::<T>().map_err(|e| ApiError::Decode(e.to_string()))
}

impl TaskApi for HttpApi {
    fn list_tasks(&self, board_id: BoardId) -> ApiResult<Vec<Task>> {
        self.get(&format!("boards/{board_id}/tasks"))
    }

    fn create_task(&self, task: &CreatingTask) -> ApiResult<Task> {
        self.send_json(Method::POST, "tasks", task)
    }

    fn edit_task(&self, task: &EditingTask) -> ApiResult<Task> {
        self.send_json(Method::PUT, &format!("tasks/{}", task.id), task)
    }

    fn delete_task(&self, task_id: TaskId) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, &format!("tasks/{task_id}"))?)?;
        Ok(())
    }
}

impl BoardApi for HttpApi {
    fn me(&self) -> ApiResult<User> {
        self.get("me")
    }

    fn list_boards(&self) -> ApiResult<Vec<Board>> {
        self.get("boards")
    }

    fn list_states(&self, board_id: BoardId) -> ApiResult<Vec<State>> {
        self.get(&format!("boards/{board_id}/states"))
    }

    fn list_tags(&self, board_id: BoardId) -> ApiResult<Vec<Tag>> {
        self.get(&format!("boards/{board_id}/tags"))
    }

    fn create_tag(&self, form: &CreateTagForm) -> ApiResult<Tag> {
        self.send_json(Method::POST, &format!("boards/{}/tags", form.board_id), form)
    }
}
