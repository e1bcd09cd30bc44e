//! Serving shell commands over HTTP with axum.
//!
//! A [`JsonHandler`] binds one command of a [`Shell`] to a route. Each
//! request is turned into params by a params builder, the command runs, and
//! its JSON response is written back. An empty response becomes
//! `204 No Content`.
//!
//! # Example
//!
//! ```rust
//! use axum::http::StatusCode;
//! use axum::response::IntoResponse;
//! use axum::Router;
//! use mapparse::http::{query_params, JsonHandler};
//! use mapparse::shell::{Command, Shell};
//!
//! let shell = Shell::new();
//! shell
//!     .register(Command::new("ping").exec(|_| async { Ok(None) }))
//!     .unwrap();
//!
//! let ping = JsonHandler::new(shell, "ping")
//!     .params_builder(query_params)
//!     .error_handler(|err| (StatusCode::BAD_REQUEST, err.to_string()).into_response());
//!
//! let app: Router = Router::new().route("/ping", ping.into_method_router());
//! ```

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, Request};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::routing::{get, MethodRouter};
use futures::future::BoxFuture;

use crate::shell::{BoxError, Shell, ShellError};
use crate::value::{from_json_object, Map, Value};

/// Builds command params from a request.
pub type ParamsBuilder =
    Arc<dyn Fn(Request) -> BoxFuture<'static, Result<Map, BoxError>> + Send + Sync>;

/// Turns a failure into the response sent to the client.
pub type ErrorHandler = Arc<dyn Fn(HttpError) -> Response + Send + Sync>;

/// A failure while serving a command. Every variant names the command.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The params builder failed.
    #[error("{command}: build params: {source}")]
    BuildParams {
        command: String,
        #[source]
        source: BoxError,
    },

    /// The command failed: unknown command, invalid params or handler error.
    #[error("{command}: exec: {source}")]
    Exec {
        command: String,
        #[source]
        source: ShellError,
    },

    /// The response could not be assembled.
    ///
    /// Streaming the body to the client happens after the handler returns,
    /// in axum and hyper, so failures there never reach the error handler.
    #[error("{command}: write: {source}")]
    Write {
        command: String,
        #[source]
        source: axum::http::Error,
    },
}

impl HttpError {
    pub fn command_name(&self) -> &str {
        match self {
            HttpError::BuildParams { command, .. }
            | HttpError::Exec { command, .. }
            | HttpError::Write { command, .. } => command,
        }
    }

    /// Returns the shell error if the command itself failed.
    pub fn shell_error(&self) -> Option<&ShellError> {
        match self {
            HttpError::Exec { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Serves one shell command as a JSON endpoint.
#[derive(Clone)]
pub struct JsonHandler {
    shell: Shell,
    command: String,
    params_builder: Option<ParamsBuilder>,
    error_handler: Option<ErrorHandler>,
}

impl JsonHandler {
    /// Creates a handler for `command`. Without a params builder every
    /// request runs the command with empty params.
    pub fn new(shell: Shell, command: impl Into<String>) -> Self {
        Self {
            shell,
            command: command.into(),
            params_builder: None,
            error_handler: None,
        }
    }

    /// Sets how params are extracted from a request, e.g. [`query_params`]
    /// or [`json_body_params`].
    pub fn params_builder<F, Fut>(mut self, builder: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Map, BoxError>> + Send + 'static,
    {
        self.params_builder = Some(Arc::new(
            move |request: Request| -> BoxFuture<'static, Result<Map, BoxError>> {
                Box::pin(builder(request))
            },
        ));
        self
    }

    /// Sets the function that turns failures into responses.
    ///
    /// A handler without one panics on the first failure, so every
    /// handler serving real traffic should set it.
    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(HttpError) -> Response + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Serves one request.
    ///
    /// # Panics
    ///
    /// Panics if a failure occurs and no error handler is set.
    pub async fn handle(&self, request: Request) -> Response {
        let params = match self.build_params(request).await {
            Ok(params) => params,
            Err(source) => {
                return self.fail(HttpError::BuildParams {
                    command: self.command.clone(),
                    source,
                })
            }
        };

        let body = match self.shell.exec_json(&self.command, params).await {
            Ok(body) => body,
            Err(source) => {
                return self.fail(HttpError::Exec {
                    command: self.command.clone(),
                    source,
                })
            }
        };

        if body.is_empty() {
            return no_content();
        }

        let response = axum::http::Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body));
        match response {
            Ok(response) => response,
            Err(source) => self.fail(HttpError::Write {
                command: self.command.clone(),
                source,
            }),
        }
    }

    /// Routes both GET and POST to this handler.
    pub fn into_method_router<S>(self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handler = Arc::new(self);
        let serve = move |request: Request| {
            let handler = Arc::clone(&handler);
            async move { handler.handle(request).await }
        };
        get(serve.clone()).post(serve)
    }

    async fn build_params(&self, request: Request) -> Result<Map, BoxError> {
        match &self.params_builder {
            Some(builder) => builder(request).await,
            None => Ok(Map::new()),
        }
    }

    fn fail(&self, error: HttpError) -> Response {
        tracing::warn!(command = %self.command, error = %error, "json handler failed");
        match &self.error_handler {
            Some(handler) => handler(error),
            None => panic!("no error handler set, cannot report: {}", error),
        }
    }
}

impl std::fmt::Debug for JsonHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonHandler")
            .field("command", &self.command)
            .field("params_builder", &self.params_builder.is_some())
            .field("error_handler", &self.error_handler.is_some())
            .finish()
    }
}

fn no_content() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    response
}

/// Reads params from the query string. Every value is a string; a repeated
/// key keeps its last value.
pub async fn query_params(request: Request) -> Result<Map, BoxError> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(request.uri())?;
    Ok(pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect())
}

/// Reads params from a JSON object body. An empty body or `null` gives
/// empty params; any other non-object body is an error.
pub async fn json_body_params(request: Request) -> Result<Map, BoxError> {
    let bytes = axum::body::to_bytes(request.into_body(), usize::MAX).await?;
    if bytes.is_empty() {
        return Ok(Map::new());
    }
    let object: Option<serde_json::Map<String, serde_json::Value>> =
        serde_json::from_slice(&bytes)?;
    Ok(object.map(from_json_object).unwrap_or_default())
}
