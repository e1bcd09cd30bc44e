use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use stillwater::Validation;

use super::{BoxError, ShellError};
use crate::schema::{Record, Type};
use crate::value::{from_json_object, Map, Value};

type HandlerFuture<T> = BoxFuture<'static, Result<T, BoxError>>;
type ExecFn = Arc<dyn Fn(Record) -> HandlerFuture<Option<Map>> + Send + Sync>;
type ExecJsonFn = Arc<dyn Fn(Record) -> HandlerFuture<Vec<u8>> + Send + Sync>;

/// A named operation whose params are parsed by a [`Type`] before its
/// handler runs.
///
/// A command has either a map handler ([`exec`](Command::exec)) or a JSON
/// handler ([`exec_json`](Command::exec_json)); the shell converts between
/// the two shapes as needed. If both are set, each entry point uses the
/// handler of its own shape.
///
/// # Example
///
/// ```rust
/// use mapparse::converter::{int32, required};
/// use mapparse::shell::Command;
/// use mapparse::{Map, Type, Value};
///
/// let add = Command::new("add")
///     .params(
///         Type::new()
///             .field("a", [required(), int32()])
///             .field("b", [required(), int32()]),
///     )
///     .exec(|params| async move {
///         let a = params.get("a").as_i64().unwrap_or_default();
///         let b = params.get("b").as_i64().unwrap_or_default();
///         let mut out = Map::new();
///         out.insert("sum".to_string(), Value::Int(a + b));
///         Ok(Some(out))
///     });
///
/// assert_eq!(add.name(), "add");
/// ```
#[derive(Clone)]
pub struct Command {
    name: String,
    params: Option<Type>,
    exec: Option<ExecFn>,
    exec_json: Option<ExecJsonFn>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: None,
            exec: None,
            exec_json: None,
        }
    }

    /// Sets the type used to parse params.
    ///
    /// Without one, the handler receives a record with no fields whose
    /// [`original`](Record::original) is the raw params.
    pub fn params(mut self, params: Type) -> Self {
        self.params = Some(params);
        self
    }

    /// Sets a handler that returns a map, or `None` for no content.
    pub fn exec<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Record) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Map>, BoxError>> + Send + 'static,
    {
        self.exec = Some(Arc::new(
            move |record: Record| -> HandlerFuture<Option<Map>> { Box::pin(handler(record)) },
        ));
        self
    }

    /// Sets a handler that returns JSON bytes. Empty bytes mean no content.
    pub fn exec_json<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Record) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<u8>, BoxError>> + Send + 'static,
    {
        self.exec_json = Some(Arc::new(
            move |record: Record| -> HandlerFuture<Vec<u8>> { Box::pin(handler(record)) },
        ));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params_type(&self) -> Option<&Type> {
        self.params.as_ref()
    }

    /// Parses `params` and runs the handler, returning a map.
    pub async fn run(&self, params: Map) -> Result<Option<Map>, ShellError> {
        let record = self.parse_params(params)?;

        if let Some(exec) = &self.exec {
            return exec(record).await.map_err(|source| self.handler_error(source));
        }

        if let Some(exec_json) = &self.exec_json {
            let bytes = exec_json(record)
                .await
                .map_err(|source| self.handler_error(source))?;
            return decode_response(&bytes).map_err(|source| ShellError::Decode {
                command: self.name.clone(),
                source,
            });
        }

        Err(ShellError::MissingHandler(self.name.clone()))
    }

    /// Parses `params` and runs the handler, returning JSON bytes.
    pub async fn run_json(&self, params: Map) -> Result<Vec<u8>, ShellError> {
        let record = self.parse_params(params)?;

        if let Some(exec_json) = &self.exec_json {
            return exec_json(record)
                .await
                .map_err(|source| self.handler_error(source));
        }

        if let Some(exec) = &self.exec {
            let response = exec(record)
                .await
                .map_err(|source| self.handler_error(source))?;
            return encode_response(response).map_err(|source| ShellError::Encode {
                command: self.name.clone(),
                source,
            });
        }

        Err(ShellError::MissingHandler(self.name.clone()))
    }

    fn parse_params(&self, params: Map) -> Result<Record, ShellError> {
        let ty = self.params.clone().unwrap_or_default();
        match ty.parse(params).into_validation() {
            Validation::Success(record) => Ok(record),
            Validation::Failure(errors) => {
                tracing::debug!(command = %self.name, errors = %errors, "invalid params");
                Err(ShellError::InvalidParams {
                    command: self.name.clone(),
                    errors,
                })
            }
        }
    }

    fn handler_error(&self, source: BoxError) -> ShellError {
        tracing::warn!(command = %self.name, error = %source, "handler failed");
        ShellError::Handler {
            command: self.name.clone(),
            source,
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("exec", &self.exec.is_some())
            .field("exec_json", &self.exec_json.is_some())
            .finish()
    }
}

/// Empty bytes and JSON `null` are no content.
fn decode_response(bytes: &[u8]) -> Result<Option<Map>, serde_json::Error> {
    if bytes.is_empty() {
        return Ok(None);
    }
    let object: Option<serde_json::Map<String, serde_json::Value>> =
        serde_json::from_slice(bytes)?;
    Ok(object.map(from_json_object))
}

fn encode_response(response: Option<Map>) -> Result<Vec<u8>, serde_json::Error> {
    match response {
        None => Ok(Vec::new()),
        Some(map) => serde_json::to_vec(&Value::Map(map)),
    }
}
