//! JavaScript interop surface for test contexts
//!
//! Components under test call into JavaScript through the [`JsRuntime`]
//! capability. The default registration is a [`PlaceholderJsRuntime`] that
//! fails every invocation with a pointed error, so tests that never touch
//! interop run unaffected while tests that do get told to register a real
//! or scripted runtime.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Errors surfaced by JavaScript interop calls
#[derive(Error, Debug)]
pub enum JsRuntimeError {
    #[error(
        "No JavaScript runtime configured for this test context; '{identifier}' cannot be \
         invoked. Register a runtime before exercising interop code"
    )]
    NotConfigured { identifier: String },

    #[error("JavaScript invocation '{identifier}' failed: {message}")]
    Invocation { identifier: String, message: String },

    #[error("Failed to deserialize the result of '{identifier}': {source}")]
    Deserialize {
        identifier: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Object-safe JavaScript invocation contract
///
/// Kept minimal so it can live behind `Arc<dyn JsRuntime>` in the service
/// registry; typed conveniences hang off [`JsRuntimeExt`].
#[async_trait]
pub trait JsRuntime: Send + Sync {
    /// Invoke the identified JavaScript function with JSON arguments
    async fn invoke_raw(
        &self,
        identifier: &str,
        args: Vec<Value>,
    ) -> Result<Value, JsRuntimeError>;
}

/// Typed wrappers over [`JsRuntime`]
#[async_trait]
pub trait JsRuntimeExt: JsRuntime {
    /// Invoke a JavaScript function and deserialize its result into `T`
    async fn invoke<T>(&self, identifier: &str, args: Vec<Value>) -> Result<T, JsRuntimeError>
    where
        T: DeserializeOwned,
    {
        let value = self.invoke_raw(identifier, args).await?;
        serde_json::from_value(value).map_err(|source| JsRuntimeError::Deserialize {
            identifier: identifier.to_string(),
            source,
        })
    }
}

impl<R: JsRuntime + ?Sized> JsRuntimeExt for R {}

/// Default runtime that rejects every invocation
///
/// Stands in for a real JavaScript environment so resolution of the
/// capability always succeeds; only actual invocations fail.
#[derive(Debug, Default)]
pub struct PlaceholderJsRuntime;

impl PlaceholderJsRuntime {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl JsRuntime for PlaceholderJsRuntime {
    async fn invoke_raw(
        &self,
        identifier: &str,
        _args: Vec<Value>,
    ) -> Result<Value, JsRuntimeError> {
        warn!("Placeholder JavaScript runtime invoked: {}", identifier);
        Err(JsRuntimeError::NotConfigured {
            identifier: identifier.to_string(),
        })
    }
}
