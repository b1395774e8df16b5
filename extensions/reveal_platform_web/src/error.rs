//! Web platform error types

use reveal_app::RevealError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors starting Reveal in a browser
#[derive(Error, Debug)]
pub enum WebError {
    /// No global `window` (not running in a browser main thread)
    #[error("No global window available")]
    NoWindow,

    /// The window has no document
    #[error("Window has no document")]
    NoDocument,

    /// Configuration did not parse or validate
    #[error(transparent)]
    Config(#[from] RevealError),

    /// A DOM call threw
    #[error("DOM call failed: {0}")]
    Dom(String),
}

impl WebError {
    pub(crate) fn dom(err: JsValue) -> Self {
        WebError::Dom(format!("{err:?}"))
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Result type for web platform operations
pub type Result<T> = std::result::Result<T, WebError>;
