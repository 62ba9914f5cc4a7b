use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no global window")]
    NoWindow,

    #[error("element not found: {0}")]
    MissingElement(String),

    #[error("WebGL2 not supported")]
    ContextUnavailable,

    #[error("shader compile failed: {0}")]
    ShaderCompile(String),

    #[error("program link failed: {0}")]
    ProgramLink(String),

    #[error("spring would not settle (stiffness {stiffness}, damping {damping})")]
    InvalidSpring { stiffness: f32, damping: f32 },

    #[error("javascript error: {0}")]
    Js(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<wasm_bindgen::JsValue> for Error {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Error::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<Error> for wasm_bindgen::JsValue {
    fn from(err: Error) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
