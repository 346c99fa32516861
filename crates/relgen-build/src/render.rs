use proc_macro2::TokenStream;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Destination suffix for per-entity model artifacts.
pub const MODEL_SUFFIX: &str = "_model.rs";

///
/// RenderError
///
/// Emitter execution failures. A bad ident or type path aborts the run;
/// everything else an emitter consumes was validated upstream.
///

#[derive(Debug, ThisError)]
pub enum RenderError {
    #[error("invalid generated ident '{0}'")]
    Ident(String),

    #[error("invalid generated type '{0}'")]
    Type(String),

    #[error("invalid import path '{0}'")]
    Import(String),
}

///
/// WriteError
///
/// Persistence failed; raw bytes could not be saved either.
///

#[derive(Debug, ThisError)]
#[error("failed to persist '{path}': {message}")]
pub struct WriteError {
    pub path: PathBuf,
    pub message: String,
}

///
/// WriteOutcome
///
/// Writers own formatting; a formatting failure that still persisted the
/// raw bytes is recoverable and reported here, not as an error.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteOutcome {
    Formatted,
    Unformatted,
}

///
/// Artifact
///
/// One render result on its way to a writer: destination path, the
/// pre-formatting token stream, and a logical name for progress output.
///

#[derive(Debug)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub header: String,
    pub tokens: TokenStream,
}

impl Artifact {
    /// Unformatted source, used verbatim when formatting fails.
    #[must_use]
    pub fn raw_source(&self) -> String {
        format!("{}{}\n", self.header, self.tokens)
    }
}

///
/// ArtifactWriter
///

pub trait ArtifactWriter {
    fn write(&mut self, artifact: &Artifact) -> Result<WriteOutcome, WriteError>;
}

/// Header prepended to every generated file, after formatting.
#[must_use]
pub fn header(module: &str, artifact: &str) -> String {
    format!(
        "// @generated by relgen — do not edit.\n// module `{module}`, artifact `{artifact}`. Regenerate with `relgen model`.\n\n"
    )
}
