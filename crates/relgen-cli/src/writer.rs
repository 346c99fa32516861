use relgen_build::render::{Artifact, ArtifactWriter, WriteError, WriteOutcome};
use std::{io::Write, path::Path};

///
/// FsWriter
///
/// Formats artifacts with prettyplease and persists them atomically
/// (tempfile + rename). A formatting failure is recoverable: the raw
/// bytes are saved and reported; only persistence failures are fatal.
///

pub struct FsWriter;

impl ArtifactWriter for FsWriter {
    fn write(&mut self, artifact: &Artifact) -> Result<WriteOutcome, WriteError> {
        let (body, outcome) = match format(&artifact.tokens.to_string()) {
            Ok(pretty) => (
                format!("{}{pretty}", artifact.header),
                WriteOutcome::Formatted,
            ),
            Err(_) => (artifact.raw_source(), WriteOutcome::Unformatted),
        };

        persist(&artifact.path, body.as_bytes()).map_err(|source| WriteError {
            path: artifact.path.clone(),
            message: source.to_string(),
        })?;

        Ok(outcome)
    }
}

fn format(source: &str) -> Result<String, syn::Error> {
    let file = syn::parse_file(source)?;

    Ok(prettyplease::unparse(&file))
}

fn persist(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
