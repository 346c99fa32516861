mod emit;

pub mod options;
pub mod package;
pub mod render;
pub mod tag;

use crate::{
    options::Options,
    package::TemplatePackage,
    render::{Artifact, ArtifactWriter, MODEL_SUFFIX, RenderError, WriteError, WriteOutcome, header},
};
use proc_macro2::TokenStream;
use relgen_schema::node::Schema;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::{info, warn};

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    RenderError(#[from] RenderError),

    #[error(transparent)]
    WriteError(#[from] WriteError),
}

type Emitter = fn(&TemplatePackage) -> Result<TokenStream, RenderError>;

///
/// Generator
///
/// Drives the full artifact sequence for one schema: the table constants,
/// then search plumbing and the ORM wrapper when enabled, then one model
/// file per entity. The first failure aborts the remaining steps.
///

pub struct Generator<'a> {
    schema: &'a Schema,
    options: &'a Options,
    output: PathBuf,
}

impl<'a> Generator<'a> {
    #[must_use]
    pub fn new(schema: &'a Schema, options: &'a Options, output: impl Into<PathBuf>) -> Self {
        Self {
            schema,
            options,
            output: output.into(),
        }
    }

    pub fn generate(&self, writer: &mut dyn ArtifactWriter) -> Result<(), Error> {
        self.batch("Tables", "tables.rs", emit::tables::generate, writer)?;

        if self.options.with_search {
            self.batch("Search", "search.rs", emit::search::generate, writer)?;
        }
        if self.options.with_orm {
            self.batch("ORM", "orm.rs", emit::orm::generate, writer)?;
        }

        self.models(writer)
    }

    // all entities against one package, rendered once
    fn batch(
        &self,
        name: &str,
        filename: &str,
        emitter: Emitter,
        writer: &mut dyn ArtifactWriter,
    ) -> Result<(), Error> {
        let package = TemplatePackage::new(self.schema, self.options);

        self.render(name, &package, Path::new(filename), emitter, writer)
    }

    // entity list read once, then one singleton package per entity
    fn models(&self, writer: &mut dyn ArtifactWriter) -> Result<(), Error> {
        for entity in self.schema.entities() {
            let package = TemplatePackage::for_entity(self.schema, entity, self.options);
            let filename = format!("{}{}", entity.ident.to_lowercase(), MODEL_SUFFIX);

            self.render(
                "Models",
                &package,
                Path::new(&filename),
                emit::model::generate,
                writer,
            )?;
        }

        Ok(())
    }

    fn render(
        &self,
        name: &str,
        package: &TemplatePackage,
        filename: &Path,
        emitter: Emitter,
        writer: &mut dyn ArtifactWriter,
    ) -> Result<(), Error> {
        let tokens = emitter(package)?;

        let artifact = Artifact {
            name: name.to_string(),
            path: self.output.join(filename),
            header: header(&package.module, name),
            tokens,
        };

        match writer.write(&artifact)? {
            WriteOutcome::Formatted => {}
            WriteOutcome::Unformatted => {
                warn!(
                    "[{name}] saved {} unformatted after a formatting failure",
                    artifact.path.display()
                );
            }
        }

        info!(
            "[{name}] generated {} entitie(s): {}",
            package.entities.len(),
            artifact.path.display()
        );

        Ok(())
    }
}
