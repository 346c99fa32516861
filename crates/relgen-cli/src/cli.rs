use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

///
/// Cli
///

#[derive(Debug, Parser)]
#[command(
    name = "relgen",
    version,
    about = "Generates relq record models from a Postgres schema snapshot"
)]
pub struct Cli {
    /// Only report errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable debug output.
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Basic relq [Postgres] model generator.
    Model(ModelArgs),
}

///
/// ModelArgs
///

#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Schema snapshot file produced by the introspection step.
    #[arg(short = 'i', long)]
    pub snapshot: PathBuf,

    /// Output directory for generated files.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Table names for model generation, separated by comma.
    /// Use 'schema_name.*' to generate models for every table in a schema.
    #[arg(short, long, value_delimiter = ',', default_value = "public.*")]
    pub tables: Vec<String>,

    /// Generate models for referenced foreign tables, even if not listed
    /// in --tables. Never crosses into unlisted schemas.
    #[arg(short, long)]
    pub follow_fk: bool,

    /// Module name for generated file headers. If not set the last
    /// directory segment of the output path is used.
    #[arg(short = 'p', long)]
    pub module: Option<String>,

    /// Custom types separated by comma.
    /// Format: <pg_type>:<rust_path>. Examples: uuid:uuid::Uuid,bytea:String
    #[arg(long, value_delimiter = ',')]
    pub custom_types: Vec<String>,

    /// Use uuid::Uuid as the type for uuid columns.
    #[arg(long)]
    pub uuid: bool,

    /// Types for json columns, separated by comma.
    /// Format: schema.table.field=Type, with '*' as a wildcard token.
    #[arg(short = 'j', long = "json", value_delimiter = ',')]
    pub json_types: Vec<String>,

    /// Add serde rename attributes to generated fields.
    #[arg(long)]
    pub serde_tag: bool,

    /// Keep primary key names as-is (by default they are renamed to 'id').
    #[arg(short, long)]
    pub keep_pk: bool,

    /// Column name for the soft_delete marker.
    #[arg(short, long)]
    pub soft_delete: Option<String>,

    /// Generate basic ORM queries.
    #[arg(short = 'q', long)]
    pub with_orm: bool,

    /// Name of the wrapper struct for ORM queries (works with --with-orm).
    #[arg(short = 'z', long, default_value = relgen_build::options::DEFAULT_DB_WRAP)]
    pub db_wrap: String,

    /// Generate basic search filters.
    #[arg(long)]
    pub with_search: bool,

    /// Do not set the 'alias:t' marker.
    #[arg(short = 'w', long)]
    pub no_alias: bool,

    /// Do not use the discard_unknown_columns marker.
    #[arg(short = 'd', long)]
    pub no_discard: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_model_command() {
        let cli = Cli::parse_from([
            "relgen", "model", "-i", "snapshot.json", "-o", "src/models", "-t",
            "public.orders,public.customers", "--with-orm", "--uuid",
        ]);

        let Commands::Model(args) = cli.command;
        assert_eq!(args.tables, ["public.orders", "public.customers"]);
        assert!(args.with_orm);
        assert!(args.uuid);
        assert_eq!(args.db_wrap, "DbWrap");
    }
}
