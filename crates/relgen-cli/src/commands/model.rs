use crate::{cli::ModelArgs, writer::FsWriter};
use anyhow::Context;
use relgen_build::{
    Generator,
    options::{CustomType, CustomTypeMapping, Options},
};
use relgen_schema::{
    read::{Snapshot, TablePattern},
    types,
};
use std::path::Path;
use tracing::warn;

pub fn handle(args: &ModelArgs) -> anyhow::Result<()> {
    // configuration parse errors must surface before any snapshot access
    let options = build_options(args)?;
    let patterns: Vec<TablePattern> = args
        .tables
        .iter()
        .map(|t| t.parse())
        .collect::<Result<_, _>>()
        .context("parsing table patterns")?;

    let snapshot = Snapshot::from_path(&args.snapshot).context("reading schema snapshot")?;
    let schema = snapshot
        .select(&patterns, args.follow_fk)
        .context("selecting tables")?;

    if schema.is_empty() {
        warn!("no tables matched the requested patterns");
    }

    let mut writer = FsWriter;
    Generator::new(&schema, &options, &args.output)
        .generate(&mut writer)
        .context("generating models")?;

    Ok(())
}

fn build_options(args: &ModelArgs) -> anyhow::Result<Options> {
    let mut custom_types =
        CustomTypeMapping::parse(&args.custom_types).context("parsing custom types")?;

    if args.uuid && !custom_types.has(types::PG_UUID) {
        custom_types.insert(
            types::PG_UUID,
            CustomType {
                rust_type: "Uuid".to_string(),
                import: Some("uuid::Uuid".to_string()),
            },
        );
    }

    let json_types =
        Options::parse_json_overrides(&args.json_types).context("parsing json overrides")?;

    let module = args
        .module
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map_or_else(|| module_from_output(&args.output), str::to_string);

    let mut options = Options {
        module,
        keep_pk: args.keep_pk,
        soft_delete: args.soft_delete.clone(),
        no_alias: args.no_alias,
        no_discard: args.no_discard,
        serde_tag: args.serde_tag,
        with_orm: args.with_orm,
        with_search: args.with_search,
        db_wrap: args.db_wrap.clone(),
        custom_types,
        json_types,
    };
    options.def();

    Ok(options)
}

// the last directory segment of the output path names the module
fn module_from_output(output: &Path) -> String {
    output
        .file_name()
        .and_then(|name| name.to_str())
        .map_or_else(|| "models".to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> ModelArgs {
        let mut argv = vec!["relgen", "model", "-i", "snapshot.json", "-o", "src/models"];
        argv.extend_from_slice(extra);

        let crate::cli::Cli {
            command: crate::cli::Commands::Model(args),
            ..
        } = crate::cli::Cli::parse_from(argv);

        args
    }

    #[test]
    fn module_defaults_from_output_path() {
        let options = build_options(&args(&[])).unwrap();
        assert_eq!(options.module, "models");

        let options = build_options(&args(&["-p", "db"])).unwrap();
        assert_eq!(options.module, "db");
    }

    #[test]
    fn uuid_flag_registers_custom_type() {
        let options = build_options(&args(&["--uuid"])).unwrap();
        assert_eq!(
            options.custom_types.get("uuid").map(|c| c.rust_type.as_str()),
            Some("Uuid")
        );

        // an explicit mapping wins over the shorthand
        let options =
            build_options(&args(&["--uuid", "--custom-types", "uuid:my_ids::OrderId"])).unwrap();
        assert_eq!(
            options.custom_types.get("uuid").map(|c| c.rust_type.as_str()),
            Some("OrderId")
        );
    }

    #[test]
    fn malformed_configuration_fails_fast() {
        assert!(build_options(&args(&["--custom-types", "uuid"])).is_err());
        assert!(build_options(&args(&["--json", "extra=Type"])).is_err());
    }
}
