//! `criba compile` command - Compile a filter request into SQL fragments.

use criba_query::{FilterCompiler, RenderMode};

use crate::cli::{CompileArgs, OutputFormat};
use crate::error::CliResult;
use crate::output;

/// Run the compile command
pub async fn run(args: CompileArgs) -> CliResult<()> {
    let (request, config) = super::load(&args.source).await?;

    let mut options = config.compiler_options();
    if args.placeholders {
        options.render = RenderMode::Placeholder;
    }
    if let Some(dialect) = args.dialect {
        options.dialect = dialect.into();
    }

    let compiled = FilterCompiler::new(options).compile(&request)?;

    if config.debug.log_sql {
        tracing::info!(
            source = %super::source_name(&args.source),
            params = compiled.params.len(),
            "compiled: {}",
            compiled.bundle.where_clause()
        );
    }

    match args.format {
        OutputFormat::Json => {
            output::data(&serde_json::to_string_pretty(&compiled)?);
        }
        OutputFormat::Sql => {
            output::data(&compiled.bundle.where_clause());
            for (i, param) in compiled.params.iter().enumerate() {
                output::data(&format!("-- param {}: {}", i + 1 + options.param_offset, param));
            }
        }
    }

    Ok(())
}
