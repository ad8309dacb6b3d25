//! `criba check` command - Validate a filter request.

use criba_query::FilterCompiler;

use crate::cli::CheckArgs;
use crate::error::CliResult;
use crate::output;

/// Run the check command
pub async fn run(args: CheckArgs) -> CliResult<()> {
    let name = super::source_name(&args.source);
    output::header("Check Filter Request");
    output::kv("Source", &name);

    let (request, config) = super::load(&args.source).await?;
    let compiled = FilterCompiler::new(config.compiler_options()).compile(&request)?;

    let populated: Vec<_> = compiled
        .bundle
        .fragments()
        .filter(|(_, sql)| !sql.is_empty())
        .map(|(category, _)| category)
        .collect();

    output::newline();
    if populated.is_empty() {
        output::info("Request compiles to no conditions");
    } else {
        output::section("Categories");
        for category in &populated {
            output::list_item(category);
        }
        output::newline();
    }

    output::success(&format!("{} is valid", name));
    Ok(())
}
