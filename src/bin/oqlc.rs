//! oqlc - compile a JSON search criteria document to a statement.
//!
//! Prints the statement on the first line and one `$n = value` line per
//! parameter.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use oqlkit::{EntityType, Oql, OqlConfig, SearchCriteria};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "oqlc")]
#[command(about = "Compile search criteria to an object query")]
struct Args {
    /// Criteria document (JSON); reads an empty criteria when omitted
    criteria: Option<PathBuf>,

    /// Fully-qualified entity type
    #[arg(short, long)]
    entity: String,

    /// Alias bound to the entity
    #[arg(short, long)]
    alias: Option<String>,

    /// Render LIMIT clauses
    #[arg(short, long)]
    limit: bool,

    /// Print the count statement instead
    #[arg(long)]
    count: bool,

    /// Compiler config document (JSON); flags override it
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("oqlkit=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("oqlc: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> oqlkit::Result<()> {
    let mut config = match &args.config {
        Some(path) => OqlConfig::from_json_file(path)?,
        None => OqlConfig::default(),
    };
    if let Some(alias) = &args.alias {
        config.alias.clone_from(alias);
    }
    if args.limit {
        config.render_limit = true;
    }

    let criteria: SearchCriteria = match &args.criteria {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => SearchCriteria::new(),
    };

    let entity = EntityType::new(args.entity.as_str())?;
    let oql = Oql::with_config(&entity, &config, Some(&criteria))?;

    if args.count {
        println!("{}", oql.count_statement());
    } else {
        println!("{}", oql.statement());
    }
    for (i, value) in oql.parameter_values().iter().enumerate() {
        println!("${} = {value}", i + 1);
    }
    Ok(())
}
