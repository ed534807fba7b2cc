use clap::{Args, Parser, Subcommand, ValueEnum};
use groundcontent::{
    load_collection, parse_schema, Collection, CollectionConfig, Format, Manifest, RecordSchema,
};
use std::path::PathBuf;
use std::process;

/// groundcontent CLI — load JSON and Markdown content collections from the command line
#[derive(Parser)]
#[command(name = "groundcontent", version, about)]
struct Cli {
    /// Content manifest; when set, SOURCE names a collection in it
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "yaml")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Clone, ValueEnum)]
enum SourceFormat {
    Json,
    Md,
}

impl From<SourceFormat> for Format {
    fn from(format: SourceFormat) -> Self {
        match format {
            SourceFormat::Json => Format::Json,
            SourceFormat::Md => Format::Markdown,
        }
    }
}

#[derive(Args)]
struct SourceArgs {
    /// JSON file, Markdown directory, or manifest collection name
    source: String,

    /// Force the source format instead of inferring it from the path
    #[arg(long)]
    format: Option<SourceFormat>,

    /// YAML schema file to validate every record against
    #[arg(long)]
    schema: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print every record in a collection
    List {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print a single record by ID
    Get {
        #[command(flatten)]
        source: SourceArgs,
        /// Record ID
        id: String,
    },

    /// Load (and validate) a collection and report the record count
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List the collections declared in the manifest
    Collections,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = cli.manifest.as_ref().map(Manifest::open).transpose()?;

    match cli.command {
        Command::List { source } => {
            let collection = load(manifest.as_ref(), &source)?;
            print_output(&serde_json::Value::Array(collection.into_records()), &cli.output)?;
        }

        Command::Get { source, id } => {
            let collection = load(manifest.as_ref(), &source)?;
            let record = collection
                .get_by_id(&id)
                .ok_or_else(|| format!("No record with id '{id}' in {}", source.source))?;
            print_output(record, &cli.output)?;
        }

        Command::Check { source } => {
            let collection = load(manifest.as_ref(), &source)?;
            print_output(
                &serde_json::json!({ "ok": true, "count": collection.len() }),
                &cli.output,
            )?;
        }

        Command::Collections => {
            let manifest = manifest.ok_or("The collections command requires --manifest")?;
            let names: Vec<_> = manifest.names().collect();
            print_output(&serde_json::json!(names), &cli.output)?;
        }
    }

    Ok(())
}

fn load(
    manifest: Option<&Manifest>,
    args: &SourceArgs,
) -> Result<Collection, Box<dyn std::error::Error>> {
    let schema: Option<RecordSchema> = args
        .schema
        .as_deref()
        .map(parse_schema)
        .transpose()?;

    let mut config = match manifest {
        Some(manifest) => manifest.config(&args.source)?,
        None => CollectionConfig::new(&args.source),
    };
    if let Some(format) = args.format.clone() {
        config = config.format(format.into());
    }
    if let Some(schema) = &schema {
        config = config.schema(schema);
    }

    log::info!("Loading {}", config.path.display());
    Ok(load_collection(config)?)
}

fn print_output(
    value: &serde_json::Value,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}
