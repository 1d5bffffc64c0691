//! scienceie-bilou - converts the brat annotations of a ScienceIE folder into BILOU tagged
//! CoNLL files.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use scienceie_bilou::{ConllDocument, ConverterConfigBuilder, EntityType, ScienceIeFolder};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "scienceie-bilou", version, about)]
struct Cli {
    /// Log the progress of the conversion
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct FolderArgs {
    /// Folder holding the `<id>.txt` and `<id>.ann` files
    #[arg(short, long)]
    folder: PathBuf,
    /// Drop the warnings about malformed lines and documents without annotations
    #[arg(long)]
    ignore_warnings: bool,
    /// Convert the documents on multiple threads
    #[arg(long)]
    parallel: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write one CoNLL file per entity type, named `<stem>_<entity>_conll.txt`
    Write {
        #[command(flatten)]
        folder: FolderArgs,
        #[arg(short, long)]
        out_dir: PathBuf,
        #[arg(short, long)]
        stem: String,
        /// Entity types to convert. Defaults to Process, Material and Task
        #[arg(short, long = "entity")]
        entities: Vec<EntityType>,
    },
    /// Write a single CoNLL file with a Task, a Process and a Material column
    Merge {
        #[command(flatten)]
        folder: FolderArgs,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the BILOU lines of one document
    Show {
        #[command(flatten)]
        folder: FolderArgs,
        #[arg(long)]
        file_id: String,
        #[arg(short, long)]
        entity: EntityType,
    },
}

fn open_folder(args: &FolderArgs, entities: &[EntityType]) -> anyhow::Result<ScienceIeFolder> {
    let mut builder = ConverterConfigBuilder::default()
        .ignore_warnings(args.ignore_warnings)
        .parallel(args.parallel);
    if !entities.is_empty() {
        builder = builder.entity_types(entities.iter().map(|e| e.to_string()));
    }
    let config = builder.build();
    tracing::info!("Converter config:\n {}", config);
    ScienceIeFolder::new(&args.folder, config)
        .with_context(|| format!("Could not open folder {}", args.folder.display()))
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Write {
            folder,
            out_dir,
            stem,
            entities,
        } => {
            let dataset = open_folder(&folder, &entities)?;
            for path in dataset.write_bilou_lines(&out_dir, &stem)? {
                println!("{}", path.display());
            }
        }
        Command::Merge { folder, output } => {
            let dataset = open_folder(&folder, &[])?;
            dataset.write_merged_bilou_lines(&output)?;
            println!("{}", output.display());
        }
        Command::Show {
            folder,
            file_id,
            entity,
        } => {
            let dataset = open_folder(&folder, &[])?;
            let lines = dataset.bilou_lines_for_entity(&file_id, entity.as_str())?;
            let document = ConllDocument::from_bilou_lines(&lines, 1);
            let mut stdout = BufWriter::new(std::io::stdout().lock());
            write!(stdout, "{}", document)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "scienceie_bilou=info"
    } else {
        "scienceie_bilou=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(cli.command)
}
