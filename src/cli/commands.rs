use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use tracing::error;

use crate::export::{BulkExporter, DEFAULT_BATCH_SIZE, NdjsonBulkSink};
use crate::models::{BoolMode, OutputFormat, ReaderOptions};
use crate::parsers::{Output, RecordReader};
use crate::utils::{collect_log_files, init_logging, output_path};

#[derive(Parser)]
#[command(name = "zeek-log-parser")]
#[command(version = "0.1.0")]
#[command(about = "Convert Zeek (Bro) ASCII logs to JSON or CSV", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every command that reads a log
#[derive(Args, Debug, Clone, Default)]
pub struct ReadArgs {
    /// Only output these fields (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Never output these fields (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Replace the set separator in field names with '_'
    #[arg(long)]
    pub safe_headers: bool,

    /// Parse bool columns as T/F instead of treating any value as true
    #[arg(long)]
    pub strict_bool: bool,

    /// KEY=VALUE added to every JSON record (repeatable)
    #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_meta)]
    pub meta: Vec<(String, String)>,
}

impl ReadArgs {
    pub fn options(&self, format: OutputFormat) -> ReaderOptions {
        let mut options = ReaderOptions::new()
            .ignore_keys(self.ignore.iter().cloned())
            .output_format(format)
            .safe_headers(self.safe_headers)
            .bool_mode(if self.strict_bool { BoolMode::Strict } else { BoolMode::Truthy });
        if let Some(fields) = &self.fields {
            options = options.fields(fields.iter().cloned());
        }
        for (key, value) in &self.meta {
            options = options.metadata(key.clone(), value.clone());
        }
        options
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert logs to JSON lines, writing conn.log to conn.json
    Json {
        /// Log files, or directories to search for *.log files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print to stdout instead of writing .json files
        #[arg(long)]
        stdout: bool,

        #[command(flatten)]
        read: ReadArgs,
    },
    /// Convert a log to CSV (values are quoted, embedded quotes and commas are not escaped)
    Csv {
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        read: ReadArgs,
    },
    /// Print the fields a conversion would output
    Fields {
        file: PathBuf,

        /// Print as a single comma-separated line
        #[arg(long)]
        csv: bool,

        #[command(flatten)]
        read: ReadArgs,
    },
    /// Write an Elasticsearch _bulk request body
    Bulk {
        file: PathBuf,

        /// Target index name
        #[arg(long, default_value = "zeeklogs")]
        index: String,

        /// Documents per batch
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        read: ReadArgs,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::Json { paths, stdout, read }) => {
            convert_json(paths, *stdout, read)?;
        }
        Some(Commands::Csv { file, output, read }) => {
            convert_csv(file, output.as_deref(), read)?;
        }
        Some(Commands::Fields { file, csv, read }) => {
            show_fields(file, *csv, read)?;
        }
        Some(Commands::Bulk { file, index, batch_size, output, read }) => {
            export_bulk(file, index, *batch_size, output.as_deref(), read)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn parse_meta(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

fn open_reader(file: &Path, options: ReaderOptions) -> Result<RecordReader<io::BufReader<File>>> {
    RecordReader::open(file, options)
        .with_context(|| format!("Failed to read log header: {}", file.display()))
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn write_output(writer: &mut dyn Write, output: Output) -> Result<()> {
    match output {
        Output::Text(line) => writeln!(writer, "{}", line)?,
        Output::Record(record) => writeln!(writer, "{}", serde_json::to_string(&record)?)?,
    }
    Ok(())
}

/// Write every record of `reader` to `writer`, returning the record count
fn write_records<R: io::BufRead>(reader: RecordReader<R>, writer: &mut dyn Write) -> Result<usize> {
    let mut count = 0;
    for output in reader.records() {
        write_output(writer, output.context("Failed to read log record")?)?;
        count += 1;
    }
    writer.flush().context("Failed to flush output")?;
    Ok(count)
}

fn convert_json(paths: &[PathBuf], stdout: bool, read: &ReadArgs) -> Result<()> {
    let files = collect_log_files(paths)?;
    let options = read.options(OutputFormat::Json);

    if stdout {
        let mut writer = open_output(None)?;
        for file in &files {
            write_records(open_reader(file, options.clone())?, &mut writer)?;
        }
        return Ok(());
    }

    // One independent reader per file
    let results: Vec<(PathBuf, Result<(PathBuf, usize)>)> = files
        .par_iter()
        .map(|file| (file.clone(), convert_file_to_json(file, options.clone())))
        .collect();

    let mut failed = 0;
    for (file, result) in &results {
        match result {
            Ok((output, count)) => {
                println!("{} -> {} ({} records)", file.display(), output.display(), count)
            }
            Err(e) => {
                failed += 1;
                error!("Failed to convert {}: {:#}", file.display(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed to convert", failed, results.len());
    }
    Ok(())
}

fn convert_file_to_json(file: &Path, options: ReaderOptions) -> Result<(PathBuf, usize)> {
    let reader = open_reader(file, options)?;
    let output = output_path(file, "json");
    let mut writer = open_output(Some(&output))?;
    let count = write_records(reader, &mut writer)?;
    Ok((output, count))
}

fn convert_csv(file: &Path, output: Option<&Path>, read: &ReadArgs) -> Result<()> {
    let reader = open_reader(file, read.options(OutputFormat::Csv))?;
    let mut writer = open_output(output)?;
    writeln!(writer, "{}", reader.formatter().fields_csv())?;
    write_records(reader, &mut writer)?;
    Ok(())
}

fn show_fields(file: &Path, csv: bool, read: &ReadArgs) -> Result<()> {
    let format = if csv { OutputFormat::Csv } else { OutputFormat::None };
    let reader = open_reader(file, read.options(format))?;
    println!("{}", reader.fields());
    Ok(())
}

fn export_bulk(
    file: &Path,
    index: &str,
    batch_size: usize,
    output: Option<&Path>,
    read: &ReadArgs,
) -> Result<()> {
    let reader = open_reader(file, read.options(OutputFormat::Json))?;
    let mut sink = NdjsonBulkSink::new(open_output(output)?, index);
    let summary = BulkExporter::new(index).batch_size(batch_size).export(reader, &mut sink)?;

    eprintln!(
        "Exported {} documents in {} batches ({} failed)",
        summary.documents - summary.failed_documents,
        summary.batches,
        summary.failed_batches
    );
    if summary.failed_batches > 0 {
        bail!("{} of {} batches failed", summary.failed_batches, summary.batches);
    }
    Ok(())
}
