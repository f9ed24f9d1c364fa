use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use bloodline::{
    ChartSettings, CircularChart, GifConfig, Generations, PedigreeChart, PedigreeRecordStore,
    RotationSequence,
};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "bloodline", version, about = "Horse pedigree charts from a CSV registry")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the pedigree table as a spreadsheet (.xlsx) or HTML page.
    Table(TableArgs),
    /// Write the circular chart as `<out>.png` plus the bare disc as `<out>_circle.png`.
    Circle(CommonArgs),
    /// Write a slowly rotating GIF of the circular chart.
    Gif(CommonArgs),
    /// Print the prepared chart (tree, repeats, summary) as JSON.
    Inspect(CommonArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// PrimaryKey of the horse (prompted for when omitted).
    pk: Option<String>,

    /// Input CSV.
    #[arg(long, default_value = "bloodline.csv")]
    csv: PathBuf,

    /// Generations to include (prompted for when omitted).
    #[arg(long = "gen")]
    generations: Option<i64>,

    /// Output path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Chart settings JSON.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args, Debug)]
struct TableArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output format; inferred from the `--out` extension when omitted.
    #[arg(long, value_enum)]
    format: Option<TableFormat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TableFormat {
    Xlsx,
    Html,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let verbose = match &cli.cmd {
        Command::Table(a) => a.common.verbose,
        Command::Circle(a) | Command::Gif(a) | Command::Inspect(a) => a.verbose,
    };
    init_tracing(verbose);

    match cli.cmd {
        Command::Table(args) => cmd_table(args),
        Command::Circle(args) => cmd_circle(args),
        Command::Gif(args) => cmd_gif(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

struct Prepared {
    chart: PedigreeChart,
    settings: ChartSettings,
}

/// Resolve PK and generations (prompting if needed), load the CSV and build the chart with
/// the generation count clamped to the known lineage.
fn prepare(args: &CommonArgs, default_gen: i64, min_gen: i64) -> anyhow::Result<Prepared> {
    let pk = match args.pk.as_deref().map(str::trim) {
        Some(pk) if !pk.is_empty() => pk.to_owned(),
        _ => prompt("Enter PrimaryKey: ")?,
    };
    anyhow::ensure!(!pk.is_empty(), "PrimaryKey is required.");
    anyhow::ensure!(args.csv.exists(), "CSV not found: {}", args.csv.display());

    let settings = match &args.settings {
        Some(path) => ChartSettings::load(path)?,
        None => ChartSettings::default(),
    };
    let store = PedigreeRecordStore::load_csv(&args.csv)?;
    anyhow::ensure!(store.contains(&pk), "PrimaryKey not found in CSV: {pk}");

    let requested = match args.generations {
        Some(g) => g,
        None => {
            let answer = prompt(&format!("Enter generations (default {default_gen}): "))?;
            if answer.is_empty() {
                default_gen
            } else {
                answer
                    .parse::<i64>()
                    .context("Generations must be an integer.")?
            }
        }
    };
    anyhow::ensure!(requested >= min_gen, "Generations must be >= {min_gen}.");

    // A horse with no recorded parents still gets a minimal chart of unknown parents.
    let effective = store
        .effective_generations(&pk, Generations::new(requested)?)
        .max(Generations::new(min_gen)?);
    if effective.get() as i64 != requested {
        tracing::info!(requested, effective = effective.get(), "clamped to known lineage");
    }
    let chart = PedigreeChart::prepare_with(&store, &pk, effective);
    Ok(Prepared { chart, settings })
}

fn prompt(question: &str) -> anyhow::Result<String> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{question}")?;
    stderr.flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read answer from stdin")?;
    Ok(line.trim().to_owned())
}

fn cmd_table(args: TableArgs) -> anyhow::Result<()> {
    let Prepared { chart, settings } = prepare(&args.common, 5, 0)?;
    let format = args.format.unwrap_or_else(|| {
        match args
            .common
            .out
            .as_deref()
            .and_then(Path::extension)
            .and_then(|e| e.to_str())
        {
            Some(ext) if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") => {
                TableFormat::Html
            }
            _ => TableFormat::Xlsx,
        }
    });
    let ext = match format {
        TableFormat::Xlsx => "xlsx",
        TableFormat::Html => "html",
    };
    let out = args
        .common
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.{ext}", chart.root_key)));
    ensure_parent_dir(&out)?;

    match format {
        TableFormat::Xlsx => bloodline::write_xlsx(&chart, &settings, &out)?,
        TableFormat::Html => {
            let html = bloodline::render_html(&chart, &settings)?;
            std::fs::write(&out, html).with_context(|| format!("write html '{}'", out.display()))?;
        }
    }
    eprintln!("Wrote: {}", out.display());
    Ok(())
}

fn cmd_circle(args: CommonArgs) -> anyhow::Result<()> {
    let Prepared { chart, settings } = prepare(&args, 9, 1)?;
    let base = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&chart.root_key));
    let circle = CircularChart::new(&chart, &settings)?;
    let (poster, disc) = circle.write_pngs(&base)?;
    eprintln!("Wrote: {}", poster.display());
    eprintln!("Wrote: {}", disc.display());
    Ok(())
}

fn cmd_gif(args: CommonArgs) -> anyhow::Result<()> {
    let Prepared { chart, settings } = prepare(&args, 9, 1)?;
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.gif", chart.root_key)));
    let circle = CircularChart::new(&chart, &settings)?;
    let anim = &settings.animation;
    let sequence = RotationSequence::from_timing(anim.seconds, anim.fps)?;
    let outcome =
        bloodline::render_rotating_gif(&circle, sequence, &GifConfig::from_settings(anim))?;
    outcome.write_to(&out)?;
    eprintln!(
        "Wrote: {} ({} frames, {} bytes)",
        out.display(),
        outcome.frames,
        outcome.bytes.len()
    );
    Ok(())
}

#[derive(serde::Serialize)]
struct InspectDoc<'a> {
    summary: String,
    chart: &'a PedigreeChart,
}

fn cmd_inspect(args: CommonArgs) -> anyhow::Result<()> {
    let Prepared { chart, .. } = prepare(&args, 5, 0)?;
    let doc = InspectDoc {
        summary: bloodline::render::label::inbreeding_summary(&chart),
        chart: &chart,
    };
    let text = serde_json::to_string_pretty(&doc).context("serialize chart")?;
    match &args.out {
        Some(out) => {
            ensure_parent_dir(out)?;
            std::fs::write(out, text).with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("Wrote: {}", out.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
