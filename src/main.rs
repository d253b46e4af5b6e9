use clap::{Parser, Subcommand};
use regatta_sheet::source::HttpSource;
use regatta_sheet::{config, output, pipeline, results};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shared arguments for commands that work on one class.
#[derive(clap::Args, Clone)]
struct ClassArgs {
    /// Event URL, e.g. https://www.manage2sail.com/en-EN/event/<id>
    url: String,

    /// Class display name as listed on the event page
    #[arg(long = "class", short = 'c')]
    class_name: String,
}

#[derive(Parser)]
#[command(name = "regatta-sheet")]
#[command(about = "Export regatta class results to an xlsx workbook")]
#[command(long_about = "\
Export regatta class results to an xlsx workbook

Give the URL of an event on manage2sail (any locale) and the name of a class
with published results. The workbook has one row per sailor in ranking order,
one column per race, and discarded races filled red.

Sheet layout:

         A     B            C      D    E    ...
  1            Sailnumber   Name   r1   r2   ...
  2      1     NED 4242     ...    1    2
  3      2     NED 3131     ...    2    13   ← discarded race filled

Run 'regatta-sheet gen-config' to generate a documented regatta.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file means stock defaults)
    #[arg(long, default_value = "regatta.toml", global = true)]
    config: PathBuf,

    /// Locale segment for the listing page URL (overrides config)
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Fetch the given URL as the listing page instead of rebuilding it
    #[arg(long, global = true)]
    direct: bool,

    /// More log output on stderr (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show event name, dates, and classes with results
    Info {
        /// Event URL
        url: String,
    },
    /// List classes with results and their ids
    Classes {
        /// Event URL
        url: String,
    },
    /// Write one class's results to a workbook
    Export {
        #[command(flatten)]
        class: ClassArgs,
        /// Output file (overrides the configured filename)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Also print the raw results payload as JSON
        #[arg(long)]
        dump_json: bool,
    },
    /// Print one class's raw results payload as JSON
    Dump {
        #[command(flatten)]
        class: ClassArgs,
    },
    /// Print a stock regatta.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        command => command,
    };

    let mut run_config = config::load_config(&cli.config)?;
    if let Some(locale) = cli.locale {
        run_config.locale = locale;
        run_config.validate()?;
    }
    let source = HttpSource::new(&run_config.base_url, &run_config.http)?;

    match command {
        Command::Info { url } => {
            let event = pipeline::locate(&url, &run_config, cli.direct)?;
            let overview = pipeline::overview(&source, event, &run_config)?;
            output::print_overview(&overview, overview.details()?);
        }
        Command::Classes { url } => {
            let event = pipeline::locate(&url, &run_config, cli.direct)?;
            let overview = pipeline::overview(&source, event, &run_config)?;
            output::print_classes(&overview.classes);
        }
        Command::Export {
            class,
            output: out,
            dump_json,
        } => {
            let event = pipeline::locate(&class.url, &run_config, cli.direct)?;

            println!("==> Fetching event page {}", event.page_url);
            let overview = pipeline::overview(&source, event, &run_config)?;

            println!("==> Fetching results for {}", class.class_name);
            let class_results = pipeline::class_results(&source, &overview, &class.class_name)?;

            println!("==> Writing workbook");
            let report = pipeline::export(&overview, &class_results, &run_config, out.as_deref())?;
            output::print_export_report(&report);

            if dump_json {
                println!("{}", results::dump_json(&class_results.raw)?);
            }
        }
        Command::Dump { class } => {
            let event = pipeline::locate(&class.url, &run_config, cli.direct)?;
            let overview = pipeline::overview(&source, event, &run_config)?;
            let class_results = pipeline::class_results(&source, &overview, &class.class_name)?;
            println!("{}", results::dump_json(&class_results.raw)?);
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for listings and JSON dumps.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
