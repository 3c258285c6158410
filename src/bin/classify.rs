//! Phone Number Classify CLI
//!
//! Queries table metadata using string keyed classifiers.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use phonenumber_classifier::{
    ClassifierBase, ClassifierConfig, DigitSequence, PhoneNumber, SchemaVersion, TableClassifier,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "phonenumber-classify")]
#[command(about = "Classify and match phone numbers against table metadata")]
struct Cli {
    /// Config file (defaults to phonenumbers.toml lookup)
    #[arg(short, long)]
    config: Option<String>,

    /// Metadata file, overriding the configured path
    #[arg(short, long)]
    metadata: Option<PathBuf>,

    /// Accepted schema as namespace@version (repeatable, overrides config)
    #[arg(short, long = "schema")]
    schemas: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a number against all valid ranges
    Match {
        calling_code: String,
        national_number: String,
    },

    /// Test a number against possible lengths only
    Length {
        calling_code: String,
        national_number: String,
    },

    /// Classify a complete number for an attribute
    Classify {
        calling_code: String,
        national_number: String,
        #[arg(short, long)]
        attribute: String,
    },

    /// Identify the unique value of a single valued attribute
    Identify {
        calling_code: String,
        national_number: String,
        #[arg(short, long)]
        attribute: String,
    },

    /// List values a (possibly partial) number could still have
    Possible {
        calling_code: String,
        national_number: String,
        #[arg(short, long)]
        attribute: String,
        /// Only match against these values (merged as a union)
        #[arg(short, long)]
        value: Vec<String>,
    },

    /// List every value of an attribute
    Values {
        #[arg(short, long)]
        attribute: String,
    },

    /// Print an example number for a calling code
    Example { calling_code: String },
}

fn main() {
    let cli = Cli::parse();

    let config = match ClassifierConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli, config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: ClassifierConfig) -> anyhow::Result<()> {
    let path = cli.metadata.unwrap_or_else(|| config.metadata_path());
    let accepted = if cli.schemas.is_empty() {
        config.accepted_schemas()?
    } else {
        cli.schemas
            .iter()
            .map(|s| SchemaVersion::parse(s))
            .collect::<Result<Vec<_>, _>>()?
    };
    if accepted.is_empty() {
        bail!("no accepted schema versions; pass --schema or set metadata.accepted_schemas");
    }

    let raw = TableClassifier::from_path(&path, &accepted)
        .with_context(|| format!("loading metadata from {}", path.display()))?;
    let base = ClassifierBase::new(raw);

    match cli.command {
        Commands::Match { calling_code, national_number } => {
            let number = PhoneNumber::from_parts(&calling_code, &national_number)?;
            println!("{}", base.match_number(&number));
        }

        Commands::Length { calling_code, national_number } => {
            let number = PhoneNumber::from_parts(&calling_code, &national_number)?;
            println!("{}", base.test_length(&number));
        }

        Commands::Classify { calling_code, national_number, attribute } => {
            let number = PhoneNumber::from_parts(&calling_code, &national_number)?;
            let classifier = base.for_strings(&attribute).classifier()?;
            print_sorted(classifier.classify(&number));
        }

        Commands::Identify { calling_code, national_number, attribute } => {
            let number = PhoneNumber::from_parts(&calling_code, &national_number)?;
            let classifier = base.for_strings(&attribute).single_valued_classifier()?;
            match classifier.identify(&number) {
                Some(value) => println!("{}", value),
                None => println!("(none)"),
            }
        }

        Commands::Possible { calling_code, national_number, attribute, value } => {
            let number = PhoneNumber::from_parts(&calling_code, &national_number)?;
            let matcher = base.for_strings(&attribute).matcher()?;
            if value.is_empty() {
                print_sorted(matcher.possible_values(&number));
            } else {
                println!("{}", matcher.match_values(&number, &value));
            }
        }

        Commands::Values { attribute } => {
            for value in base.raw().possible_values(&attribute) {
                println!("{}", value);
            }
        }

        Commands::Example { calling_code } => {
            let cc = DigitSequence::parse(&calling_code)?;
            match base.example_number(&cc) {
                Some(number) => println!("{}", number),
                None => bail!("no example number for calling code {}", cc),
            }
        }
    }

    Ok(())
}

fn print_sorted(values: impl IntoIterator<Item = String>) {
    let mut values: Vec<String> = values.into_iter().collect();
    values.sort();
    for value in values {
        println!("{}", value);
    }
}
