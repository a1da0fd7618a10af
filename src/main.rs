use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sitasi::config::{default_config_path, find_config_file, get_config, load_config, Config};
use sitasi::models::{Labels, Locale, Reference};
use sitasi::utils::{format_citation, format_inline_citation};
use sitasi::{resolve_citation, ReferenceResolver};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Sitasi - Resolve free-text citations into structured references
#[derive(Parser, Debug)]
#[command(name = "sitasi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve free-text citations into structured references", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Language for sentinels and messages (overrides the config file)
    #[arg(long, value_enum, global = true)]
    locale: Option<LocaleArg>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (plain if TTY, JSON otherwise)
    Auto,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LocaleArg {
    /// English
    En,
    /// Bahasa Indonesia
    Id,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::En => Locale::En,
            LocaleArg::Id => Locale::Id,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a citation query into a reference
    #[command(alias = "r")]
    Resolve {
        /// Free-text citation (title, authors, year...)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write the default configuration file
    Init {
        /// Destination (default: the user config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("sitasi={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        get_config()?
    };

    if let Some(locale) = cli.locale {
        config.output.locale = locale.into();
    }

    match cli.command {
        Commands::Resolve { query } => {
            let query = query.join(" ");
            let resolver = ReferenceResolver::from_config(&config)?;

            match resolve_citation(&resolver, &query).await {
                Ok(reference) => output_reference(&reference, config.output.locale, cli.output)?,
                Err(e) => {
                    tracing::debug!("Resolution failed: {}", e);
                    eprintln!("{}", e.localized_message(config.output.locale));
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { command } => match command {
            ConfigCommands::Init { path, force } => {
                let path = path
                    .or_else(default_config_path)
                    .unwrap_or_else(|| PathBuf::from("sitasi.toml"));
                if path.exists() && !force {
                    bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }
                Config::default().save(&path)?;
                if !cli.quiet {
                    eprintln!("Wrote {}", path.display());
                }
            }
            ConfigCommands::Show => {
                print!("{}", config.to_toml()?);
            }
        },
    }

    Ok(())
}

fn output_reference(reference: &Reference, locale: Locale, format: OutputFormat) -> Result<()> {
    let actual_format = if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Plain
        } else {
            OutputFormat::Json
        }
    } else {
        format
    };

    let citation = format_citation(reference, locale);
    let inline = format_inline_citation(reference, locale);

    match actual_format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "citation": citation,
                "inline": inline,
                "reference": reference,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", citation);
            println!("{}", inline);
            println!();
            for (label, value) in reference_fields(reference, locale.labels()) {
                println!("  {:<12} {}", format!("{}:", label), value);
            }
        }
        OutputFormat::Auto => unreachable!(),
    }

    Ok(())
}

/// Field listing for plain output; missing values show their sentinel
fn reference_fields(reference: &Reference, labels: &Labels) -> Vec<(&'static str, String)> {
    let or = |value: &Option<String>, fallback: &str| {
        value.clone().unwrap_or_else(|| fallback.to_string())
    };

    let mut fields = vec![
        ("Type", reference.kind().to_string()),
        ("Authors", reference.format_authors(labels)),
        ("Year", reference.year().display(labels)),
        ("Title", reference.title().to_string()),
    ];

    match reference {
        Reference::Journal(j) => {
            fields.push(("Journal", j.journal.clone()));
            fields.push(("Volume", or(&j.volume, labels.unknown_volume)));
            fields.push(("Issue", or(&j.issue, "")));
            fields.push(("Pages", or(&j.pages, labels.unknown_pages)));
            fields.push(("DOI", or(&j.doi, "")));
        }
        Reference::BookChapter(c) => {
            fields.push(("Book", or(&c.book_title, labels.unknown_title)));
            fields.push(("Pages", or(&c.pages, labels.unknown_pages)));
            fields.push(("Editors", c.editors.join(", ")));
            fields.push(("Publisher", or(&c.publisher, "")));
            fields.push(("City", or(&c.pub_city, "")));
            fields.push(("Country", or(&c.pub_country, "")));
        }
        Reference::Proceeding(p) => {
            fields.push(("Proceedings", or(&p.proc_name, labels.unknown_title)));
            fields.push(("Editors", p.editors.join(", ")));
            fields.push(("Publisher", or(&p.publisher, "")));
            fields.push(("City", or(&p.pub_city, "")));
            fields.push(("Country", or(&p.pub_country, "")));
            fields.push(("Conf. date", or(&p.con_date, "")));
            fields.push(("Conf. city", or(&p.con_city, "")));
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitasi::models::Journal;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_resolve_joins_words() {
        let cli = Cli::parse_from(["sitasi", "resolve", "smith", "2020", "widget", "study"]);
        match &cli.command {
            Commands::Resolve { query } => assert_eq!(query.join(" "), "smith 2020 widget study"),
            _ => panic!("Expected Resolve command"),
        }
        assert_eq!(cli.output, OutputFormat::Auto);
        assert_eq!(cli.locale, None);
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from([
            "sitasi", "-vv", "--locale", "id", "--output", "json", "--config",
            "/path/to/config.toml", "resolve", "widgets",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.locale, Some(LocaleArg::Id));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
        assert_eq!(Locale::from(LocaleArg::Id), Locale::Id);
    }

    #[test]
    fn test_cli_config_commands() {
        let cli = Cli::parse_from(["sitasi", "config", "init", "--path", "x.toml", "--force"]);
        match cli.command {
            Commands::Config {
                command: ConfigCommands::Init { path, force },
            } => {
                assert_eq!(path, Some(PathBuf::from("x.toml")));
                assert!(force);
            }
            _ => panic!("Expected config init"),
        }

        assert!(Cli::try_parse_from(["sitasi", "resolve"]).is_err());
    }

    #[test]
    fn test_reference_fields_show_sentinels() {
        let reference = Reference::Journal(Journal {
            journal: "J. Widg.".to_string(),
            ..Default::default()
        });
        let fields = reference_fields(&reference, Locale::En.labels());

        assert!(fields.contains(&("Volume", "[Unknown volume]".to_string())));
        assert!(fields.contains(&("Issue", String::new())));
        assert!(fields.contains(&("Authors", "[Anonymous]".to_string())));
    }
}
