//! authlink CLI: search an authority or look up a term from the command line.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use authlink::{AuthorityRegistry, HttpGraphLoader, LinkedDataAuthority, RdfFormat, RequestHeader};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "authlink", version = env!("CARGO_PKG_VERSION"), about = "Query linked data authorities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search an authority
    Search {
        #[command(flatten)]
        options: CommonOptions,

        /// Attach context values to each result
        #[arg(long)]
        context: bool,

        /// Text to search for
        query: String,
    },
    /// Look up a single term
    Term {
        #[command(flatten)]
        options: CommonOptions,

        /// Term identifier (or URI, depending on the authority)
        id: String,
    },
    /// List configured authorities
    List {
        /// Directory holding one <name>.json file per authority
        #[arg(long, default_value = "authorities")]
        config_dir: PathBuf,
    },
}

#[derive(Args)]
struct CommonOptions {
    /// Directory holding one <name>.json file per authority
    #[arg(long, default_value = "authorities")]
    config_dir: PathBuf,

    /// Authority name
    #[arg(short, long)]
    authority: String,

    /// Subauthority key
    #[arg(short, long)]
    subauth: Option<String>,

    /// Comma separated language tags, or * for all
    #[arg(short, long)]
    lang: Option<String>,

    /// Force the response format instead of negotiating it
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Extra url template binding, as variable=value
    #[arg(short, long = "replace", value_parser = parse_binding)]
    replacements: Vec<(String, String)>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    RdfXml,
    JsonLd,
    Turtle,
    NTriples,
}

impl From<FormatArg> for RdfFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::RdfXml => Self::RdfXml,
            FormatArg::JsonLd => Self::JsonLd,
            FormatArg::Turtle => Self::Turtle,
            FormatArg::NTriples => Self::NTriples,
        }
    }
}

fn parse_binding(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected variable=value, found '{raw}'"))
}

impl CommonOptions {
    fn header(&self) -> RequestHeader {
        let mut header = RequestHeader::new();
        if let Some(subauth) = &self.subauth {
            header = header.with_subauthority(subauth);
        }
        if let Some(lang) = &self.lang {
            header = header.with_language(lang);
        }
        if let Some(format) = self.format {
            header = header.with_format(format.into());
        }
        for (variable, value) in &self.replacements {
            header = header.with_replacement(variable, value);
        }
        header
    }

    fn authority(&self) -> anyhow::Result<LinkedDataAuthority> {
        let registry = AuthorityRegistry::from_directory(&self.config_dir);
        let loader = HttpGraphLoader::with_timeout(Duration::from_secs(self.timeout))?;
        LinkedDataAuthority::new(&registry, &self.authority, Arc::new(loader))
            .with_context(|| format!("loading authority '{}'", self.authority))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authlink=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Command::Search {
            options,
            context,
            query,
        } => {
            let header = options.header().with_context(context);
            let results = options.authority()?.search(&query, &header)?;
            serde_json::to_string_pretty(&results)?
        },
        Command::Term { options, id } => {
            let term = options.authority()?.find(&id, &options.header())?;
            serde_json::to_string_pretty(&term)?
        },
        Command::List { config_dir } => {
            let names = AuthorityRegistry::from_directory(&config_dir).names()?;
            serde_json::to_string_pretty(&names)?
        },
    };
    println!("{output}");
    Ok(())
}
