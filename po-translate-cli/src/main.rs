mod run;

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = "\
Examples:
  # Translate with the free Lingva service
  po-translate --source en --target sv ./translations/

  # Translate with OpenAI
  po-translate --service openai --api-key sk-xxx --source en --target de ./po/

  # Dry run (don't save)
  po-translate --dry-run --source en --target fr messages.po

Services (free):
  lingva          Google Translate front end (default)
  mymemory        1000 words/day free, more with --email
  libretranslate  Self-hosted or public instances (--url)

Services (API key required):
  deepl           DeepL Pro
  deepl-free      DeepL Free API
  google          Google Cloud Translation
  openai          OpenAI-compatible chat models (--url, --model)
  anthropic       Claude models (--model)";

/// Batch translate gettext .po, Qt .ts and XLIFF files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, after_help = AFTER_HELP)]
pub struct Args {
    /// Files or directories to translate
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Source language code (e.g. en)
    #[arg(short, long)]
    pub source: String,

    /// Target language code (e.g. sv, de, fr). Defaults to the language of LANG
    #[arg(short, long)]
    pub target: Option<String>,

    /// Translation service: lingva, mymemory, libretranslate, deepl,
    /// deepl-free, google, openai, anthropic
    #[arg(long, default_value = "lingva")]
    pub service: String,

    /// API key for paid services
    #[arg(long, env = "PO_TRANSLATE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Custom service URL (Lingva, LibreTranslate, OpenAI-compatible)
    #[arg(long)]
    pub url: Option<String>,

    /// Model for AI services (e.g. gpt-4o-mini, claude-3-haiku-20240307)
    #[arg(long)]
    pub model: Option<String>,

    /// Contact e-mail sent to MyMemory for a higher quota
    #[arg(long)]
    pub email: Option<String>,

    /// Entries per API call
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: u64,

    /// Pause between API calls, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub batch_pause: u64,

    /// Glossary CSV file (source,target) to load
    #[arg(long)]
    pub glossary: Option<PathBuf>,

    /// Don't save changes
    #[arg(long)]
    pub dry_run: bool,

    /// Don't search subdirectories
    #[arg(long)]
    pub no_recursive: bool,

    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    run::run(args)
}
