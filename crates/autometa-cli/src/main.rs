use anyhow::{Context, Result};
use autometa_core::{BeforeSaveHook, ContentContext, ContentRecord, MetaParams};
use autometa_text::{describe, normalize, score_keywords, tokenize, AutoMetaTags};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "autometa")]
#[command(about = "Generate meta descriptions and keywords for content records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the before-save hook over one JSON content record (prints the updated record).
    Process(ProcessCmd),
    /// Print the meta description generated for raw (possibly marked-up) text.
    Describe(TextCmd),
    /// Print the ranked keywords generated for raw (possibly marked-up) text.
    Keywords(TextCmd),
    /// Show the resolved configuration (json).
    Doctor(DoctorCmd),
    /// Print version info.
    Version(VersionCmd),
}

/// Plugin parameters. Flags (and their env vars) override the params file, which overrides
/// the built-in defaults.
#[derive(clap::Args, Debug, Default)]
struct ParamArgs {
    /// JSON file with stored plugin parameters, e.g. {"metadesc_length": 155, "stop_words": "a,an"}.
    #[arg(long)]
    params: Option<PathBuf>,
    /// Target description length in characters.
    #[arg(long, env = "AUTOMETA_METADESC_LENGTH")]
    metadesc_length: Option<usize>,
    /// Maximum number of keywords (0 disables keyword generation).
    #[arg(long, env = "AUTOMETA_MAX_KEYWORDS_COUNT")]
    max_keywords_count: Option<usize>,
    /// Minimum keyword length in characters.
    #[arg(long, env = "AUTOMETA_MIN_KEYWORD_LENGTH")]
    min_keyword_length: Option<usize>,
    /// Comma-separated stop words (empty = built-in English list).
    #[arg(long, env = "AUTOMETA_STOP_WORDS")]
    stop_words: Option<String>,
    /// Marker appended to a truncated description.
    #[arg(long, env = "AUTOMETA_DESCRIPTION_ELLIPSIS")]
    description_ellipsis: Option<String>,
}

impl ParamArgs {
    fn meta_params(&self) -> Result<MetaParams> {
        let base = match &self.params {
            Some(p) => MetaParams::from_path(p)
                .with_context(|| format!("read params file {}", p.display()))?,
            None => MetaParams::default(),
        };
        Ok(base.merge(MetaParams {
            metadesc_length: self.metadesc_length,
            max_keywords_count: self.max_keywords_count,
            min_keyword_length: self.min_keyword_length,
            stop_words: self.stop_words.clone(),
            description_ellipsis: self.description_ellipsis.clone(),
        }))
    }
}

#[derive(clap::Args, Debug)]
struct ProcessCmd {
    /// Content context, e.g. com_content.article. Other contexts pass the record through.
    #[arg(long)]
    context: String,
    /// JSON record file ("-" or absent = stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
    #[command(flatten)]
    params: ParamArgs,
}

#[derive(clap::Args, Debug)]
struct TextCmd {
    /// Text file ("-" or absent = stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
    #[command(flatten)]
    params: ParamArgs,
}

#[derive(clap::Args, Debug)]
struct DoctorCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
    #[command(flatten)]
    params: ParamArgs,
}

#[derive(clap::Args, Debug)]
struct VersionCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).with_context(|| format!("read input {}", p.display()))
        }
        _ => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("read stdin")?;
            Ok(s)
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("AUTOMETA_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    // Logs go to stderr; stdout carries the json/text result only.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Opt-in env-file loader (AUTOMETA_ENV_FILE). Never overrides explicit process env.
fn load_env_file() {
    let Ok(p) = std::env::var("AUTOMETA_ENV_FILE") else {
        return;
    };
    let p = p.trim();
    if p.is_empty() {
        return;
    }
    let Ok(txt) = std::fs::read_to_string(p) else {
        tracing::warn!(path = %p, "AUTOMETA_ENV_FILE is not readable");
        return;
    };
    for raw in txt.lines() {
        let s = raw.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let Some((k, v)) = s.split_once('=') else {
            continue;
        };
        let k = k.trim();
        if k.is_empty() {
            continue;
        }
        if std::env::var_os(k).is_none() {
            std::env::set_var(k, v.trim());
        }
    }
}

fn main() -> Result<()> {
    load_env_file();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => {
            let params = args.params.meta_params()?;
            let hook = AutoMetaTags::from_params(&params);
            let raw = read_input(args.input.as_deref())?;
            let mut record =
                ContentRecord::from_json(&raw).context("parse content record json")?;
            let generated = hook.before_save(&args.context, &mut record);
            tracing::info!(
                context = %args.context,
                description = generated.description.is_some(),
                keywords = generated.keywords.is_some(),
                "record processed"
            );
            match args.output.to_ascii_lowercase().as_str() {
                "text" => {
                    println!("description: {}", record.metadesc);
                    println!("keywords: {}", record.metakey);
                }
                _ => {
                    let payload = serde_json::json!({
                        "schema_version": 1,
                        "kind": "process",
                        "ok": true,
                        "context": &args.context,
                        "recognized_context": ContentContext::parse(&args.context).is_some(),
                        "generated": generated,
                        "record": record,
                    });
                    println!("{payload}");
                }
            }
        }
        Commands::Describe(args) => {
            let cfg = args.params.meta_params()?.resolve();
            let raw = read_input(args.input.as_deref())?;
            let text = normalize(&raw);
            let description = describe(&text, &cfg);
            match args.output.to_ascii_lowercase().as_str() {
                "text" => println!("{description}"),
                _ => {
                    let payload = serde_json::json!({
                        "schema_version": 1,
                        "kind": "describe",
                        "ok": true,
                        "meta_desc_length": cfg.meta_desc_length,
                        "text_chars": text.chars().count(),
                        "description": description,
                    });
                    println!("{payload}");
                }
            }
        }
        Commands::Keywords(args) => {
            let cfg = args.params.meta_params()?.resolve();
            let raw = read_input(args.input.as_deref())?;
            let tokens = tokenize(&normalize(&raw));
            let scored = score_keywords(&tokens, &cfg);
            let terms: Vec<String> = scored.iter().map(|k| k.term.clone()).collect();
            let joined = autometa_text::join_keywords(&terms);
            match args.output.to_ascii_lowercase().as_str() {
                "text" => println!("{joined}"),
                _ => {
                    let payload = serde_json::json!({
                        "schema_version": 1,
                        "kind": "keywords",
                        "ok": true,
                        "token_count": tokens.len(),
                        "keywords": scored,
                        "joined": joined,
                    });
                    println!("{payload}");
                }
            }
        }
        Commands::Doctor(args) => {
            let mut checks: Vec<serde_json::Value> = Vec::new();
            let (params, params_error) = match args.params.meta_params() {
                Ok(p) => (p, None),
                Err(e) => (MetaParams::default(), Some(format!("{e:#}"))),
            };
            checks.push(serde_json::json!({
                "name": "params_resolved",
                "ok": params_error.is_none(),
                "message": if params_error.is_none() { "parameters resolved" } else { "parameters could not be read; using defaults" },
                "error": params_error,
            }));
            let cfg = params.resolve();
            let custom_stop_words = params
                .stop_words
                .as_deref()
                .map(|s| !autometa_core::parse_stop_words(s).is_empty())
                .unwrap_or(false);
            checks.push(serde_json::json!({
                "name": "stop_words",
                "ok": !cfg.stop_words.is_empty(),
                "message": if custom_stop_words { "using configured stop words" } else { "using built-in stop words" },
            }));

            let ok = checks.iter().all(|c| c["ok"].as_bool().unwrap_or(false));
            let payload = serde_json::json!({
                "schema_version": 1,
                "kind": "doctor",
                "ok": ok,
                "name": "autometa",
                "version": env!("CARGO_PKG_VERSION"),
                "contexts": [
                    ContentContext::Article.as_str(),
                    ContentContext::Form.as_str(),
                ],
                "config": {
                    "metadesc_length": cfg.meta_desc_length,
                    "max_keywords_count": cfg.max_keywords_count,
                    "min_keyword_length": cfg.min_keyword_length,
                    "stop_words_count": cfg.stop_words.len(),
                    "custom_stop_words": custom_stop_words,
                    "description_ellipsis": cfg.description_ellipsis,
                },
                "checks": checks,
            });
            match args.output.to_ascii_lowercase().as_str() {
                "text" => {
                    println!("autometa {} (ok={})", env!("CARGO_PKG_VERSION"), ok);
                    println!(
                        "config: metadesc_length={} max_keywords_count={} min_keyword_length={} stop_words={}",
                        cfg.meta_desc_length,
                        cfg.max_keywords_count,
                        cfg.min_keyword_length,
                        cfg.stop_words.len(),
                    );
                    println!("checks:");
                    if let Some(arr) = payload["checks"].as_array() {
                        for c in arr {
                            let name = c["name"].as_str().unwrap_or("?");
                            let ok = c["ok"].as_bool().unwrap_or(false);
                            println!("- {}: {}", name, if ok { "ok" } else { "fail" });
                        }
                    }
                }
                _ => println!("{payload}"),
            }
        }
        Commands::Version(args) => {
            let v = serde_json::json!({
                "schema_version": 1,
                "kind": "version",
                "ok": true,
                "name": "autometa",
                "version": env!("CARGO_PKG_VERSION"),
            });
            match args.output.to_ascii_lowercase().as_str() {
                "text" => println!("autometa {}", env!("CARGO_PKG_VERSION")),
                _ => println!("{}", v),
            }
        }
    }
    Ok(())
}
