//! Command-line entry point for the web-story pipeline.
//!
//! Every stage is its own subcommand so stages can be chained through files
//! or pipes:
//!
//! ```text
//! web-story script --url https://… \
//!   | web-story narrate --voice alloy \
//!   | web-story markup --template story.html > story.html
//! ```
//!
//! Slide JSON is read from `--in` (or stdin) and written to `--out` (or
//! stdout).  Logs go to stderr; set `RUST_LOG` to change the level.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use web_story::config::{AppConfig, AppPaths};
use web_story::llm::{Language, SeoMetadata};
use web_story::pipeline::{PublishRequest, StoryPipeline};
use web_story::publish::{ContentType, StoryBundle};
use web_story::slide::{codec, SlideIndex, StageSchema};

#[derive(Parser, Debug)]
#[command(name = "web-story", version, about = "Narrated web stories from news articles")]
struct Cli {
    /// Settings file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch an article and script it into slide JSON.
    Script(ScriptArgs),
    /// Synthesize narration for script JSON.
    Narrate(NarrateArgs),
    /// Splice narrated slides into an AMP story template.
    Markup(MarkupArgs),
    /// Re-base the body slides of a TTS-annotated index as markup-input JSON.
    MarkupInput(IoArgs),
    /// Flat render-input JSON for the video renderer.
    RenderInput(IoArgs),
    /// Render and upload the cover thumbnail; prints its URL.
    Cover(IoArgs),
    /// Generate SEO description, keywords and filter tags.
    Metadata(MetadataArgs),
    /// Fill the submission page and upload it with its metadata.
    Publish(PublishArgs),
    /// Zip an HTML page and its metadata JSON.
    Bundle(BundleArgs),
    /// List the configured narration voices.
    Voices,
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input JSON (stdin when omitted).
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Output file (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ScriptArgs {
    /// Article URL.
    #[arg(long)]
    url: String,

    /// Story language: English or Hindi.
    #[arg(long, default_value = "English")]
    lang: Language,

    /// Number of body slides.
    #[arg(long, default_value_t = 8)]
    slides: usize,

    /// Output file (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct NarrateArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Voice name (see `voices`); defaults to the configured voice.
    #[arg(long)]
    voice: Option<String>,
}

#[derive(Args, Debug)]
struct MarkupArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Template file, http(s) URL or name in the templates directory.
    #[arg(long)]
    template: String,

    /// Input is markup-input JSON; only the body pages are spliced in.
    #[arg(long)]
    bodies: bool,
}

#[derive(Args, Debug)]
struct MetadataArgs {
    /// Story title.
    #[arg(long)]
    title: String,

    /// Output file (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PublishArgs {
    /// Submission template file, http(s) URL or template name.
    #[arg(long)]
    template: String,

    #[arg(long)]
    title: String,

    /// Category name (e.g. Travel, Sports).
    #[arg(long)]
    category: String,

    #[arg(long, default_value = "News")]
    content_type: ContentType,

    #[arg(long, default_value = "English")]
    lang: Language,

    /// Page image URL.
    #[arg(long)]
    image_url: String,

    /// Cover advertised in the metadata (defaults to the page image).
    #[arg(long)]
    cover_url: Option<String>,

    /// Meta description; generated together with keywords and tags when
    /// any of the three is missing.
    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    keywords: Option<String>,

    /// Comma-separated filter tags.
    #[arg(long)]
    tags: Option<String>,

    /// Also write a ZIP of the page and metadata here.
    #[arg(long)]
    bundle: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BundleArgs {
    /// Final HTML page.
    #[arg(long)]
    html: PathBuf,

    /// Metadata JSON.
    #[arg(long)]
    metadata: PathBuf,

    /// Entry name inside the archive (defaults to the HTML file stem).
    #[arg(long)]
    name: Option<String>,

    /// Output ZIP path (defaults to the bundles directory).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => {
            let mut config = AppConfig::load_from(path)?;
            config.apply_env();
            config
        }
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };
    let pipeline = StoryPipeline::from_config(config);

    match cli.cmd {
        Command::Script(args) => cmd_script(&pipeline, args).await,
        Command::Narrate(args) => cmd_narrate(&pipeline, args).await,
        Command::Markup(args) => cmd_markup(&pipeline, args).await,
        Command::MarkupInput(args) => {
            let narrated = read_index(args.in_path.as_deref(), StageSchema::TtsAnnotated)?;
            write_json(args.out.as_deref(), &pipeline.markup_input(&narrated))
        }
        Command::RenderInput(args) => {
            let narrated = read_index(args.in_path.as_deref(), StageSchema::TtsAnnotated)?;
            write_json(args.out.as_deref(), &pipeline.render_input(&narrated))
        }
        Command::Cover(args) => {
            let narrated = read_index(args.in_path.as_deref(), StageSchema::TtsAnnotated)?;
            let url = pipeline.cover(&narrated).await?;
            write_output(args.out.as_deref(), &format!("{url}\n"))
        }
        Command::Metadata(args) => {
            let seo = pipeline.metadata(&args.title).await?;
            write_json(args.out.as_deref(), &seo)
        }
        Command::Publish(args) => cmd_publish(&pipeline, args).await,
        Command::Bundle(args) => cmd_bundle(args),
        Command::Voices => {
            let tts = &pipeline.config().tts;
            let listing: String = tts
                .voices
                .iter()
                .map(|v| {
                    let marker = if *v == tts.default_voice { " (default)" } else { "" };
                    format!("{v}{marker}\n")
                })
                .collect();
            write_output(None, &listing)
        }
    }
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

async fn cmd_script(pipeline: &StoryPipeline, args: ScriptArgs) -> anyhow::Result<()> {
    let story = pipeline
        .script_from_url(&args.url, args.lang, args.slides)
        .await?;
    log::info!(
        "Scripted \"{}\" ({}/{}, {})",
        story.article.title,
        story.classification.category,
        story.classification.subcategory,
        story.classification.emotion
    );
    write_json(args.out.as_deref(), &codec::encode(&story.index, StageSchema::Script))
}

async fn cmd_narrate(pipeline: &StoryPipeline, args: NarrateArgs) -> anyhow::Result<()> {
    let script = read_index(args.io.in_path.as_deref(), StageSchema::Script)?;
    let voice = args
        .voice
        .unwrap_or_else(|| pipeline.config().tts.default_voice.clone());
    let narrated = pipeline.narrate(&script, &voice).await?;
    write_json(
        args.io.out.as_deref(),
        &codec::encode(&narrated, StageSchema::TtsAnnotated),
    )
}

async fn cmd_markup(pipeline: &StoryPipeline, args: MarkupArgs) -> anyhow::Result<()> {
    let template = load_template(pipeline, &args.template).await?;
    let html = if args.bodies {
        let bodies = read_index(args.io.in_path.as_deref(), StageSchema::MarkupInput)?;
        pipeline.markup_bodies(&template, &bodies)?
    } else {
        let narrated = read_index(args.io.in_path.as_deref(), StageSchema::TtsAnnotated)?;
        pipeline.markup(&template, &narrated)?
    };
    write_output(args.io.out.as_deref(), &html)
}

async fn cmd_publish(pipeline: &StoryPipeline, args: PublishArgs) -> anyhow::Result<()> {
    let template = load_template(pipeline, &args.template).await?;

    let seo = match (args.description, args.keywords, args.tags) {
        (Some(description), Some(keywords), Some(filter_tags)) => SeoMetadata {
            description,
            keywords,
            filter_tags,
        },
        (description, keywords, filter_tags) => {
            let generated = pipeline.metadata(&args.title).await?;
            SeoMetadata {
                description: description.unwrap_or(generated.description),
                keywords: keywords.unwrap_or(generated.keywords),
                filter_tags: filter_tags.unwrap_or(generated.filter_tags),
            }
        }
    };

    let published = pipeline
        .publish(PublishRequest {
            template,
            story_title: args.title,
            seo,
            content_type: args.content_type,
            language: args.lang,
            category: args.category,
            image_url: args.image_url,
            cover_image_url: args.cover_url,
        })
        .await?;

    if let Some(path) = &args.bundle {
        StoryBundle::new(&published.urls.slug_nano, &published.html, &published.metadata)
            .write_to(path)
            .with_context(|| format!("write bundle '{}'", path.display()))?;
    }

    let summary = serde_json::json!({
        "story_url": published.urls.canonical_url,
        "html_url": published.html_url,
        "metadata_url": published.metadata_url,
        "slug": published.urls.slug_nano,
    });
    write_json(None, &summary)
}

fn cmd_bundle(args: BundleArgs) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(&args.html)
        .with_context(|| format!("read html '{}'", args.html.display()))?;
    let raw = std::fs::read_to_string(&args.metadata)
        .with_context(|| format!("read metadata '{}'", args.metadata.display()))?;
    let metadata: Value = serde_json::from_str(&raw)
        .with_context(|| format!("parse metadata '{}'", args.metadata.display()))?;

    let stem = match args.name {
        Some(name) => name,
        None => args
            .html
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "story".to_string()),
    };

    let out = args.out.unwrap_or_else(|| AppPaths::new().bundle_file(&stem));
    StoryBundle::new(&stem, &html, &metadata).write_to(&out)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// I/O helpers
// ---------------------------------------------------------------------------

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read stdin")?;
            Ok(buf)
        }
    }
}

fn read_index(path: Option<&Path>, schema: StageSchema) -> anyhow::Result<SlideIndex> {
    let raw: Value = serde_json::from_str(&read_input(path)?).context("parse slide JSON")?;
    let index = codec::decode(&raw, schema);
    log::info!("Read {} slide(s) as {schema}", index.len());
    Ok(index)
}

async fn load_template(pipeline: &StoryPipeline, source: &str) -> anyhow::Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return Ok(pipeline.fetch_template(source).await?);
    }
    let path = match Path::new(source) {
        p if p.exists() => p.to_path_buf(),
        _ => AppPaths::new().template(source),
    };
    std::fs::read_to_string(&path).with_context(|| format!("read template '{}'", path.display()))
}

fn write_json<T: serde::Serialize + ?Sized>(path: Option<&Path>, value: &T) -> anyhow::Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    write_output(path, &text)
}

fn write_output(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
