use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sha2::Digest as _;

use overlayer::{
    Caption, CaptionPolicy, CommandCaptionSource, DesignSession, DesignType, FontFamily,
    GenerateRequest, OverlayConfig, Placement, RenderRequest, Rgb8, StyleConfig, Tone,
};

#[derive(Parser, Debug)]
#[command(name = "overlayer", version)]
struct Cli {
    /// Log debug details to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw a caption over an image and write a JPEG.
    Render(RenderArgs),
    /// Print the caption prompt for a topic.
    Prompt(PromptArgs),
    /// Print which font each family resolves to.
    Fonts(FontsArgs),
}

#[derive(Parser, Debug)]
struct PromptArgs {
    /// What the caption is about.
    #[arg(long)]
    topic: String,

    /// meme | event_poster | social_media_slogan
    #[arg(long, default_value = "meme")]
    design_type: DesignType,

    /// funny_humorous | sarcastic_snarky | professional_clean | inspirational_epic | gen_z_slang
    #[arg(long, default_value = "funny_humorous")]
    tone: Tone,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image (JPEG or PNG).
    #[arg(long)]
    image: PathBuf,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,

    /// Caption text to draw.
    #[arg(long, conflicts_with_all = ["topic", "caption_cmd"], required_unless_present = "topic")]
    caption: Option<String>,

    /// Generate the caption for this topic with `--caption-cmd`.
    #[arg(long, requires = "caption_cmd")]
    topic: Option<String>,

    /// Design type used for the generation prompt.
    #[arg(long, default_value = "meme")]
    design_type: DesignType,

    /// Tone used for the generation prompt.
    #[arg(long, default_value = "funny_humorous")]
    tone: Tone,

    /// Caption generator: program and arguments. Reads the prompt on stdin, prints the caption.
    #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "PROG [ARGS]...")]
    caption_cmd: Vec<String>,

    /// meme | modern | elegant
    #[arg(long, default_value = "meme")]
    family: FontFamily,

    /// Text color as #RRGGBB.
    #[arg(long, default_value = "#ffffff")]
    color: Rgb8,

    /// Horizontal position, percent of the free width.
    #[arg(long, default_value_t = 50.0)]
    x: f32,

    /// Top of the first line, percent of the image height.
    #[arg(long, default_value_t = 75.0)]
    y: f32,

    /// Font size, percent of the image height.
    #[arg(long, default_value_t = 8.0)]
    size: f32,

    /// Uppercase the caption (defaults to the family's policy).
    #[arg(long, action = clap::ArgAction::Set)]
    uppercase: Option<bool>,

    /// Disable the outline.
    #[arg(long)]
    no_stroke: bool,

    /// Shadow offset as a fraction of the font size; 0 disables it.
    #[arg(long)]
    shadow: Option<f32>,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Prompt(args) => cmd_prompt(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<OverlayConfig> {
    let cfg = match path {
        Some(p) => OverlayConfig::load(p)?,
        None => OverlayConfig::default(),
    };
    Ok(cfg.with_env_overrides())
}

fn cmd_prompt(args: PromptArgs) -> anyhow::Result<()> {
    let prompt = overlayer::CaptionPrompt::new(args.design_type, &args.topic, args.tone)?;
    println!("{prompt}");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let session = DesignSession::new(&cfg)?;

    let image = std::fs::read(&args.image)
        .with_context(|| format!("read image '{}'", args.image.display()))?;

    let mut style = StyleConfig::for_family(args.family, args.color);
    if args.no_stroke {
        style = style.with_stroke(false);
    }
    if let Some(ratio) = args.shadow {
        style = style.with_shadow_offset_ratio(ratio);
    }
    let placement = Placement::new(args.x, args.y, args.size)?;
    let policy = match args.uppercase {
        Some(uppercase) => CaptionPolicy { uppercase },
        None => CaptionPolicy::for_family(args.family),
    };

    let resp = match (args.caption, args.topic) {
        (Some(text), _) => session.render(&RenderRequest {
            image,
            caption: Caption::new(text)?,
            style,
            placement,
            policy,
            requested_by: None,
        })?,
        (None, Some(topic)) => {
            let (program, rest) = args
                .caption_cmd
                .split_first()
                .context("--topic needs --caption-cmd")?;
            let source = CommandCaptionSource::new(program.as_str(), rest.iter().cloned());
            let req = GenerateRequest {
                design_type: args.design_type,
                topic,
                tone: args.tone,
                requested_by: None,
            };
            session.create(&req, &source, image, style, placement, policy)?
        }
        (None, None) => anyhow::bail!("either --caption or --topic is required"),
    };

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &resp.jpeg)
        .with_context(|| format!("write jpeg '{}'", args.out.display()))?;

    if resp.font_fallback {
        eprintln!("note: {} font unavailable, used a fallback", args.family);
    }
    println!("caption: {}", resp.caption);
    println!("size:    {}x{}", resp.width, resp.height);
    println!("lines:   {}", resp.line_count);
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let book = cfg.font_book();

    for family in FontFamily::ALL {
        let font = book
            .font_for(family)
            .with_context(|| format!("resolve font for '{family}'"))?;
        println!("{family}:");
        println!("  asset:   {}", book.asset_path(family).display());
        println!("  origin:  {}", font.origin);
        println!("  family:  {}", font.family_name);
        println!("  sha256:  {}", sha256_hex(&font.bytes));
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}
