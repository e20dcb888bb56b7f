use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "photostrip", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a strip from a render request JSON and write it as a PNG.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input render request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Directory of .ttf/.otf files to register; the file stem becomes the
    /// font id (e.g. `Lobster.ttf` registers "Lobster").
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Booth configuration JSON; library defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
    }
}

fn read_request_json(path: &Path) -> anyhow::Result<photostrip::RenderRequest> {
    let f = File::open(path).with_context(|| format!("open request '{}'", path.display()))?;
    let r = BufReader::new(f);
    let req: photostrip::RenderRequest =
        serde_json::from_reader(r).with_context(|| "parse render request JSON")?;
    Ok(req)
}

fn read_config_json(path: &Path) -> anyhow::Result<photostrip::BoothConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let cfg: photostrip::BoothConfig =
        serde_json::from_reader(r).with_context(|| "parse booth config JSON")?;
    Ok(cfg)
}

fn load_fonts(dir: Option<&Path>) -> anyhow::Result<photostrip::FontLibrary> {
    let mut fonts = photostrip::FontLibrary::new();
    let Some(dir) = dir else {
        return Ok(fonts);
    };

    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read fonts dir '{}'", dir.display()))?
    {
        let path = entry?.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if !matches!(ext.as_deref(), Some("ttf") | Some("otf")) {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        fonts.register_file(id, &path)?;
    }
    Ok(fonts)
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let req = read_request_json(&args.in_path)?;
    let cfg = match &args.config {
        Some(path) => read_config_json(path)?,
        None => photostrip::BoothConfig::default(),
    };
    let fonts = load_fonts(args.fonts_dir.as_deref())?;
    let filters = photostrip::FilterEngine::new(photostrip::FilterBackendKind::Cpu);

    let strip = photostrip::render_strip(&req, &cfg, &fonts, &filters)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &strip.data,
        strip.width,
        strip.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
