use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cardskin", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a single card face as a PNG.
    Face(FaceArgs),
    /// Lay out a row of cards, hover one, and render the board as a PNG.
    Board(BoardArgs),
    /// Rasterize a captured DOM card element as a PNG.
    Snapshot(SnapshotArgs),
}

#[derive(Parser, Debug)]
struct FaceArgs {
    /// Card model JSON.
    #[arg(long)]
    model: PathBuf,

    /// Artwork image (PNG/JPEG).
    #[arg(long)]
    art: Option<PathBuf>,

    /// Font file for card text; a system sans-serif is used otherwise.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Pixels per logical unit.
    #[arg(long, default_value_t = 2.0)]
    scale: f64,

    /// Engine options JSON (card size, corner radius).
    #[arg(long)]
    options: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BoardArgs {
    /// JSON array of card models.
    #[arg(long)]
    models: PathBuf,

    /// Directory artwork URLs are resolved against. Defaults to the models file's directory.
    #[arg(long)]
    art_root: Option<PathBuf>,

    /// Index of the card under the pointer.
    #[arg(long)]
    hover: Option<usize>,

    /// Frames to simulate before rendering.
    #[arg(long, default_value_t = 30)]
    ticks: u32,

    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long)]
    options: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SnapshotArgs {
    /// Captured element JSON.
    #[arg(long)]
    dom: PathBuf,

    #[arg(long, default_value_t = 2.0)]
    scale: f64,

    #[arg(long)]
    font: Option<PathBuf>,

    /// Print the generated XHTML markup to stdout.
    #[arg(long)]
    print_markup: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Face(args) => cmd_face(args),
        Command::Board(args) => cmd_board(args),
        Command::Snapshot(args) => cmd_snapshot(args),
    }
}

fn read_to_string(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {what} '{}'", path.display()))
}

fn read_font(path: Option<&Path>) -> anyhow::Result<Option<Vec<u8>>> {
    path.map(|p| std::fs::read(p).with_context(|| format!("read font '{}'", p.display())))
        .transpose()
}

fn load_options(path: Option<&Path>) -> anyhow::Result<cardskin::EngineOptions> {
    let opts = match path {
        Some(p) => cardskin::EngineOptions::from_path(p)?,
        None => cardskin::EngineOptions::default(),
    };
    Ok(opts.with_env_overrides())
}

fn write_png(out: &Path, rgba8: &[u8], width: u32, height: u32) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        out,
        rgba8,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_face(args: FaceArgs) -> anyhow::Result<()> {
    let model = cardskin::CardVisualModel::from_json_str(&read_to_string(&args.model, "model")?)?;
    let options = load_options(args.options.as_deref())?;
    options.validate()?;

    let art = match &args.art {
        Some(p) => {
            let bytes =
                std::fs::read(p).with_context(|| format!("read artwork '{}'", p.display()))?;
            Some(cardskin::decode_image(&bytes)?)
        }
        None => None,
    };

    let mut composer = cardskin::CardComposer::new(
        options.card_size()?,
        read_font(args.font.as_deref())?,
        options.corner_radius,
    );
    if !composer.has_text() {
        tracing::warn!("no usable font; composing without text");
    }

    let texture = composer.compose(&model, args.scale, art.as_ref())?;
    write_png(
        &args.out,
        &texture.to_straight_rgba8(),
        texture.width(),
        texture.height(),
    )
}

fn cmd_board(args: BoardArgs) -> anyhow::Result<()> {
    let models =
        cardskin::CardVisualModel::list_from_json_str(&read_to_string(&args.models, "models")?)?;
    if models.is_empty() {
        anyhow::bail!("'{}' contains no card models", args.models.display());
    }
    let options = load_options(args.options.as_deref())?;

    let gap = (options.card_width * 0.15).ceil();
    let margin = options.card_height * 0.25;
    let width = (models.len() as f64) * (options.card_width + gap) - gap + margin * 2.0;
    let height = options.card_height + margin * 2.0;

    let art_root = args.art_root.clone().unwrap_or_else(|| {
        args.models
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let mut builder = cardskin::CardEngine::builder()
        .renderer(cardskin::CpuRenderer::new())
        .options(options.clone())
        .art_loader(cardskin::FsArtLoader::inline(art_root))
        .viewport(width.ceil() as u32, height.ceil() as u32);
    if let Some(font) = read_font(args.font.as_deref())? {
        builder = builder.font_bytes(font);
    }
    let mut engine = builder.build()?;
    engine
        .scene_mut()
        .set_background(cardskin::Rgba8::opaque(18, 20, 28));

    let mut ids = Vec::with_capacity(models.len());
    for (i, model) in models.into_iter().enumerate() {
        let x = margin + (i as f64) * (options.card_width + gap);
        let layout = cardskin::CardLayout::new(x, margin, options.card_width, options.card_height)
            .with_z_index(i as i32);
        let id = engine.create_card(
            model,
            cardskin::CreateCardOpts {
                dom_source: None,
                layout: Some(layout),
            },
        )?;
        ids.push(id);
    }

    if let Some(i) = args.hover {
        let id = *ids
            .get(i)
            .with_context(|| format!("--hover {i} is out of range ({} cards)", ids.len()))?;
        engine.set_pointer_local(
            id,
            options.card_width * 0.8,
            options.card_height * 0.2,
            true,
        );
    }

    let dt = 1.0 / 60.0;
    for frame in 0..=args.ticks {
        engine.frame(f64::from(frame) * dt);
    }

    let stats = engine.stats();
    tracing::info!(
        cards = stats.cards_created,
        jobs = stats.jobs_run,
        large = stats.large_textures_built,
        art_loads = stats.art_loads_started,
        art_failures = stats.art_load_failures,
        "board simulated"
    );

    let frame = engine.render()?;
    write_png(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
    )
}

fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let element = cardskin::DomElement::from_json_str(&read_to_string(&args.dom, "dom capture")?)?;
    let markup = cardskin::build_markup(&element)
        .context("captured element has no layout box; nothing to snapshot")?;
    if args.print_markup {
        println!("{}", markup.markup);
    }

    let markup = Arc::new(markup);
    let doc = cardskin::SnapshotDocument::new(&markup, markup.width, markup.height, args.scale);
    let mut rasterizer = match read_font(args.font.as_deref())? {
        Some(bytes) => cardskin::ResvgSnapshotRasterizer::with_font_bytes(bytes),
        None => cardskin::ResvgSnapshotRasterizer::new(),
    };
    let texture = cardskin::rasterize_snapshot(&mut rasterizer, &doc)?;
    write_png(
        &args.out,
        &texture.to_straight_rgba8(),
        texture.width(),
        texture.height(),
    )
}
