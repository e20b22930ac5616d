use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use progressa::foundation::core::Viewport;
use progressa::kernel::{KernelDomain, SortPolicy, generate};
use progressa::{
    CpuBackend, CpuBackendOpts, ProgressiveRenderer, RenderSettings, ScenePreset, StaticCapabilities,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "progressa", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Progressively render a built-in scene and write the result as a PNG.
    Render(RenderArgs),
    /// Print a generated sample kernel as JSON.
    Kernel(KernelArgs),
    /// Print the default settings as JSON.
    Settings,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Scene to render.
    #[arg(long, value_enum, default_value_t = PresetChoice::ShadowStudy)]
    preset: PresetChoice,

    /// Image width in pixels.
    #[arg(long, default_value_t = 320)]
    width: u32,

    /// Image height in pixels.
    #[arg(long, default_value_t = 240)]
    height: u32,

    /// Number of paints to accumulate.
    #[arg(long, default_value_t = 32)]
    paints: u32,

    /// Settings JSON; missing fields take their defaults.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Seed for masks, ambient occlusion and random sampling.
    #[arg(long)]
    seed: Option<u64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct KernelArgs {
    /// Requested number of samples.
    #[arg(long, default_value_t = 16)]
    count: usize,

    /// Target domain.
    #[arg(long, value_enum, default_value_t = DomainChoice::Disc)]
    domain: DomainChoice,

    /// Ordering after index 0.
    #[arg(long, value_enum, default_value_t = SortChoice::Radius)]
    sort: SortChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetChoice {
    TransparencyTest,
    ShadowStudy,
    FocusRow,
}

impl From<PresetChoice> for ScenePreset {
    fn from(p: PresetChoice) -> Self {
        match p {
            PresetChoice::TransparencyTest => Self::TransparencyTest,
            PresetChoice::ShadowStudy => Self::ShadowStudy,
            PresetChoice::FocusRow => Self::FocusRow,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DomainChoice {
    Square,
    Disc,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortChoice {
    Radius,
    Shuffle,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Kernel(args) => cmd_kernel(args),
        Command::Settings => {
            println!("{}", RenderSettings::default().to_json_pretty()?);
            Ok(())
        }
    }
}

fn read_settings(path: &Path) -> anyhow::Result<RenderSettings> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read settings '{}'", path.display()))?;
    RenderSettings::from_json(&json).with_context(|| format!("parse settings '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    if args.width == 0 || args.height == 0 {
        anyhow::bail!("image size must be non-zero, got {}x{}", args.width, args.height);
    }

    let scene = ScenePreset::from(args.preset).build();
    let mut settings = match &args.settings {
        Some(path) => read_settings(path)?,
        None => RenderSettings::default(),
    };
    scene.apply_to(&mut settings);

    let mut caps = StaticCapabilities::new(Viewport::sized(args.width, args.height));
    caps.camera = scene.camera;
    caps.projection = scene.projection();

    let mut renderer = match args.seed {
        Some(seed) => ProgressiveRenderer::with_seed(settings, seed),
        None => ProgressiveRenderer::new(settings),
    };
    let mut backend = CpuBackend::new(CpuBackendOpts::default());

    tracing::info!(scene = %scene.name, paints = args.paints, "rendering");
    for _ in 0..args.paints.max(1) {
        renderer
            .paint(&caps, &mut backend, &scene.primitives)
            .context("paint")?;
    }
    tracing::info!(
        frame = renderer.frame_state().frame,
        timings = %renderer.perf().summary(),
        "accumulated"
    );

    let frame = renderer.display().context("renderer produced no image")?;
    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.to_rgba8_top_down(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;
    tracing::info!(out = %args.out.display(), "wrote image");
    Ok(())
}

fn cmd_kernel(args: KernelArgs) -> anyhow::Result<()> {
    let domain = match args.domain {
        DomainChoice::Square => KernelDomain::Square,
        DomainChoice::Disc => KernelDomain::UNIT_DISC,
    };
    let sort = match args.sort {
        SortChoice::Radius => SortPolicy::RadiusAscending,
        SortChoice::Shuffle => SortPolicy::RandomShuffle,
    };
    let kernel = generate(args.count, domain, sort);
    println!(
        "{}",
        serde_json::to_string_pretty(&kernel).context("serialize kernel")?
    );
    Ok(())
}
