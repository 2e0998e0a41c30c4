use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use palette_card::{
    AspectRatio, BLACK_BORDER, CardOptions, Color, OutputKind, Sampling, SwatchShape, WHITE_BORDER,
    WallpaperOptions, decode_image, encode_png, make_card, output_file_name, parse_hex,
};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Compose palette cards (photo + dominant color swatches) from images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of swatches: 5, 8 or 10
    #[arg(short = 'k', long, default_value_t = 5)]
    colors: usize,

    /// Pick five swatches spread over a ten-color clustering
    #[arg(short, long)]
    wide: bool,

    /// Swatch shape
    #[arg(long, value_enum, default_value_t = Shape::Rectangle)]
    shape: Shape,

    /// Card background: "white", "black" or a hex color
    #[arg(short, long, default_value = "white")]
    border: String,

    /// k-means seed
    #[arg(long, default_value_t = palette_card::DEFAULT_SEED)]
    seed: u64,

    /// Also write a wallpaper: "desktop" (16:9), "mobile" (9:19.5) or W:H
    #[arg(long)]
    wallpaper: Option<AspectRatio>,

    /// Palette index used to fill the wallpaper padding
    #[arg(long, default_value_t = 0)]
    fill: usize,

    /// Output directory (defaults to each input's directory)
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Print palettes as JSON on stdout (file paths are logged to stderr)
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Shape {
    Rectangle,
    Ellipse,
}

impl From<Shape> for SwatchShape {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Rectangle => SwatchShape::Rectangle,
            Shape::Ellipse => SwatchShape::Ellipse,
        }
    }
}

fn border_color(name: &str) -> Result<Color> {
    match name.trim().to_ascii_lowercase().as_str() {
        "white" => Ok(WHITE_BORDER),
        "black" => Ok(BLACK_BORDER),
        _ => Ok(parse_hex(name)?),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palette_card=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let options = CardOptions {
        swatch_count: args.colors,
        sampling: if args.wide { Sampling::Wide } else { Sampling::Narrow },
        shape: args.shape.into(),
        background: border_color(&args.border).context("invalid --border")?,
        seed: args.seed,
        wallpaper: args.wallpaper.map(|ratio| WallpaperOptions { ratio, fill_index: args.fill }),
    };

    let mut report = serde_json::Map::new();

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let img = decode_image(&bytes).with_context(|| format!("decoding {}", input.display()))?;
        let card = make_card(&img, &options).context("palette card processing failed")?;

        let dir = match &args.out_dir {
            Some(dir) => dir.clone(),
            None => input.parent().map(PathBuf::from).unwrap_or_default(),
        };
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(&dir)?;
        }
        let name = input.file_name().unwrap_or_default().to_string_lossy();

        let card_path = dir.join(output_file_name(&name, OutputKind::Card));
        fs::write(&card_path, encode_png(&card.canvas)?)?;
        info!(path = %card_path.display(), "saved card");

        if let Some(wp) = &card.wallpaper {
            let wp_path = dir.join(output_file_name(&name, OutputKind::Wallpaper(wp.ratio)));
            fs::write(&wp_path, encode_png(&wp.image)?)?;
            info!(path = %wp_path.display(), "saved wallpaper");
        }

        report.insert(input.display().to_string(), serde_json::json!(card.palette.hex()));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
