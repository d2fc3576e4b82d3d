use clap::{Parser, Subcommand};
use exif_slicer::config::{self, AppConfig, ConfigError, OverlayConfig};
use exif_slicer::imaging::{AspectRatio, BorderWidth, Color, RustBackend, compute_slice_spec};
use exif_slicer::metadata::ExifField;
use exif_slicer::naming::{ARCHIVE_FILENAME, overlay_export_filename_now};
use exif_slicer::output;
use exif_slicer::session::Session;
use std::path::PathBuf;

/// Tile sizing flags shared by `plan` and `slice`.
#[derive(clap::Args, Clone, Copy)]
struct ModeArgs {
    /// Size tiles from the source height, capped at 1350px
    #[arg(long, conflicts_with = "standard")]
    high_res: bool,

    /// Always produce 1080×1350 tiles
    #[arg(long)]
    standard: bool,
}

impl ModeArgs {
    /// Explicit flag wins; otherwise `slices.high_res` decides.
    fn resolve(self, config: &AppConfig) -> bool {
        if self.high_res {
            true
        } else if self.standard {
            false
        } else {
            config.slices.high_res
        }
    }
}

/// Overlay styling flags shared by `overlay` and `sample-preview`.
#[derive(clap::Args, Clone, Default)]
struct StyleArgs {
    /// Border width: thin, medium, thick, polaroid or pixels
    #[arg(long)]
    border: Option<BorderWidth>,

    /// Border colour: white, black, cream, gray or #rrggbb
    #[arg(long)]
    border_color: Option<Color>,

    /// Caption colour: white, black, cream, gray or #rrggbb
    #[arg(long)]
    text_color: Option<Color>,

    /// Caption font size in pixels at preview scale
    #[arg(long)]
    font_size: Option<u32>,

    /// Caption font families, e.g. "Helvetica Neue, sans-serif"
    #[arg(long)]
    font_family: Option<String>,

    /// TrueType/OpenType font file for the caption
    #[arg(long)]
    font: Option<PathBuf>,

    /// Text between caption fields
    #[arg(long)]
    separator: Option<String>,
}

impl StyleArgs {
    /// Override the configured overlay style with whatever flags were given.
    fn apply(self, overlay: &mut OverlayConfig) -> Result<(), ConfigError> {
        if let Some(border) = self.border {
            overlay.set_border_width(border.px())?;
        }
        if let Some(color) = self.border_color {
            overlay.set_border_color(color);
        }
        if let Some(color) = self.text_color {
            overlay.set_text_color(color);
        }
        if let Some(px) = self.font_size {
            overlay.set_font_size(px)?;
        }
        if let Some(family) = self.font_family {
            overlay.set_font_family(family);
        }
        if self.font.is_some() {
            overlay.set_font_path(self.font);
        }
        if let Some(separator) = self.separator {
            overlay.set_separator(separator);
        }
        Ok(())
    }
}

#[derive(Parser)]
#[command(name = "exif-slicer")]
#[command(about = "EXIF viewer, carousel slicer and captioned-border compositor")]
#[command(long_about = "\
EXIF viewer, carousel slicer and captioned-border compositor

Inspect a photograph's EXIF data, cut a panorama into an Instagram carousel,
or frame it in a border with a one-line camera-settings caption.

Carousel output:

  slices/
  ├── slice_00_full_view.jpg       # Whole image centered on one tile (first)
  ├── slice_1_of_4.jpg             # Tiles, left to right
  ├── ...
  └── slice_4_of_4.jpg

  (or a single instagram_slices.zip with --zip)

Tile sizing:
  --high-res   Tile height follows the source (capped at 1350), width 4:5
  --standard   Tiles are always 1080×1350; small images are upscaled
  Without either flag, [slices] high_res from the config decides.

Overlay caption fields (--fields, comma separated):
  FNumber, ExposureTime, ISO, FocalLength, Make, Model, LensModel

Overlay presets:
  --border        thin (25), medium (50), thick (80), polaroid (100) or pixels
  --border-color  white, black, cream or #rrggbb
  --text-color    black, white, gray or #rrggbb

Run 'exif-slicer gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show file information, EXIF fields and GPS map links
    Info {
        file: PathBuf,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how an image would be sliced without rendering anything
    Plan {
        file: PathBuf,
        #[command(flatten)]
        mode: ModeArgs,
    },
    /// Cut an image into carousel tiles plus a full-view tile
    Slice {
        file: PathBuf,
        #[command(flatten)]
        mode: ModeArgs,
        /// Output directory
        #[arg(long, default_value = "slices")]
        out: PathBuf,
        /// Write a single ZIP archive instead of loose files
        #[arg(long)]
        zip: bool,
    },
    /// Frame an image in a border with an EXIF caption
    Overlay {
        file: PathBuf,
        /// Render at preview size instead of full resolution
        #[arg(long)]
        preview: bool,
        /// Caption fields, in order
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<ExifField>>,
        /// Pad to an aspect ratio: square, portrait, story, landscape or W:H
        #[arg(long)]
        aspect: Option<AspectRatio>,
        #[command(flatten)]
        style: StyleArgs,
        /// Output file (defaults to exif-overlay-<unix-ms>.jpg)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render the overlay preview with sample values, no image needed
    SamplePreview {
        #[command(flatten)]
        style: StyleArgs,
        /// Output file
        #[arg(long, default_value = "exif-overlay-sample.jpg")]
        out: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config;
    let load = || config::load_config_or_default(config_path.as_deref());

    match cli.command {
        Command::Info { file, json } => {
            let mut session = open_session(load()?)?;
            let image = session.load_file(&file).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&output::info_json(image))?);
            } else {
                output::print_info(image);
            }
        }
        Command::Plan { file, mode } => {
            let app_config = load()?;
            let high_res = mode.resolve(&app_config);
            let fit = app_config.slices.fit_params();
            let mut session = open_session(app_config)?;
            let image = session.load_file(&file).await?;
            let dims = image.source.dimensions();
            let spec = compute_slice_spec(dims.width, dims.height, high_res, &fit)?;
            output::print_slice_plan(dims, &spec, high_res);
        }
        Command::Slice {
            file,
            mode,
            out,
            zip,
        } => {
            let app_config = load()?;
            let high_res = mode.resolve(&app_config);
            let mut session = open_session(app_config)?;
            session.load_file(&file).await?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_slice_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = session.generate_slices(high_res, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let set = result?;

            std::fs::create_dir_all(&out)?;
            if zip {
                let archive_path = out.join(ARCHIVE_FILENAME);
                let archive = std::fs::File::create(&archive_path)?;
                set.write_archive(archive)?;
                output::print_slice_output(set, &archive_path);
            } else {
                set.write_to_dir(&out)?;
                output::print_slice_output(set, &out);
            }
        }
        Command::Overlay {
            file,
            preview,
            fields,
            aspect,
            style,
            out,
        } => {
            let mut app_config = load()?;
            style.apply(&mut app_config.overlay)?;
            if let Some(fields) = fields {
                app_config.overlay.set_selected_fields(fields)?;
            }
            if aspect.is_some() {
                app_config.overlay.set_aspect_ratio(aspect);
            }
            let mut session = open_session(app_config)?;

            session.load_file(&file).await?;
            let image = if preview {
                session.preview_overlay()?
            } else {
                session.export_overlay()?
            };
            let path = out.unwrap_or_else(|| PathBuf::from(overlay_export_filename_now()));
            std::fs::write(&path, &image.encoded)?;
            output::print_overlay_output(&image, &path, session.backend().font_origin());
        }
        Command::SamplePreview { style, out } => {
            let mut app_config = load()?;
            style.apply(&mut app_config.overlay)?;
            let session = open_session(app_config)?;
            let image = session.preview_overlay()?;
            std::fs::write(&out, &image.encoded)?;
            output::print_overlay_output(&image, &out, session.backend().font_origin());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Build a session whose backend carries the resolved caption font.
fn open_session(config: AppConfig) -> Result<Session<RustBackend>, Box<dyn std::error::Error>> {
    let backend = RustBackend::for_overlay(&config.overlay)?;
    Ok(Session::new(backend, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("exif-slicer").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn overlay_presets_parse_by_name() {
        let cli = parse(&[
            "overlay",
            "pano.jpg",
            "--border",
            "polaroid",
            "--border-color",
            "cream",
            "--text-color",
            "gray",
            "--font-size",
            "20",
            "--separator",
            " | ",
        ]);
        let Command::Overlay { style, .. } = cli.command else {
            panic!("expected overlay command");
        };
        let mut overlay = OverlayConfig::default();
        style.apply(&mut overlay).unwrap();
        assert_eq!(overlay.border_width(), 100);
        assert_eq!(overlay.border_color(), Color::CREAM);
        assert_eq!(overlay.text_color(), Color::GRAY);
        assert_eq!(overlay.font_size(), 20);
        assert_eq!(overlay.separator(), " | ");
        assert_eq!(overlay.font_family(), "Roboto, sans-serif");
    }

    #[test]
    fn sample_preview_takes_style_flags() {
        let cli = parse(&[
            "sample-preview",
            "--border",
            "64px",
            "--border-color",
            "#101010",
            "--font-family",
            "DejaVu Sans",
        ]);
        let Command::SamplePreview { style, .. } = cli.command else {
            panic!("expected sample-preview command");
        };
        let mut overlay = OverlayConfig::default();
        style.apply(&mut overlay).unwrap();
        assert_eq!(overlay.border_width(), 64);
        assert_eq!(overlay.border_color(), Color::rgb(0x10, 0x10, 0x10));
        assert_eq!(overlay.font_family(), "DejaVu Sans");
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let args = ["exif-slicer", "overlay", "pano.jpg", "--border", "huge"];
        assert!(Cli::try_parse_from(args).is_err());
        let args = ["exif-slicer", "overlay", "pano.jpg", "--border-color", "beige"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn style_flags_are_validated_against_config_limits() {
        let style = StyleArgs {
            font_size: Some(0),
            ..StyleArgs::default()
        };
        assert!(style.apply(&mut OverlayConfig::default()).is_err());
        let style = StyleArgs {
            border: Some(BorderWidth(5000)),
            ..StyleArgs::default()
        };
        assert!(style.apply(&mut OverlayConfig::default()).is_err());
    }
}
