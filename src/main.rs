mod config;
mod error;
mod geometry;
mod image;
mod lsystem;
mod maths;
mod raster;
mod render;
mod scene;
mod shading;
mod shapes;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use config::Configuration;
use error::{EngineError, EngineResult};

/// Name of the fallback file read line-by-line for paths when no path
/// arguments are given, per spec.md §6.
const FILELIST_NAME: &str = "filelist";

/// Offline 3D rasterizer and 2D L-system renderer. Each argument is an
/// `.ini` scene description; a BMP is written alongside it. With no
/// arguments, paths are instead read line-by-line from a file named
/// `filelist` in the current directory.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Scene configuration files to render.
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let files = if cli.files.is_empty() {
        match read_filelist(Path::new(FILELIST_NAME)) {
            Ok(paths) => paths,
            Err(e) => {
                error!("no paths given and failed to read '{FILELIST_NAME}': {e}");
                return ExitCode::from(1);
            }
        }
    } else {
        cli.files
    };

    if files.is_empty() {
        error!("no input files given");
        return ExitCode::from(1);
    }

    let mut worst = ExitCode::SUCCESS;
    for path in &files {
        info!("rendering {}", path.display());
        if let Err(e) = render_file(path) {
            error!("{}: {e}", path.display());
            worst = exit_code_for(&e);
        }
    }
    worst
}

fn read_filelist(path: &Path) -> EngineResult<Vec<PathBuf>> {
    use std::io::BufRead;
    let reader = BufReader::new(File::open(path)?);
    Ok(reader
        .lines()
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect())
}

fn render_file(path: &Path) -> EngineResult<()> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let reader = BufReader::new(File::open(path)?);
    let conf = Configuration::parse(reader)?;

    let general = conf.section("General")?;
    let kind = general.get("type")?.as_str().to_string();

    let img = match kind.as_str() {
        "IntroColorRectangle" => config::intro::color_rectangle(&conf)?,
        "IntroBlocks" => config::intro::blocks(&conf)?,
        "IntroLines" => config::intro::lines(&conf)?,
        "2DLSystem" => {
            let size = general.get("size")?.as_u32()?;
            error::checked_image_pixels(size as usize, size as usize)?;
            config::render_2d_lsystem(&conf, base_dir)?
        }
        "Wireframe" | "ZBufferedWireframe" | "ZBuffering" | "LightedZBuffering" => {
            let size = general.get("size")?.as_u32()?;
            error::checked_image_pixels(size as usize, size as usize)?;
            let lit = kind == "LightedZBuffering";
            let scene = config::build_scene(&conf, base_dir, lit)?;
            if scene.figures.is_empty() && scene.lines.is_empty() {
                warn!("{}: scene has no figures", path.display());
            }
            match kind.as_str() {
                "Wireframe" => render::render_wireframe(&scene, false),
                "ZBufferedWireframe" => render::render_wireframe(&scene, true),
                _ => render::render(&scene),
            }
        }
        other => return Err(EngineError::Config(format!("unknown render type '{other}'"))),
    };

    let out_path = path.with_extension("bmp");
    let file = File::create(&out_path)?;
    img.write_bmp(std::io::BufWriter::new(file))?;
    info!("wrote {}", out_path.display());
    Ok(())
}

/// Per spec.md §6: exit 1 on any per-file failure, except out-of-memory
/// which gets its own code 100.
fn exit_code_for(e: &EngineError) -> ExitCode {
    match e {
        EngineError::OutOfMemory(_) => ExitCode::from(100),
        EngineError::Config(_) | EngineError::Parse(_) | EngineError::Io(_) => ExitCode::from(1),
    }
}
