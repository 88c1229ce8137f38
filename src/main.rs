mod config;
mod script;

use std::fs;
use std::path::{Path, PathBuf};

use canvas::catalog;
use canvas::engine::EngineCore;
use canvas::export::{self, ExportError};
use canvas::layout::DeckInput;
use canvas::record::DrawingRecord;
use canvas::scale::Viewport;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::script::{Script, ScriptError};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("script failed: {0}")]
    Script(#[from] ScriptError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

#[derive(Parser, Debug)]
#[command(name = "deckdraw", about = "Deck diagram generator and annotation replayer")]
struct Cli {
    /// Directory that receives full.png, thumb.png and record.json.
    #[arg(long, env = "DECKDRAW_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    #[arg(long, env = "DECKDRAW_WIDTH", default_value_t = 800.0)]
    width: f64,

    #[arg(long, env = "DECKDRAW_HEIGHT", default_value_t = 600.0)]
    height: f64,

    /// Device pixels per canvas unit in the exported PNG.
    #[arg(long, env = "DECKDRAW_DENSITY", default_value_t = 2.0)]
    density: f64,

    /// Edge of the square thumbnail box.
    #[arg(long, env = "DECKDRAW_THUMB_SIZE", default_value_t = 200)]
    thumb_size: u32,

    /// TrueType/OpenType font for labels, replacing the bundled DejaVu Sans.
    #[arg(long, env = "DECKDRAW_FONT")]
    font: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out a deck from a measurements file.
    Generate { input: PathBuf },
    /// Replay an annotation or builder script.
    Replay {
        script: PathBuf,
        /// Background photo painted under the annotations.
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// List the builder component catalog.
    Catalog,
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = config::editor_config_from_env();
    let viewport = Viewport::new(cli.width, cli.height);

    let mut core = match &cli.command {
        Command::Catalog => {
            print_catalog();
            return Ok(());
        }
        Command::Generate { input } => {
            let input: DeckInput = serde_json::from_str(&read_text(input)?)?;
            EngineCore::auto_generated(&input, viewport, config)
        }
        Command::Replay { script, photo } => {
            let script = Script::parse(&read_text(script)?)?;
            let mut core = EngineCore::new(script.mode, viewport, config);
            if let Some(photo) = photo {
                core.begin_photo_load();
                core.finish_photo_load(&read_bytes(photo)?);
            }
            script::run(&mut core, &script.steps)?;
            core
        }
    };

    if let Some(font) = &cli.font {
        core.load_font(read_bytes(font)?)?;
    }
    write_outputs(&mut core, &cli)
}

fn write_outputs(core: &mut EngineCore, cli: &Cli) -> Result<(), AppError> {
    fs::create_dir_all(&cli.out_dir).map_err(|source| AppError::Io { path: cli.out_dir.clone(), source })?;

    let full = core.export(cli.density)?;
    let thumb = export::thumbnail(&full, cli.thumb_size, cli.thumb_size)?;
    write_file(&cli.out_dir.join("full.png"), &full)?;
    write_file(&cli.out_dir.join("thumb.png"), &thumb)?;

    let record = DrawingRecord::new(core.mode(), core.viewport, core.editor.scale, full, thumb);
    write_file(&cli.out_dir.join("record.json"), record.to_json()?.as_bytes())?;

    info!(
        out_dir = %cli.out_dir.display(),
        id = %record.id,
        entities = core.scene.len(),
        mode = ?record.mode,
        "drawing saved"
    );
    Ok(())
}

fn print_catalog() {
    for t in catalog::catalog() {
        println!("{:<10} {:>6.0} x {:<6.0} {:<22} {}", t.label, t.width, t.height, t.material, t.color.to_hex());
    }
}

fn read_text(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::Io { path: path.to_owned(), source })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, AppError> {
    fs::read(path).map_err(|source| AppError::Io { path: path.to_owned(), source })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    fs::write(path, bytes).map_err(|source| AppError::Io { path: path.to_owned(), source })
}
