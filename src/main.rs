use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;

use hala_rig::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "hala-rig")]
#[command(version)]
#[command(about = "Extract the skeleton (TGF) and skinning weights (DMAT) of a glTF scene")]
struct CliArgs {
  /// The glTF or GLB scene to read.
  input: PathBuf,

  /// The output path. Its extension is replaced by .tgf and .dmat.
  output: PathBuf,

  /// Replace existing output files.
  #[arg(long)]
  overwrite: bool,
}

fn main() -> anyhow::Result<()> {
  env_logger::init();

  let args = CliArgs::parse();
  log::trace!("Starting with args: {:?}", args);

  let (tgf_path, dmat_path) = output_paths(&args.output, args.overwrite)?;

  let scene = HalaScene::load(&args.input)
    .with_context(|| format!("Loading \"{}\" failed", args.input.display()))?;
  log::info!("Loaded: {}", args.input.display());

  let rig = HalaRig::extract(&scene)
    .with_context(|| format!("Extracting the rig of \"{}\" failed", args.input.display()))?;
  if rig.is_empty() {
    log::warn!("\"{}\" has no skinned meshes. Nothing saved.", args.input.display());
    return Ok(());
  }

  save_outputs(&rig, &tgf_path, &dmat_path)
}

/// Get the TGF and DMAT paths of the output and check they may be written.
/// param output: The output path, its extension is replaced.
/// param overwrite: Whether existing files may be replaced.
/// return: The TGF and DMAT paths.
fn output_paths(output: &Path, overwrite: bool) -> anyhow::Result<(PathBuf, PathBuf)> {
  let tgf_path = output.with_extension("tgf");
  let dmat_path = output.with_extension("dmat");
  if !overwrite {
    for path in [&tgf_path, &dmat_path] {
      if path.exists() {
        bail!("Output path \"{}\" exists. Not clobbering, pass --overwrite to replace it.", path.display());
      }
    }
  }
  Ok((tgf_path, dmat_path))
}

/// Save the skeleton and the weights of the rig.
/// The two outputs are independent, a failure of one does not skip the other.
/// param rig: The rig.
/// param tgf_path: The TGF path.
/// param dmat_path: The DMAT path.
/// return: The result, an error if any output could not be saved.
fn save_outputs(rig: &HalaRig, tgf_path: &Path, dmat_path: &Path) -> anyhow::Result<()> {
  let mut failures = 0;
  match rig.save_tgf(tgf_path) {
    Ok(()) => log::info!("Saved: {}", tgf_path.display()),
    Err(err) => {
      log::error!("Could not save the skeleton: {:#}", anyhow::Error::from(err));
      failures += 1;
    },
  }
  if rig.weights.is_some() {
    match rig.save_dmat(dmat_path) {
      Ok(()) => log::info!("Saved: {}", dmat_path.display()),
      Err(err) => {
        log::error!("Could not save the weights: {:#}", anyhow::Error::from(err));
        failures += 1;
      },
    }
  } else {
    log::warn!("The skinned meshes have no vertices. \"{}\" not saved.", dmat_path.display());
  }

  if failures > 0 {
    bail!("{} of the outputs could not be saved.", failures);
  }
  Ok(())
}
