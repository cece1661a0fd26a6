// SPDX-License-Identifier: MIT OR Apache-2.0
//! Export and apply commands.

use crate::cli::Invocation;
use crate::error::{AppError, Result};
use ordoplay_interchange_graph::codec::{decode_bundle, encode_bundle};
use ordoplay_interchange_graph::{import_groups, InterchangeConfig, MemoryScene};
use ordoplay_interchange_overrides::{export_bundle, ApplyStats, ExportOptions, OverrideApplier};
use std::fs;
use std::path::Path;

/// Run a parsed invocation
pub fn run(invocation: Invocation) -> Result<()> {
    match invocation {
        Invocation::Export {
            scene,
            out,
            config,
            snapshot_all,
            only_visible,
            collections,
        } => {
            let mut config = load_config(config.as_deref())?;
            if snapshot_all {
                config.extract.snapshot_unknown_only = false;
            }
            let scene = load_scene(&scene)?;
            let options = ExportOptions {
                only_visible,
                target_collections: collections,
            };
            let text = export(&scene, &config, &options)?;
            match out {
                Some(path) => write_file(&path, &text)?,
                None => println!("{text}"),
            }
            Ok(())
        }
        Invocation::Apply {
            scene: scene_path,
            doc,
            config,
            placeholders,
            limit,
            out,
        } => {
            let config = load_config(config.as_deref())?;
            let mut scene = load_scene(&scene_path)?;
            let doc = read_file(&doc)?;
            let stats = apply(&mut scene, &doc, &config, placeholders, limit)?;
            println!("{stats}");
            let out = out.unwrap_or(scene_path);
            write_file(&out, &scene.to_ron()?)?;
            tracing::info!("Wrote scene to {}", out.display());
            Ok(())
        }
    }
}

/// Export a scene as a pretty JSON bundle
pub fn export(
    scene: &MemoryScene,
    config: &InterchangeConfig,
    options: &ExportOptions,
) -> Result<String> {
    let bundle = export_bundle(scene, config, options);
    Ok(serde_json::to_string_pretty(&encode_bundle(&bundle, &config.document))?)
}

/// Import the groups of a JSON document and apply its overrides
pub fn apply(
    scene: &mut MemoryScene,
    doc: &str,
    config: &InterchangeConfig,
    placeholders: bool,
    limit: Option<usize>,
) -> Result<ApplyStats> {
    let value: serde_json::Value = serde_json::from_str(doc)?;
    let (bundle, dropped) = decode_bundle(&value, &config.document);
    if dropped > 0 {
        tracing::warn!("Dropped {} malformed entries", dropped);
    }

    scene.set_dynamic_source_suffix(config.keys.dynamic_source_suffix.as_str());
    import_groups(scene, &bundle.groups, config);

    let take = limit.unwrap_or(bundle.overrides.len()).min(bundle.overrides.len());
    if take < bundle.overrides.len() {
        tracing::info!("Applying the first {} of {} overrides", take, bundle.overrides.len());
    }
    let mut stats = OverrideApplier::new(scene, config)
        .create_placeholders(placeholders)
        .apply_batch(&bundle.overrides[..take]);
    stats.overrides += dropped;
    stats.malformed += dropped;
    Ok(stats)
}

fn load_config(path: Option<&Path>) -> Result<InterchangeConfig> {
    match path {
        Some(path) => Ok(InterchangeConfig::load(path)?),
        None => Ok(InterchangeConfig::default()),
    }
}

fn load_scene(path: &Path) -> Result<MemoryScene> {
    let content = read_file(path)?;
    MemoryScene::from_ron(&content).map_err(|source| AppError::Scene {
        path: path.to_path_buf(),
        source,
    })
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}
