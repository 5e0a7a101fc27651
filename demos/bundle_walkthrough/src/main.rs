//! Bundle Walkthrough Example
//!
//! Loads a scene manifest, then drives a few bundle operations on the
//! simulated host: a deferred-activation load, a guarded unload and a
//! single-mode switch.
//!
//! Run with `RUST_LOG=debug` to see the host and operations log.

use bundleflow_core::{
    BundleOperation, EnvironmentQuery, LoadRequest, SceneBundle, SceneId, UnloadRequest,
};
use bundleflow_host::{HostConfig, SceneCatalog, SceneCost, SimHost};
use bundleflow_script::{Loader, Manifest};
use log::info;
use std::error::Error;

const MANIFEST: &str = include_str!("../assets/manifest.ron");
const MAX_TICKS: u64 = 200;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("=== Bundleflow Walkthrough ===\n");

    // Load the manifest from the first argument, or the bundled one
    let mut loader = Loader::new();
    match std::env::args().nth(1) {
        Some(path) => loader.load_file(&path)?,
        None => loader.load_str(MANIFEST)?,
    }
    let manifest = loader.finish()?;
    println!(
        "Manifest: {} scenes, {} bundles",
        manifest.scenes.len(),
        manifest.bundles.len()
    );

    let mut host = build_host(&manifest)?;
    print_state(&host);

    // Load the forest bundle, holding the first scene at the activation point
    let forest = manifest
        .get_bundle("forest")
        .ok_or("manifest has no forest bundle")?;
    let mut load = LoadRequest::new(forest.to_bundle()?)
        .with_params(forest.params)
        .with_activate_first(forest.activate_first)
        .with_allow_first_activation(false)
        .on_scene_loaded(|scene| println!("  loaded {}", scene))
        .on_completed(|bundle| println!("  {} complete", bundle))
        .start(&mut host);

    println!("\nLoading forest (first activation deferred)...");
    while !load.poll(&mut host) {
        if load.first_scene_ready() && !load.allow_first_activation() {
            println!("  first scene ready, allowing activation");
            load.set_allow_first_activation(true);
        }
        host.tick();
        println!(
            "  tick {:>3}: {:>5.1}%",
            host.current_tick(),
            load.progress() * 100.0
        );
        if host.current_tick() >= MAX_TICKS {
            return Err("forest load did not finish".into());
        }
    }
    print_state(&host);

    // Unload everything; the host keeps at least one scene open
    let everything: Vec<SceneId> = host.open_scenes().to_vec();
    let mut unload = UnloadRequest::new(SceneBundle::new("everything", everything))
        .on_scene_unloaded(|scene| println!("  unloaded {}", scene))
        .start(&mut host);

    println!("\nUnloading every open scene...");
    let ticks = host.drive(&mut unload, MAX_TICKS)?;
    println!(
        "  finished in {} ticks, {} scenes unloaded, stopped early: {}",
        ticks,
        unload.scenes_processed(),
        unload.stopped_early()
    );
    print_state(&host);

    // Switch to the cave in single mode
    let cave = manifest
        .get_bundle("cave")
        .ok_or("manifest has no cave bundle")?;
    let mut switch = LoadRequest::new(cave.to_bundle()?)
        .with_params(cave.params)
        .with_activate_first(cave.activate_first)
        .start(&mut host);

    println!("\nSwitching to cave...");
    let ticks = host.drive(&mut switch, MAX_TICKS)?;
    println!("  finished in {} ticks", ticks);
    print_state(&host);

    println!("\n=== Walkthrough Complete ===");
    Ok(())
}

/// Build a host from the manifest, opening the scenes marked as open
fn build_host(manifest: &Manifest) -> bundleflow_host::Result<SimHost> {
    let config = HostConfig::default();
    let mut catalog = SceneCatalog::new();
    for def in manifest.scenes.values() {
        let cost = SceneCost::new(
            def.load_ticks.unwrap_or(config.default_load_ticks()),
            def.unload_ticks.unwrap_or(config.default_unload_ticks()),
        );
        catalog.insert(def.id.clone(), cost);
    }

    let mut host = SimHost::with_config(config, catalog);
    for def in manifest.initially_open() {
        info!("opening {} at startup", def.id);
        host.open_scene(def.id.clone())?;
    }
    Ok(host)
}

fn print_state(host: &SimHost) {
    let open: Vec<&str> = host.open_scenes().iter().map(|s| s.as_str()).collect();
    println!(
        "State: open [{}], active {}",
        open.join(", "),
        host.active_scene()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
}
