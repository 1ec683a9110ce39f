//! Geometry dump tool.
//!
//! Loads a volume tree from a JSON file (or falls back to the built-in
//! sample detector), runs the full sort/ID/channel-map pipeline with the
//! standard strategies, and prints a summary of what came out. Useful to
//! eyeball a new detector description before wiring it into a job.

use anyhow::Context;

use driftkit::{
    samples, ChannelId, GeometryConfig, GeometryCore, StandardChannelMap, StandardSorter,
    VolumeNode,
};

fn main() -> anyhow::Result<()> {
    driftkit::init_logging()?;

    let root = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading volume tree from {path}"))?;
            serde_json::from_str::<VolumeNode>(&text)
                .with_context(|| format!("parsing volume tree from {path}"))?
        }
        None => samples::symmetric_detector(&samples::SampleConfig::default()),
    };

    let config = GeometryConfig {
        detector_name: "sample".into(),
        ..GeometryConfig::default()
    };
    let mut geometry = GeometryCore::load(&config, &root)?;
    geometry.apply_channel_map(&StandardSorter, Box::new(StandardChannelMap::new()))?;

    dump_geometry(&geometry)?;
    Ok(())
}

fn dump_geometry(geometry: &GeometryCore) -> anyhow::Result<()> {
    println!("detector '{}'", geometry.detector_name());
    println!(
        "  {} enclosures, {} modules, {} optical detectors, {} aux detectors",
        geometry.n_enclosures(),
        geometry.total_modules(),
        geometry.n_op_dets(),
        geometry.n_aux_dets(),
    );

    for enclosure in geometry.enclosure_ids() {
        let enclosure_geo = geometry.enclosure(enclosure)?;
        let center = enclosure_geo.center();
        println!(
            "  {enclosure}: center ({:.1}, {:.1}, {:.1}) cm, {} modules",
            center.x,
            center.y,
            center.z,
            enclosure_geo.n_modules()
        );
    }

    for module in geometry.module_ids() {
        let module_geo = geometry.module(module)?;
        println!(
            "    {module}: drift {:?}, {} planes",
            module_geo.drift_direction(),
            module_geo.n_planes()
        );
        for plane in module_geo.planes() {
            println!(
                "      {}: view {}, {} wires, pitch {:.3} cm, signal {:?}",
                plane.id(),
                plane.view(),
                plane.n_wires(),
                plane.wire_pitch(),
                geometry.plane_signal_type(plane.id())?,
            );
        }
    }

    let n_channels = geometry.channel_count()?;
    println!("  {n_channels} channels");
    for channel in [0, n_channels / 2, n_channels - 1] {
        let wires = geometry.channel_to_wires(ChannelId(channel))?;
        let rendered: Vec<String> = wires.iter().map(|w| w.to_string()).collect();
        println!("    Ch:{channel} -> [{}]", rendered.join(", "));
    }

    Ok(())
}
