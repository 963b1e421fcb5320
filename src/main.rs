use anyhow::{Context, bail};
use clap::Parser;
use geo::Centroid;
use geojson::{GeoJson, Value};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tilegroup::{GeometryCollection, Group, GroupingConfig, GroupingEngine, Point3d, PointGeometry};

#[derive(Parser, Debug)]
#[command(version, about = "Group geometries into tile-sized clusters", long_about = None)]
struct Args {
    /// GeoJSON FeatureCollection with the geometries to group
    #[arg(short, long)]
    geometries: PathBuf,

    /// Directory of GeoJSON polygon files; enables polygon grouping
    #[arg(short, long)]
    polygons: Option<PathBuf>,

    /// JSON (or TOML with the `toml` feature) grouping configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    cell_size: Option<f64>,

    #[arg(long)]
    max_group_size: Option<usize>,
}

#[derive(Serialize)]
struct GroupSummary<'a> {
    index: usize,
    has_polygon: bool,
    size: usize,
    centroid: [f64; 3],
    polygons: usize,
    members: Vec<&'a str>,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GroupingConfig> {
    let Some(path) = path else {
        return Ok(GroupingConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;

    #[cfg(feature = "toml")]
    if path.extension().is_some_and(|ext| ext == "toml") {
        return Ok(GroupingConfig::from_toml(&text)?);
    }

    Ok(GroupingConfig::from_json(&text)?)
}

fn feature_centroid(value: &Value) -> Option<Point3d> {
    if let Value::Point(position) = value {
        return Point3d::from_slice(position);
    }
    let geometry: geo::Geometry<f64> = geojson::Geometry::new(value.clone()).try_into().ok()?;
    geometry.centroid().map(Point3d::from)
}

fn load_geometries(path: &Path) -> anyhow::Result<GeometryCollection<PointGeometry>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read geometries {}", path.display()))?;
    let GeoJson::FeatureCollection(collection) = text.parse::<GeoJson>()? else {
        bail!("{} is not a GeoJSON FeatureCollection", path.display());
    };

    let mut items = Vec::with_capacity(collection.features.len());
    for (idx, feature) in collection.features.into_iter().enumerate() {
        let Some(geometry) = &feature.geometry else {
            log::warn!("Feature {} has no geometry, skipped", idx);
            continue;
        };
        let Some(centroid) = feature_centroid(&geometry.value) else {
            log::warn!("Feature {} has no usable centroid, skipped", idx);
            continue;
        };
        let id = feature
            .property("name")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| idx.to_string());
        items.push(PointGeometry::new(id, centroid));
    }
    Ok(GeometryCollection::new(items))
}

fn summarize(index: usize, group: &Group<PointGeometry>) -> GroupSummary<'_> {
    GroupSummary {
        index,
        has_polygon: group.has_polygon(),
        size: group.len(),
        centroid: group.centroid().coords(),
        polygons: group.polygon_point_sets().len(),
        members: group.geometries().iter().map(|g| g.id.as_str()).collect(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(cell_size) = args.cell_size {
        config = config.with_cell_size(cell_size);
    }
    if let Some(max_group_size) = args.max_group_size {
        config = config.with_max_group_size(max_group_size);
    }
    let engine = GroupingEngine::new(config)?;

    let geometries = load_geometries(&args.geometries)?;
    info!("Loaded {} geometries", geometries.len());

    let groups = match &args.polygons {
        Some(dir) => {
            let rings = engine.catalog().load_or_exit(dir);
            info!("Loaded {} polygons from {}", rings.len(), dir.display());
            engine.group_by_polygons(geometries, &rings)?
        }
        None => engine.group_by_kd_tree(geometries)?,
    };
    info!("Produced {} groups", groups.len());

    for (index, group) in groups.iter().enumerate() {
        println!("{}", serde_json::to_string(&summarize(index, group))?);
    }

    Ok(())
}
