use std::fs;
use std::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_tilegroup");

fn points_file(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("points.geojson");
    let json = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "a"}, "geometry": {"type": "Point", "coordinates": [0, 0]}},
            {"type": "Feature", "properties": {"name": "b"}, "geometry": {"type": "Point", "coordinates": [1, 1]}},
            {"type": "Feature", "properties": {"name": "c"}, "geometry": {"type": "Point", "coordinates": [400, 400]}}
        ]
    }"#;
    fs::write(&path, json).expect("Failed to write points");
    path
}

#[test]
fn test_missing_polygon_directory_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let points = points_file(dir.path());
    let missing = dir.path().join("no_polygons_here");

    let output = Command::new(BIN)
        .arg("--geometries")
        .arg(&points)
        .arg("--polygons")
        .arg(&missing)
        .output()
        .expect("Failed to run binary");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "no groups should be printed");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no_polygons_here"));
}

#[test]
fn test_polygon_grouping_prints_groups() {
    let dir = tempfile::tempdir().unwrap();
    let points = points_file(dir.path());
    let polygons = dir.path().join("polygons");
    fs::create_dir(&polygons).unwrap();
    fs::write(
        polygons.join("square.geojson"),
        r#"{"type": "FeatureCollection", "features": [{"type": "Feature", "properties": {},
            "geometry": {"type": "Polygon", "coordinates": [[[-10, -10], [10, -10], [10, 10], [-10, 10], [-10, -10]]]}}]}"#,
    )
    .unwrap();

    let output = Command::new(BIN)
        .arg("--geometries")
        .arg(&points)
        .arg("--polygons")
        .arg(&polygons)
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);

    let poly = lines.iter().find(|l| l["has_polygon"] == true).unwrap();
    assert_eq!(poly["size"], 2);
    assert_eq!(poly["members"], serde_json::json!(["a", "b"]));
    let plain = lines.iter().find(|l| l["has_polygon"] == false).unwrap();
    assert_eq!(plain["members"], serde_json::json!(["c"]));
}

#[test]
fn test_kd_tree_mode_without_polygons() {
    let dir = tempfile::tempdir().unwrap();
    let points = points_file(dir.path());

    let output = Command::new(BIN)
        .arg("--geometries")
        .arg(&points)
        .arg("--max-group-size")
        .arg("2")
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2);
}
