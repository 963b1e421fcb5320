use tilegroup::{
    GeometryCollection, Group, GroupingConfig, GroupingEngine, KdTreeSplitter, Point3d,
    PolygonRing, SpatialSplitter, TileGroupError, merge_groups_in_cells, partition_by_polygons,
};

fn ring(coords: &[(f64, f64)]) -> PolygonRing {
    PolygonRing::new(coords.iter().map(|&(x, y)| Point3d::new(x, y, 0.0)).collect())
        .expect("Invalid ring")
}

/// Test 1: Large dataset through both strategies
#[test]
fn test_large_dataset() {
    let geometries: GeometryCollection<Point3d> = (0..20_000)
        .map(|i| Point3d::new((i % 200) as f64 * 10.0, (i / 200) as f64 * 10.0, 0.0))
        .collect();

    let engine = GroupingEngine::new(GroupingConfig::default()).expect("Failed to create engine");
    let groups = engine
        .group_by_kd_tree(geometries.clone())
        .expect("Split failed");
    assert!(groups.iter().all(|g| g.len() <= 500));
    assert_eq!(groups.iter().map(Group::len).sum::<usize>(), 20_000);

    let rings = vec![ring(&[(-1.0, -1.0), (995.0, -1.0), (995.0, 995.0), (-1.0, 995.0)])];
    let groups = engine
        .group_by_polygons(geometries, &rings)
        .expect("Polygon grouping failed");
    assert_eq!(groups.iter().map(Group::len).sum::<usize>(), 20_000);
    // 100 x 100 points sit in the polygon
    let inside: usize = groups
        .iter()
        .filter(|g| g.has_polygon())
        .map(Group::len)
        .sum();
    assert_eq!(inside, 10_000);
}

/// Test 2: Z is part of the grid key
#[test]
fn test_vertical_separation() {
    let groups = vec![
        Group::new(GeometryCollection::new(vec![Point3d::new(0.0, 0.0, 0.0)])).unwrap(),
        Group::new(GeometryCollection::new(vec![Point3d::new(0.0, 0.0, 500.0)])).unwrap(),
        Group::new(GeometryCollection::new(vec![Point3d::new(0.0, 0.0, 100.0)])).unwrap(),
    ];
    let merged = merge_groups_in_cells(groups, 300.0).unwrap();
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].len(), 2);
    assert_eq!(merged[1].len(), 1);
}

/// Test 3: Overlapping polygons resolve to the first one
#[test]
fn test_overlapping_polygons_first_match() {
    let big = ring(&[(-50.0, -50.0), (50.0, -50.0), (50.0, 50.0), (-50.0, 50.0)]);
    let small = ring(&[(-5.0, -5.0), (5.0, -5.0), (5.0, 5.0), (-5.0, 5.0)]);
    let geometries = GeometryCollection::new(vec![Point3d::new(0.0, 0.0, 0.0)]);

    let groups = partition_by_polygons(geometries.clone(), &[big.clone(), small.clone()]).unwrap();
    assert_eq!(groups[0].polygon_point_sets()[0], big.points().to_vec());

    let groups = partition_by_polygons(geometries, &[small.clone(), big]).unwrap();
    assert_eq!(groups[0].polygon_point_sets()[0], small.points().to_vec());
}

/// Test 4: Concave polygon, centroid in the notch
#[test]
fn test_concave_polygon() {
    // U shape opening upwards
    let u = ring(&[
        (0.0, 0.0),
        (30.0, 0.0),
        (30.0, 30.0),
        (20.0, 30.0),
        (20.0, 10.0),
        (10.0, 10.0),
        (10.0, 30.0),
        (0.0, 30.0),
    ]);
    let geometries = GeometryCollection::new(vec![
        Point3d::new(15.0, 20.0, 0.0),
        Point3d::new(5.0, 20.0, 0.0),
    ]);
    let groups = partition_by_polygons(geometries, &[u]).unwrap();
    assert_eq!(groups.len(), 2);
    assert!(groups[0].has_polygon());
    assert_eq!(groups[0].geometries().as_slice(), &[Point3d::new(5.0, 20.0, 0.0)]);
    assert!(!groups[1].has_polygon());
}

/// Test 5: Empty input
#[test]
fn test_empty_input() {
    let engine = GroupingEngine::new(GroupingConfig::default()).unwrap();
    let none: GeometryCollection<Point3d> = GeometryCollection::default();
    assert!(engine.group_by_kd_tree(none.clone()).unwrap().is_empty());
    assert!(engine.group_by_polygons(none, &[]).unwrap().is_empty());
}

/// Test 6: Rounding is stable and shared cells merge
#[test]
fn test_rounding_stability() {
    let a = Group::new(GeometryCollection::new(vec![Point3d::new(140.0, -140.0, 10.0)])).unwrap();
    let b = Group::new(GeometryCollection::new(vec![Point3d::new(-149.0, 149.0, -10.0)])).unwrap();
    for _ in 0..3 {
        assert_eq!(a.rounded_centroid(300.0).unwrap(), Point3d::new(0.0, 0.0, 0.0));
    }
    assert_eq!(
        a.rounded_centroid(300.0).unwrap(),
        b.rounded_centroid(300.0).unwrap()
    );
    let merged = merge_groups_in_cells(vec![a, b], 300.0).unwrap();
    assert_eq!(merged.len(), 1);
}

/// Test 7: Invalid cell size never reaches the merge
#[test]
fn test_invalid_cell_size() {
    let group = Group::new(GeometryCollection::new(vec![Point3d::new(1.0, 1.0, 1.0)])).unwrap();
    for bad in [0.0, -300.0, f64::NAN] {
        assert!(matches!(
            merge_groups_in_cells(vec![group.clone()], bad),
            Err(TileGroupError::InvalidCellSize(_))
        ));
    }
}

/// Test 8: Splitter contract with duplicated centroids
#[test]
fn test_split_duplicates() {
    let same: GeometryCollection<Point3d> =
        (0..1001).map(|_| Point3d::new(7.0, 7.0, 7.0)).collect();
    let pieces = KdTreeSplitter.split(same, 500).unwrap();
    assert!(pieces.iter().all(|p| !p.is_empty() && p.len() <= 500));
    assert_eq!(pieces.iter().map(|p| p.len()).sum::<usize>(), 1001);
}

/// Test 9: Config from JSON drives the engine
#[test]
fn test_config_from_json() {
    let config = GroupingConfig::from_json(r#"{"cell_size": 1000.0, "max_group_size": 2}"#)
        .expect("Failed to parse config");
    let engine = GroupingEngine::new(config).unwrap();

    let points = GeometryCollection::new(vec![
        Point3d::new(0.0, 0.0, 0.0),
        Point3d::new(400.0, 400.0, 0.0),
    ]);
    // 400 rounds to cell 0 at 1000 but to cell 1 at 300
    let groups = engine.group_by_polygons(points, &[]).unwrap();
    assert_eq!(groups.len(), 1);
}

#[cfg(feature = "toml")]
#[test]
fn test_config_from_toml() {
    let config = GroupingConfig::from_toml("cell_size = 50.0\n[catalog]\nsorted_listing = true\n")
        .expect("Failed to parse config");
    assert_eq!(config.cell_size, 50.0);
    assert!(config.catalog.sorted_listing);
    assert!(GroupingConfig::from_toml("cell_size = -1.0").is_err());
}

/// Test 10: Centroids beyond the grid range are rejected, not merged
#[test]
fn test_far_centroids_rejected_by_merge() {
    let groups = vec![
        Group::new(GeometryCollection::new(vec![Point3d::new(1e22, 0.0, 0.0)])).unwrap(),
        Group::new(GeometryCollection::new(vec![Point3d::new(5e22, 0.0, 0.0)])).unwrap(),
    ];
    assert!(matches!(
        merge_groups_in_cells(groups, 300.0),
        Err(TileGroupError::InvalidInput(_))
    ));
}
