mod common;

use block_diagram_detector::classifier::{ClassifierParams, GeometricObject, RegionDescriptors, ShapeClassifier};
use block_diagram_detector::contour::Contour;
use block_diagram_detector::edges::{EdgeMap, ExploredMap};
use block_diagram_detector::region::{FeatureVector, Region, RegionId};
use block_diagram_detector::statistics::{ObjectStatistics, StatisticsTable};
use block_diagram_detector::tracer::{CancellationToken, TracerKind, TracingOutcome};
use block_diagram_detector::types::{BoundingBox, Point};
use common::synthetic_image::{circle, ellipse, filled_map, outline_map, rect, Shape};
use std::sync::Arc;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn trace_all(edges: &EdgeMap, kind: TracerKind) -> Vec<Contour> {
    let mut explored = edges.explored_copy();
    let tracer = kind.tracer();
    let cancel = CancellationToken::new();
    let mut contours = Vec::new();
    loop {
        match tracer
            .trace(edges, &mut explored, edges.bounds(), &cancel)
            .expect("tracing should not fail on a valid map")
        {
            TracingOutcome::Successful(c) => contours.push(c),
            TracingOutcome::NotAbleToContour { start, codes } => {
                panic!("open contour at {start} after {codes} codes")
            }
            TracingOutcome::NotAbleToFindStartPoint => break,
        }
    }
    contours
}

fn single_region(shape: Shape, width: usize, height: usize) -> Region {
    let edges = outline_map(width, height, &[shape]);
    let mut contours = trace_all(&edges, TracerKind::Moore);
    assert_eq!(contours.len(), 1, "expected one contour");
    Region::new(RegionId(0), contours.remove(0))
}

#[test]
fn rectangle_traces_to_its_box_and_area() {
    init_logger();
    for kind in [TracerKind::Moore, TracerKind::Square] {
        let edges = outline_map(80, 60, &[rect(10, 12, 49, 36)]);
        let contours = trace_all(&edges, kind);
        assert_eq!(contours.len(), 1, "{kind:?} traced {} contours", contours.len());
        let contour = &contours[0];
        assert!(contour.is_closed());
        assert_eq!(contour.bounds(), BoundingBox::new(10, 12, 49, 36));
        assert_eq!(contour.area(), 40 * 25, "{kind:?} area");
    }
}

#[test]
fn filled_rectangle_traces_once() {
    init_logger();
    for kind in [TracerKind::Moore, TracerKind::Square] {
        let edges = filled_map(80, 60, &[rect(10, 12, 49, 36)]);
        let contours = trace_all(&edges, kind);
        assert_eq!(contours.len(), 1, "{kind:?} traced {} contours", contours.len());
        assert_eq!(contours[0].bounds(), BoundingBox::new(10, 12, 49, 36));
        assert_eq!(contours[0].area(), 40 * 25, "{kind:?} area");

        let mut explored = edges.explored_copy();
        kind.tracer()
            .trace(&edges, &mut explored, edges.bounds(), &CancellationToken::new())
            .unwrap();
        assert_eq!(explored.explored_count(), edges.foreground_count());
    }
}

#[test]
fn filled_blob_keeps_detached_inner_shape() {
    init_logger();
    // thick frame around a hole holding a separate disc
    let (ring, hole, disc) = (rect(5, 5, 54, 54), rect(10, 10, 49, 49), circle(30, 30, 8));
    let edges = EdgeMap::from_fn(60, 60, |x, y| {
        let (x, y) = (x as i64, y as i64);
        (ring(x, y) && !hole(x, y)) || disc(x, y)
    });
    let contours = trace_all(&edges, TracerKind::Moore);
    assert_eq!(contours.len(), 2, "frame and disc");
    assert_eq!(contours[0].bounds(), BoundingBox::new(5, 5, 54, 54));
    assert_eq!(contours[1].bounds(), BoundingBox::new(22, 22, 38, 38));
}

#[test]
fn square_tracing_closes_early_on_diagonal_curves() {
    init_logger();
    let edges = outline_map(60, 60, &[circle(30, 30, 20)]);
    let full = BoundingBox::new(10, 10, 50, 50);

    let moore = trace_all(&edges, TracerKind::Moore);
    assert_eq!(moore.len(), 1);
    assert_eq!(moore[0].bounds(), full);

    let tracer = TracerKind::Square.tracer();
    let mut explored = edges.explored_copy();
    let cancel = CancellationToken::new();
    let mut closed = Vec::new();
    loop {
        match tracer
            .trace(&edges, &mut explored, edges.bounds(), &cancel)
            .unwrap()
        {
            TracingOutcome::Successful(c) => closed.push(c),
            TracingOutcome::NotAbleToContour { .. } => {}
            TracingOutcome::NotAbleToFindStartPoint => break,
        }
    }
    assert!(closed.iter().all(|c| c.bounds() != full), "square walk spanned the circle");
}

#[test]
fn traced_rectangle_classifies_as_rectangle() {
    init_logger();
    let region = single_region(rect(5, 5, 64, 24), 80, 40);
    let d = RegionDescriptors::of(&region);
    let table = StatisticsTable::new(2.0).with_object(
        ObjectStatistics::new("rectangle")
            .with_var("compactness", d.compactness, 0.05 * d.compactness)
            .with_var("phi1", d.hu[0], 0.05 * d.hu[0]),
    );
    let classifier = ShapeClassifier::new(Arc::new(table), ClassifierParams::default());
    assert_eq!(
        classifier.classify(&region),
        Some(GeometricObject::Rectangle {
            bounds: region.bounds()
        })
    );
}

#[test]
fn circularity_separates_circles_from_ellipses() {
    init_logger();
    let disc = single_region(circle(40, 40, 20), 80, 80);
    let c = disc.circularity();
    assert!((0.9..=1.1).contains(&c), "circle circularity {c}");

    let oval = single_region(ellipse(50, 20, 30, 10), 100, 40);
    let e = oval.circularity();
    assert!(e < 1.0 && e < c - 0.1, "ellipse circularity {e} vs circle {c}");
    assert!(oval.eccentricity() > disc.eccentricity());
    let (major, minor) = oval.axes();
    assert!(major > 2.0 * minor, "axes {major} / {minor}");

    let table = StatisticsTable::new(2.0).with_object(
        ObjectStatistics::new("ellipse").with_var("circularity", c, 0.05),
    );
    let classifier = ShapeClassifier::new(Arc::new(table), ClassifierParams::default());
    assert!(matches!(
        classifier.recognize_ellipse(&disc),
        Some(GeometricObject::Ellipse { .. })
    ));
    assert!(classifier.recognize_ellipse(&oval).is_none());
}

#[test]
fn second_pass_over_explored_map_finds_nothing() {
    init_logger();
    let edges = outline_map(50, 50, &[circle(25, 25, 12)]);
    let mut explored: ExploredMap = edges.explored_copy();
    let tracer = TracerKind::Moore.tracer();
    let cancel = CancellationToken::new();
    let first = tracer
        .trace(&edges, &mut explored, edges.bounds(), &cancel)
        .unwrap();
    assert!(matches!(first, TracingOutcome::Successful(_)));
    let again = tracer
        .trace(&edges, &mut explored, edges.bounds(), &cancel)
        .unwrap();
    assert_eq!(again, TracingOutcome::NotAbleToFindStartPoint);
    assert_eq!(explored.explored_count(), edges.foreground_count());
}

#[test]
fn hu_moments_survive_translation() {
    init_logger();
    let a = single_region(ellipse(30, 30, 18, 9), 120, 90);
    let b = Region::new(RegionId(1), a.contour().translated(47, 23));
    let (ha, hb) = (a.hu_moments(), b.hu_moments());
    for (i, (x, y)) in ha.iter().zip(hb.iter()).enumerate() {
        assert!((x - y).abs() <= 1e-9 * x.abs().max(1.0), "phi{} {x} vs {y}", i + 1);
    }
    assert_eq!(a.feature_vector().total(), b.feature_vector().total());
}

#[test]
fn containment_follows_bounding_boxes() {
    init_logger();
    let edges = outline_map(
        120,
        80,
        &[rect(5, 5, 70, 60), circle(35, 30, 10), circle(100, 40, 8)],
    );
    let contours = trace_all(&edges, TracerKind::Moore);
    assert_eq!(contours.len(), 3);
    let regions: Vec<Region> = contours
        .into_iter()
        .enumerate()
        .map(|(i, c)| Region::new(RegionId(i), c))
        .collect();
    let (outer, inner, apart) = (&regions[0], &regions[1], &regions[2]);
    assert!(Region::is_contained(outer, inner));
    assert!(!Region::is_contained(outer, apart));
    assert!(!Region::is_contained(inner, outer));
    assert_eq!(inner.bounds().center(), Point::new(35, 30));
}

#[test]
fn feature_vector_layout_is_configurable() {
    init_logger();
    let region = single_region(rect(4, 4, 23, 13), 30, 20);
    let fv = region.feature_vector();
    assert_eq!(fv.layout(), (FeatureVector::DEFAULT_TRACKS, FeatureVector::DEFAULT_SECTORS));
    let coarse = region.feature_vector_with(2, 2);
    assert_eq!(coarse.layout(), (2, 2));
    assert_eq!(coarse.total(), fv.total());
    assert!(coarse.cell(1, 1).is_some() && coarse.cell(2, 0).is_none());
    assert!(fv.distance(&coarse).is_err());
}
