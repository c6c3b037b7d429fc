use holematch::lowlevel::{scan_regions, ReservedPalette};
use holematch::{
    DetectConfig, DetectionWarning, Detector, HoleMatchError, RgbaImage, RgbaView, TemplateMeta,
    TemplateType, Violation,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const MAGENTA: [u8; 4] = [255, 0, 255, 255];
const MAGENTA_CMYK: [u8; 4] = [236, 0, 140, 255];

fn meta(name: Option<&str>) -> TemplateMeta {
    TemplateMeta {
        id: "tpl-1".to_owned(),
        print_size: "4x6".to_owned(),
        name: name.map(str::to_owned),
    }
}

/// Places one random rectangle per grid cell; returns the canvas and the
/// expected `(x, y, w, h)` boxes in row-major order.
fn random_grid(seed: u64, cols: usize, rows: usize) -> (RgbaImage, Vec<(u32, u32, u32, u32)>) {
    const CELL: usize = 120;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut img = RgbaImage::filled(cols * CELL, rows * CELL, WHITE).unwrap();
    let mut expected = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let w = rng.random_range(50..=100usize);
            let h = rng.random_range(50..=100usize);
            let x = c * CELL + rng.random_range(0..=10usize);
            let y = r * CELL + rng.random_range(0..=10usize);
            img.fill_rect(x, y, w, h, MAGENTA);
            expected.push((x as u32, y as u32, w as u32, h as u32));
        }
    }
    (img, expected)
}

#[test]
fn disjoint_rectangles_become_sorted_holes() {
    for seed in [1u64, 7, 42] {
        let (img, expected) = random_grid(seed, 4, 3);
        let detection = Detector::default().detect(img.view(), meta(None)).unwrap();
        let def = detection.definition;

        assert_eq!(def.holes.len(), expected.len(), "seed {seed}");
        for (idx, (hole, want)) in def.holes.iter().zip(&expected).enumerate() {
            assert_eq!(hole.id, format!("hole_{}", idx + 1));
            assert_eq!((hole.x, hole.y, hole.width, hole.height), *want, "seed {seed}");
        }
        assert_eq!(def.dimensions.width, 480);
        assert_eq!(def.dimensions.height, 360);
        assert!(detection.warnings.is_empty());
    }
}

#[test]
fn detection_is_deterministic() {
    let (img, _) = random_grid(9, 3, 2);
    let detector = Detector::default();
    let first = detector.detect(img.view(), meta(Some("party.png"))).unwrap();
    let second = detector.detect(img.view(), meta(Some("party.png"))).unwrap();
    assert_eq!(first, second);

    let a = serde_json::to_vec(&first.definition).unwrap();
    let b = serde_json::to_vec(&second.definition).unwrap();
    assert_eq!(a, b);
}

#[test]
fn cmyk_variant_and_transparency_are_respected() {
    let mut img = RgbaImage::filled(300, 120, WHITE).unwrap();
    img.fill_rect(10, 10, 80, 80, MAGENTA_CMYK);
    img.fill_rect(110, 10, 80, 80, [255, 0, 255, 40]);
    img.fill_rect(210, 10, 80, 80, [250, 8, 245, 255]);

    let def = Detector::default()
        .detect(img.view(), meta(None))
        .unwrap()
        .definition;
    let xs: Vec<u32> = def.holes.iter().map(|h| h.x).collect();
    assert_eq!(xs, vec![10, 210]);
    assert_eq!(def.template_type, TemplateType::Solo);
}

#[test]
fn undersized_square_reports_hole_too_small() {
    let mut img = RgbaImage::filled(100, 100, WHITE).unwrap();
    img.fill_rect(30, 30, 40, 40, MAGENTA);

    let err = Detector::default().detect(img.view(), meta(None)).unwrap_err();
    let HoleMatchError::InvalidTemplate(report) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(report.violations.len(), 1);
    assert!(matches!(
        &report.violations[0],
        Violation::HoleTooSmall { id, width: 40, height: 40, min_size: 50 } if id == "hole_1"
    ));
}

#[test]
fn blank_image_reports_no_holes() {
    let img = RgbaImage::filled(64, 64, WHITE).unwrap();
    let err = Detector::default().detect(img.view(), meta(None)).unwrap_err();
    assert_eq!(
        err,
        HoleMatchError::InvalidTemplate(holematch::ValidationReport {
            violations: vec![Violation::NoHolesDetected],
        })
    );
}

#[test]
fn speckles_are_discarded_before_validation() {
    let mut img = RgbaImage::filled(200, 200, WHITE).unwrap();
    img.fill_rect(20, 20, 100, 100, MAGENTA);
    img.put_pixel(180, 180, MAGENTA);
    img.fill_rect(150, 10, 2, 2, MAGENTA);

    let def = Detector::default()
        .detect(img.view(), meta(None))
        .unwrap()
        .definition;
    assert_eq!(def.holes.len(), 1);
    assert_eq!((def.holes[0].width, def.holes[0].height), (100, 100));
}

#[test]
fn six_holes_classify_as_branded_strip() {
    let mut img = RgbaImage::filled(220, 640, WHITE).unwrap();
    for i in 0..3 {
        img.fill_rect(10, 10 + i * 200, 90, 180, MAGENTA);
        img.fill_rect(120, 10 + i * 200, 90, 180, MAGENTA);
    }
    let def = Detector::default()
        .detect(img.view(), meta(None))
        .unwrap()
        .definition;
    assert_eq!(def.holes.len(), 6);
    assert_eq!(def.template_type, TemplateType::Strip);
    assert!(def.has_internal_branding);
    assert_eq!((def.holes[1].x, def.holes[1].y), (120, 10));
}

#[test]
fn name_hint_overrides_geometry() {
    let mut img = RgbaImage::filled(200, 200, WHITE).unwrap();
    img.fill_rect(20, 20, 120, 120, MAGENTA);
    let def = Detector::default()
        .detect(img.view(), meta(Some("Graduation-Card.png")))
        .unwrap()
        .definition;
    assert_eq!(def.template_type, TemplateType::Card);
    assert!(def.has_internal_branding);
}

#[test]
fn enclosed_component_is_flagged_and_deduplicated() {
    let mut img = RgbaImage::filled(320, 320, WHITE).unwrap();
    // Open "C" ring around a separate square.
    img.fill_rect(0, 0, 300, 10, MAGENTA);
    img.fill_rect(0, 290, 300, 10, MAGENTA);
    img.fill_rect(0, 0, 10, 300, MAGENTA);
    img.fill_rect(100, 100, 100, 100, MAGENTA);

    let (boxes, warnings) = Detector::default().detect_regions(img.view());
    assert_eq!(boxes.len(), 2);
    assert_eq!((boxes[0].width(), boxes[0].height()), (300, 300));
    assert_eq!((boxes[1].min_x, boxes[1].min_y), (100, 100));
    assert_eq!(
        warnings,
        vec![DetectionWarning::AmbiguousSplit {
            region: holematch::lowlevel::RegionBox {
                min_x: 0,
                min_y: 0,
                max_x: 299,
                max_y: 299,
                pixels: 300 * 10 * 2 + 280 * 10,
            },
            components: 2,
            holes: 2,
        }]
    );

    let err = Detector::default().detect(img.view(), meta(None)).unwrap_err();
    let HoleMatchError::InvalidTemplate(report) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(
        report.violations,
        vec![Violation::HolesOverlap {
            first: "hole_1".to_owned(),
            second: "hole_2".to_owned(),
        }]
    );
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = DetectConfig {
        split_stride: 0,
        ..DetectConfig::default()
    };
    assert_eq!(
        Detector::new(cfg).unwrap_err(),
        HoleMatchError::InvalidConfig {
            reason: "split_stride must be > 0",
        }
    );
}

#[test]
fn padded_stride_ignores_bytes_past_the_row() {
    const W: usize = 60;
    const H: usize = 60;
    const STRIDE: usize = 80;
    let mut data = Vec::with_capacity(H * STRIDE * 4);
    for y in 0..H {
        for x in 0..STRIDE {
            let inside = (5..55).contains(&x) && (5..55).contains(&y);
            // Padding columns carry marker color that must never be read.
            let px = if x >= W || inside { MAGENTA } else { WHITE };
            data.extend_from_slice(&px);
        }
    }
    let view = RgbaView::new(&data, W, H, STRIDE).unwrap();
    assert_eq!(view.stride(), STRIDE);
    assert_eq!(view.row(0).map(<[u8]>::len), Some(W * 4));

    let regions = scan_regions(view, &ReservedPalette::default());
    assert_eq!(regions.len(), 1);
    let r = regions[0];
    assert_eq!((r.min_x, r.min_y, r.max_x, r.max_y), (5, 5, 54, 54));

    let def = Detector::default()
        .detect(view, meta(None))
        .unwrap()
        .definition;
    assert_eq!(def.dimensions.width, W as u32);
    assert_eq!(def.holes.len(), 1);
    assert_eq!((def.holes[0].width, def.holes[0].height), (50, 50));
}
