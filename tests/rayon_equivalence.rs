#![cfg(feature = "rayon")]

use holematch::{DetectConfig, Detector, RgbaImage, TemplateMeta};

fn make_canvas() -> RgbaImage {
    let mut img = RgbaImage::filled(900, 700, [250, 250, 245, 255]).unwrap();
    for row in 0..3 {
        for col in 0..4 {
            let w = 120 + col * 15;
            let h = 100 + row * 20;
            img.fill_rect(20 + col * 220, 20 + row * 230, w, h, [255, 0, 255, 255]);
        }
    }
    img
}

#[test]
fn parallel_refinement_matches_sequential() {
    let img = make_canvas();
    let sequential = Detector::new(DetectConfig::default()).unwrap();
    let parallel = Detector::new(DetectConfig {
        parallel: true,
        ..DetectConfig::default()
    })
    .unwrap();

    let a = sequential.detect_regions(img.view());
    let b = parallel.detect_regions(img.view());
    assert_eq!(a, b);

    let meta = TemplateMeta {
        id: "grid".to_owned(),
        print_size: "8x10".to_owned(),
        name: None,
    };
    let da = sequential.detect(img.view(), meta.clone()).unwrap();
    let db = parallel.detect(img.view(), meta).unwrap();
    assert_eq!(da, db);
    assert_eq!(da.definition.holes.len(), 12);
}
