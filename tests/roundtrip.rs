use powerbb::deck::{AutofitMode, Geometry, Shape, ShapeContent, Slide, TextRun};
use powerbb::{BuildOptions, Deck, InspectOptions};
use proptest::prelude::*;
use std::path::Path;

const PNG: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R',
];

fn round_trip(deck: &Deck, dir: &Path, options: &BuildOptions) -> Deck {
    let out = dir.join("deck.pptx");
    powerbb::build(deck, &out, options).unwrap();
    powerbb::inspect(&out, None, &InspectOptions::new()).unwrap().deck
}

#[test]
fn test_hello_example() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("hello.pptx");
    let json = r#"{"slides":[{"shapes":[{"kind":"textbox","x":0,"y":0,"width":4,"height":1,"runs":[{"text":"Hello","bold":true}]}]}]}"#;
    powerbb::build_from_json(json, &out, &BuildOptions::new()).unwrap();

    let summaries = powerbb::list(&out).unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].shape_count, 1);
    assert_eq!(summaries[0].title.as_deref(), Some("Hello"));

    let inspection = powerbb::inspect(&out, None, &InspectOptions::new()).unwrap();
    assert!(inspection.warnings.is_empty());
    let shapes = &inspection.deck.slides[0].shapes;
    assert_eq!(shapes.len(), 1);
    assert!(shapes[0].geometry.approx_eq(&Geometry::new(0.0, 0.0, 4.0, 1.0)));
    match &shapes[0].content {
        ShapeContent::TextBox { runs, .. } => {
            assert_eq!(runs.len(), 1);
            assert_eq!(runs[0].text, "Hello");
            assert!(runs[0].bold);
            assert!(!runs[0].italic);
        },
        other => panic!("expected a text box, got {other:?}"),
    }
}

#[test]
fn test_full_deck_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("img")).unwrap();
    std::fs::write(dir.path().join("img/logo.png"), PNG).unwrap();

    let json = r##"{
        "meta": {
            "title": "Quarterly {{quarter}}",
            "slide_width": 13.333,
            "slide_height": 7.5,
            "variables": {"quarter": "Q3", "owner": "Finance"},
            "layout_aliases": {"cover": "Title Only"}
        },
        "slides": [
            {
                "layout": "cover",
                "title": "{{quarter}} results\nDraft",
                "background": {"color": "1f2937"},
                "notes": "Open with the headline.\nThen pause.",
                "shapes": [
                    {"kind": "textbox", "x": 0.5, "y": 0.4, "width": 12, "height": 1.25,
                     "autofit": "shrink",
                     "runs": [
                        {"text": "Results for {{quarter}}", "bold": true, "size": 40, "color": "FFFFFF"},
                        {"text": " by {{owner}}", "italic": true, "underline": true, "font": "Georgia", "size": 10.504}
                     ]},
                    {"kind": "image", "src": "img/logo.png", "x": 11, "y": 6, "width": 1.5, "height": 1}
                ]
            },
            {
                "layout": "Title  Only",
                "shapes": [
                    {"kind": "table", "x": 1, "y": 1.5, "width": 8, "height": 3, "header": true,
                     "rows": [["Region", "Revenue"], ["North", 1200], ["South", "950"]]},
                    {"kind": "shape", "preset": "ellipse", "fill": "ff8800", "text": "42%",
                     "x": 9.5, "y": 2, "width": 2, "height": 2}
                ]
            },
            {"shapes": []}
        ]
    }"##;
    let deck = powerbb::parse_deck(json, false).unwrap();
    assert_eq!(deck.meta.title.as_deref(), Some("Quarterly Q3"));
    assert_eq!(deck.slides[0].layout, "Title Only");
    assert_eq!(deck.slides[1].layout, "Title Only");

    let back = round_trip(&deck, dir.path(), &BuildOptions::new().with_base_dir(dir.path()));
    assert!(
        deck.semantic_eq(&back),
        "round trip changed the deck:\n{}\n---\n{}",
        deck.to_json_pretty().unwrap(),
        back.to_json_pretty().unwrap()
    );

    let cover = &back.slides[0];
    assert_eq!(cover.title.as_deref(), Some("Q3 results\nDraft"));
    assert_eq!(cover.shapes.len(), 2);
    assert_eq!(cover.background.as_ref().unwrap().color, "1F2937");
    assert_eq!(cover.notes.as_deref(), Some("Open with the headline.\nThen pause."));
    match &cover.shapes[0].content {
        ShapeContent::TextBox { runs, autofit } => {
            assert_eq!(*autofit, Some(AutofitMode::Shrink));
            assert_eq!(runs[0].text, "Results for Q3");
            assert_eq!(runs[1].font.as_deref(), Some("Georgia"));
            assert_eq!(runs[1].size, Some(10.5));
        },
        other => panic!("expected a text box, got {other:?}"),
    }
    assert_eq!(
        cover.shapes[1].content,
        ShapeContent::Image {
            src: "img/logo.png".into()
        }
    );

    match &back.slides[1].shapes[0].content {
        ShapeContent::Table { rows, header } => {
            assert!(*header);
            assert_eq!(rows[1], vec!["North".to_string(), "1200".to_string()]);
        },
        other => panic!("expected a table, got {other:?}"),
    }
    assert_eq!(back.slides[2].layout, "Blank");
    assert!(back.slides[2].shapes.is_empty());
}

#[test]
fn test_inspector_output_rebuilds_identically() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"{"slides":[
        {"layout":"Title Only","title":"Plan","shapes":[
            {"kind":"textbox","x":1,"y":1,"width":5,"height":1,"runs":[{"text":"line one\nline two"}]},
            {"kind":"shape","x":2,"y":3,"width":1,"height":1}
        ]}
    ]}"#;
    let first = dir.path().join("first.pptx");
    powerbb::build_from_json(json, &first, &BuildOptions::new()).unwrap();
    let dumped = powerbb::inspect(&first, None, &InspectOptions::new())
        .unwrap()
        .deck
        .to_json_pretty()
        .unwrap();

    let second = dir.path().join("second.pptx");
    powerbb::build_from_json(&dumped, &second, &BuildOptions::new()).unwrap();
    let again = powerbb::inspect(&second, None, &InspectOptions::new()).unwrap().deck;
    assert_eq!(again.to_json_pretty().unwrap(), dumped);
}

#[test]
fn test_empty_strings_read_back_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"{"meta":{"title":""},"slides":[
        {"layout":"Title Only","title":"","notes":"","shapes":[
            {"kind":"shape","text":"","x":0,"y":0,"width":1,"height":1},
            {"kind":"textbox","x":0,"y":1,"width":3,"height":1,"runs":[{"text":""},{"text":"kept","font":""}]}
        ]}
    ]}"#;
    let deck = powerbb::parse_deck(json, false).unwrap();
    let back = round_trip(&deck, dir.path(), &BuildOptions::new());
    assert!(
        deck.semantic_eq(&back),
        "round trip changed the deck:\n{}\n---\n{}",
        deck.to_json_pretty().unwrap(),
        back.to_json_pretty().unwrap()
    );
    assert_eq!(back.slides[0].notes, None);
    assert_eq!(back.slides[0].title, None);
}

#[test]
fn test_off_grid_font_size_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"{"meta":{"defaults":{"size":13.337}},"slides":[{"shapes":[
        {"kind":"textbox","x":0,"y":0,"width":4,"height":1,
         "runs":[{"text":"a","size":10.504},{"text":"b"},{"text":"c","size":7.996}]}
    ]}]}"#;
    let deck = powerbb::parse_deck(json, false).unwrap();
    let back = round_trip(&deck, dir.path(), &BuildOptions::new());
    assert!(deck.semantic_eq(&back));
    match &back.slides[0].shapes[0].content {
        ShapeContent::TextBox { runs, .. } => {
            let sizes: Vec<_> = runs.iter().map(|r| r.size).collect();
            assert_eq!(sizes, vec![Some(10.5), Some(13.34), Some(8.0)]);
        },
        other => panic!("expected a text box, got {other:?}"),
    }
}

#[test]
fn test_build_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut slide = Slide::new("Title Only");
    slide.notes = Some("same every time".into());
    slide.shapes.push(Shape {
        content: ShapeContent::Table {
            rows: vec![vec!["a".into(), "b".into()], vec!["c".into(), String::new()]],
            header: false,
        },
        geometry: Geometry::new(0.25, 0.25, 4.0, 2.0),
    });
    let deck = Deck {
        meta: Default::default(),
        slides: vec![slide],
    };

    let a = dir.path().join("a.pptx");
    let b = dir.path().join("b.pptx");
    powerbb::build(&deck, &a, &BuildOptions::new()).unwrap();
    powerbb::build(&deck, &b, &BuildOptions::new()).unwrap();

    let options = InspectOptions::new();
    let from_a = powerbb::inspect(&a, None, &options).unwrap().deck;
    let from_b = powerbb::inspect(&b, None, &options).unwrap().deck;
    assert_eq!(from_a, from_b);
    assert!(deck.semantic_eq(&from_a));
}

#[test]
fn test_slide_filter() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("three.pptx");
    let json = r#"{"slides":[
        {"shapes":[{"kind":"textbox","x":0,"y":0,"width":1,"height":1,"runs":[{"text":"one"}]}]},
        {"shapes":[{"kind":"textbox","x":0,"y":0,"width":1,"height":1,"runs":[{"text":"two"}]}]},
        {"shapes":[{"kind":"textbox","x":0,"y":0,"width":1,"height":1,"runs":[{"text":"three"}]}]}
    ]}"#;
    powerbb::build_from_json(json, &out, &BuildOptions::new()).unwrap();

    let inspection = powerbb::inspect(&out, Some(2), &InspectOptions::new()).unwrap();
    assert_eq!(inspection.deck.slides.len(), 1);
    match &inspection.deck.slides[0].shapes[0].content {
        ShapeContent::TextBox { runs, .. } => assert_eq!(runs[0].text, "two"),
        other => panic!("expected a text box, got {other:?}"),
    }

    let err = powerbb::inspect(&out, Some(99), &InspectOptions::new()).unwrap_err();
    assert!(matches!(
        err,
        powerbb::ReadError::IndexOutOfRange { index: 99, count: 3 }
    ));
}

#[test]
fn test_show_report() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("show.pptx");
    let json = r#"{"slides":[{"layout":"Title Only","notes":"remember","shapes":[
        {"kind":"textbox","x":1,"y":0.5,"width":4,"height":1,"runs":[{"text":"Hello","bold":true,"size":24}]}
    ]}]}"#;
    powerbb::build_from_json(json, &out, &BuildOptions::new()).unwrap();

    let report = powerbb::show(&out, 1).unwrap();
    assert!(report.starts_with("Slide 1 of 1\nLayout: Title Only\n"));
    assert!(!report.contains("Title:"));
    assert!(report.contains("run 1: \"Hello\" (bold, 24pt)"));
    assert!(report.contains("Notes:\n  remember\n"));
}

fn arb_color() -> impl Strategy<Value = String> {
    "[0-9A-F]{6}"
}

fn arb_geometry() -> impl Strategy<Value = Geometry> {
    (0.0..20.0f64, 0.0..20.0f64, 0.0..20.0f64, 0.0..20.0f64)
        .prop_map(|(x, y, width, height)| Geometry::new(x, y, width, height))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_geometry_and_colour_survive(
        geometries in prop::collection::vec(arb_geometry(), 1..4),
        fill in arb_color(),
        text_color in arb_color(),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let mut slide = Slide::new("Blank");
        for (i, geometry) in geometries.into_iter().enumerate() {
            let content = if i % 2 == 0 {
                ShapeContent::TextBox {
                    runs: vec![TextRun {
                        color: Some(text_color.clone()),
                        ..TextRun::plain(format!("shape {i}"))
                    }],
                    autofit: None,
                }
            } else {
                ShapeContent::Generic {
                    preset: "roundRect".into(),
                    fill: Some(fill.clone()),
                    text: None,
                    native: None,
                }
            };
            slide.shapes.push(Shape { content, geometry });
        }
        let deck = Deck { meta: Default::default(), slides: vec![slide] };

        let back = round_trip(&deck, dir.path(), &BuildOptions::new());
        prop_assert!(deck.semantic_eq(&back));
    }
}
