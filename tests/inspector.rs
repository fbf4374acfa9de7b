use powerbb::deck::ShapeContent;
use powerbb::{BuildOptions, InspectOptions, ReadError};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];

/// Build `json`, then append `extra` to the shape tree of slide 1.
fn deck_with_extra_shapes(dir: &Path, json: &str, extra: &str) -> PathBuf {
    let built = dir.join("built.pptx");
    powerbb::build_from_json(json, &built, &BuildOptions::new().with_base_dir(dir)).unwrap();

    let patched = dir.join("patched.pptx");
    rewrite_part(&built, &patched, "ppt/slides/slide1.xml", |xml| {
        xml.replace("</p:spTree>", &format!("{extra}</p:spTree>"))
    });
    patched
}

/// Copy the package at `from` to `to`, passing one part through `edit`.
fn rewrite_part(from: &Path, to: &Path, name: &str, edit: impl Fn(&str) -> String) {
    let mut archive = ZipArchive::new(std::fs::File::open(from).unwrap()).unwrap();
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut data = Vec::new();
        file.read_to_end(&mut data).unwrap();
        let entry = file.name().to_string();
        if entry == name {
            data = edit(std::str::from_utf8(&data).unwrap()).into_bytes();
        }
        writer.start_file(entry, SimpleFileOptions::default()).unwrap();
        writer.write_all(&data).unwrap();
    }
    let bytes = writer.finish().unwrap().into_inner();
    std::fs::write(to, bytes).unwrap();
}

const ONE_SHAPE: &str =
    r#"{"slides":[{"shapes":[{"kind":"shape","preset":"rect","x":1,"y":1,"width":1,"height":1}]}]}"#;

#[test]
fn test_group_shape_degrades_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let group = r#"<p:grpSp><p:nvGrpSpPr><p:cNvPr id="10" name="Group 9"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="914400" y="457200"/><a:ext cx="1828800" cy="914400"/><a:chOff x="0" y="0"/><a:chExt cx="1828800" cy="914400"/></a:xfrm></p:grpSpPr></p:grpSp>"#;
    let path = deck_with_extra_shapes(dir.path(), ONE_SHAPE, group);

    let inspection = powerbb::inspect(&path, None, &InspectOptions::new()).unwrap();
    let shapes = &inspection.deck.slides[0].shapes;
    assert_eq!(shapes.len(), 2);
    match &shapes[1].content {
        ShapeContent::Generic { native, .. } => assert_eq!(native.as_deref(), Some("p:grpSp")),
        other => panic!("expected a generic shape, got {other:?}"),
    }
    assert!((shapes[1].geometry.x - 1.0).abs() < 1e-9);
    assert!((shapes[1].geometry.width - 2.0).abs() < 1e-9);

    assert_eq!(inspection.warnings.len(), 1);
    let warning = &inspection.warnings[0];
    assert_eq!((warning.slide, warning.shape), (1, Some(1)));
    assert!(warning.message.contains("p:grpSp"));
}

#[test]
fn test_chart_frame_degrades() {
    let dir = tempfile::tempdir().unwrap();
    let chart = r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="11" name="Chart 1"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="914400"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="rId99"/></a:graphicData></a:graphic></p:graphicFrame>"#;
    let path = deck_with_extra_shapes(dir.path(), ONE_SHAPE, chart);

    let inspection = powerbb::inspect(&path, None, &InspectOptions::new()).unwrap();
    match &inspection.deck.slides[0].shapes[1].content {
        ShapeContent::Generic { native, text, .. } => {
            assert_eq!(native.as_deref(), Some("p:graphicFrame"));
            assert_eq!(*text, None);
        },
        other => panic!("expected a generic shape, got {other:?}"),
    }
    assert!(inspection.warnings[0].message.contains("chart"));
}

#[test]
fn test_title_placeholder_reads_as_slide_title() {
    let dir = tempfile::tempdir().unwrap();
    let title = r#"<p:sp><p:nvSpPr><p:cNvPr id="12" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="457200" y="274320"/><a:ext cx="8229600" cy="1143000"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US" b="1"/><a:t>Agenda</a:t></a:r></a:p></p:txBody></p:sp>"#;
    let body = r#"<p:sp><p:nvSpPr><p:cNvPr id="13" name="Content 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="457200" y="1600200"/><a:ext cx="8229600" cy="4525963"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US" b="1"/><a:t>Goals</a:t></a:r></a:p></p:txBody></p:sp>"#;
    let connector = r#"<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="14" name="Connector 3"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr><p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="0"/></a:xfrm><a:prstGeom prst="line"><a:avLst/></a:prstGeom></p:spPr></p:cxnSp>"#;
    let path = deck_with_extra_shapes(dir.path(), ONE_SHAPE, &format!("{title}{body}{connector}"));

    let inspection = powerbb::inspect(&path, None, &InspectOptions::new()).unwrap();
    let slide = &inspection.deck.slides[0];
    assert_eq!(slide.title.as_deref(), Some("Agenda"));
    assert_eq!(slide.shapes.len(), 3);
    match &slide.shapes[1].content {
        ShapeContent::TextBox { runs, .. } => {
            assert_eq!(runs.len(), 1);
            assert_eq!(runs[0].text, "Goals");
            assert!(runs[0].bold);
        },
        other => panic!("expected a text box, got {other:?}"),
    }
    assert_eq!(inspection.warnings.len(), 1);
    assert_eq!(inspection.warnings[0].shape, Some(2));

    let summaries = powerbb::list(&path).unwrap();
    assert_eq!(summaries[0].title.as_deref(), Some("Agenda"));
    assert_eq!(summaries[0].shape_count, 3);

    let report = powerbb::show(&path, 1).unwrap();
    assert!(report.contains("Title: \"Agenda\""));
    assert!(report.contains("[2] textbox \"Content 2\""));
    assert!(report.contains("[3] shape \"Connector 3\""));
    assert!(report.contains("slide 1, shape 2: p:cxnSp is not supported"));
}

#[test]
fn test_inherited_geometry_reads_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    let body = r#"<p:sp><p:nvSpPr><p:cNvPr id="13" name="Body"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>inherited</a:t></a:r></a:p></p:txBody></p:sp>"#;
    let path = deck_with_extra_shapes(dir.path(), ONE_SHAPE, body);

    let inspection = powerbb::inspect(&path, None, &InspectOptions::new()).unwrap();
    let shape = &inspection.deck.slides[0].shapes[1];
    assert_eq!(shape.geometry, Default::default());
    assert!(inspection.warnings[0].message.contains("geometry"));
}

#[test]
fn test_show_lists_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let connector = r#"<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="14" name="Connector 1"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr><p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="0"/></a:xfrm><a:prstGeom prst="line"><a:avLst/></a:prstGeom></p:spPr></p:cxnSp>"#;
    let path = deck_with_extra_shapes(dir.path(), ONE_SHAPE, connector);

    let report = powerbb::show(&path, 1).unwrap();
    assert!(report.contains("[2] shape \"Connector 1\""));
    assert!(report.contains("preset: line, from p:cxnSp"));
    assert!(report.contains("Warnings:\n  slide 1, shape 1: p:cxnSp is not supported"));
}

#[test]
fn test_media_dir_extraction() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("chart.png"), PNG).unwrap();
    let out = dir.path().join("deck.pptx");
    let json =
        r#"{"slides":[{"shapes":[{"kind":"image","src":"chart.png","x":0,"y":0,"width":3,"height":2}]}]}"#;
    powerbb::build_from_json(json, &out, &BuildOptions::new().with_base_dir(dir.path())).unwrap();

    let media = dir.path().join("media");
    let inspection =
        powerbb::inspect(&out, None, &InspectOptions::new().with_media_dir(&media)).unwrap();
    let ShapeContent::Image { src } = &inspection.deck.slides[0].shapes[0].content else {
        panic!("expected an image");
    };
    let extracted = PathBuf::from(src);
    assert!(extracted.starts_with(&media));
    assert!(
        extracted
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("slide1_")
    );
    assert_eq!(std::fs::read(&extracted).unwrap(), PNG);

    // Without a media directory the description is reported.
    let inspection = powerbb::inspect(&out, None, &InspectOptions::new()).unwrap();
    assert_eq!(
        inspection.deck.slides[0].shapes[0].content,
        ShapeContent::Image {
            src: "chart.png".into()
        }
    );
}

#[test]
fn test_not_a_presentation() {
    let dir = tempfile::tempdir().unwrap();
    let text = dir.path().join("notes.pptx");
    std::fs::write(&text, "just some text").unwrap();
    assert!(matches!(
        powerbb::list(&text),
        Err(ReadError::NotAPresentation { .. })
    ));

    let docx = dir.path().join("letter.docx");
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer
        .write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#)
        .unwrap();
    writer.start_file("_rels/.rels", options).unwrap();
    writer
        .write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#)
        .unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer
        .write_all(br#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#)
        .unwrap();
    std::fs::write(&docx, writer.finish().unwrap().into_inner()).unwrap();

    let err = powerbb::inspect(&docx, None, &InspectOptions::new()).unwrap_err();
    match err {
        ReadError::NotAPresentation { reason, .. } => assert!(reason.contains("wordprocessingml")),
        other => panic!("expected NotAPresentation, got {other:?}"),
    }
}

#[test]
fn test_corrupt_slide_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let built = dir.path().join("built.pptx");
    powerbb::build_from_json(ONE_SHAPE, &built, &BuildOptions::new()).unwrap();
    let broken = dir.path().join("broken.pptx");
    rewrite_part(&built, &broken, "ppt/slides/slide1.xml", |xml| {
        xml.replace("</p:spTree>", "</p:spTreeX>")
    });

    let err = powerbb::inspect(&broken, None, &InspectOptions::new()).unwrap_err();
    assert!(matches!(err, ReadError::Corrupt { .. }), "got {err:?}");
}

#[test]
fn test_index_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("three.pptx");
    powerbb::build_from_json(
        r#"{"slides":[{"shapes":[]},{"shapes":[]},{"shapes":[]}]}"#,
        &out,
        &BuildOptions::new(),
    )
    .unwrap();

    for index in [0, 4, 99] {
        let err = powerbb::show(&out, index).unwrap_err();
        assert!(matches!(err, ReadError::IndexOutOfRange { count: 3, .. }));
    }
}
