//! Full pipeline tests: raw parameters in, exported files out.

use approx::assert_relative_eq;
use coilcad::{
    config::DrawingConfig, export::render_svg, generate, generate_from_raw, DrawingSession,
    ExportFormat, Field, Layer, RawParameters, Shape, TitleBlockInfo, ViewKind,
};
use std::fs;

fn raw_with_side(side: &str) -> RawParameters {
    let mut raw = RawParameters::default();
    raw.connection_side = side.to_string();
    raw
}

#[test]
fn test_default_coil() {
    let drawing = generate_from_raw(&RawParameters::default(), &TitleBlockInfo::default()).unwrap();
    let p = &drawing.params;

    assert_relative_eq!(p.vertical_pitch(), 1300.0 / 34.0, epsilon = 1e-12);
    assert_relative_eq!(p.casing_width(), 1430.0);
    assert_relative_eq!(p.casing_height(), 1430.0);
    assert_eq!(
        drawing.sheet.title,
        "5/8\"x1330FLx1400FHx6Rx35TPRx13FPIx35NC - LHS"
    );

    for kind in [ViewKind::Header, ViewKind::Return] {
        let view = &drawing.sheet.view(kind).unwrap().view;
        assert_eq!(view.on_layer(Layer::Tube).count(), 210);
    }

    let pitch = drawing
        .sheet
        .dimensions()
        .find(|d| d.label.text.contains("34 x"))
        .expect("pitch dimension");
    assert!(pitch.label.text.starts_with("1300"));
}

#[test]
fn test_connection_side_mirrors_pipes() {
    let info = TitleBlockInfo::default();
    let lhs = generate_from_raw(&raw_with_side("LHS"), &info).unwrap();
    let rhs = generate_from_raw(&raw_with_side("RHS"), &info).unwrap();
    let axis = lhs.params.casing_width() / 2.0;

    let centres = |d: &coilcad::Drawing| -> Vec<f64> {
        d.sheet
            .view(ViewKind::Top)
            .unwrap()
            .view
            .on_layer(Layer::Pipe)
            .filter_map(|p| match p.shape {
                Shape::Circle { center, .. } => Some(center.x),
                _ => None,
            })
            .collect()
    };
    let l = centres(&lhs);
    let r = centres(&rhs);
    assert_eq!(l.len(), 4);
    for (a, b) in l.iter().zip(&r) {
        assert_relative_eq!(*a, 2.0 * axis - b, epsilon = 1e-9);
    }
    assert!(rhs.sheet.title.ends_with("- RHS"));
}

#[test]
fn test_regeneration_is_idempotent() {
    let params = RawParameters::default().validate().unwrap();
    let info = TitleBlockInfo::default();
    let a = generate(&params, &info);
    let b = generate(&params, &info);
    assert_eq!(a, b);
    assert_eq!(render_svg(&a.sheet).unwrap(), render_svg(&b.sheet).unwrap());
}

#[test]
fn test_session_keeps_last_valid_drawing() {
    let mut session = DrawingSession::new(TitleBlockInfo::default());
    assert!(session.current().is_none());

    let first_title = session
        .regenerate(&RawParameters::default())
        .unwrap()
        .sheet
        .title
        .clone();

    let mut bad = RawParameters::default();
    bad.top_plate = 1000.0;
    bad.bottom_plate = 500.0;
    let err = session.regenerate(&bad).unwrap_err();
    assert!(err.has(Field::TopPlate));
    assert_eq!(session.current().unwrap().sheet.title, first_title);

    let mut good = RawParameters::default();
    good.no_of_rows = 4;
    session.regenerate(&good).unwrap();
    assert!(session.current().unwrap().sheet.title.contains("x4R"));
}

#[test]
fn test_config_to_files() {
    let mut config = DrawingConfig::from_toml_str(
        r#"
[parameters]
no_of_rows = 3
connection_side = "RHS"

[title_block]
company_name = "acme coils"
"#,
    )
    .unwrap();
    config.apply_overrides(["fpi=10"]).unwrap();

    let drawing = generate_from_raw(&config.parameters, &config.title_block).unwrap();
    assert!(drawing.sheet.title.contains("x10FPI"));

    let dxf_path = "/tmp/test_coil_end_to_end.dxf";
    let svg_path = "/tmp/test_coil_end_to_end.svg";
    let json_path = "/tmp/test_coil_end_to_end.json";
    drawing.write(dxf_path).unwrap();
    drawing.write(svg_path).unwrap();
    drawing.write(json_path).unwrap();

    let dxf = fs::read_to_string(dxf_path).unwrap();
    assert!(dxf.contains("$EXTMIN"));
    assert!(dxf.contains("\nDIMS\n"));
    assert!(dxf.contains("acme coils"));

    let svg = fs::read_to_string(svg_path).unwrap();
    assert!(svg.contains(r#"<g id="TUBES""#));
    assert!(svg.contains("acme coils"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(json["title"], serde_json::Value::from(drawing.sheet.title.clone()));

    assert!(drawing.write("/tmp/test_coil_end_to_end.pdf").is_err());
    assert_eq!(ExportFormat::Svg.extension(), "svg");
}

#[test]
fn test_every_hole_lies_on_its_plate() {
    let info = TitleBlockInfo::default();

    let mut two_tubes = RawParameters::default();
    two_tubes.tubes_per_row = 2;
    let err = generate_from_raw(&two_tubes, &info).unwrap_err();
    assert!(err.has(Field::TubesPerRow), "{err}");

    two_tubes.no_of_rows = 1;
    let drawing = generate_from_raw(&two_tubes, &info).unwrap();
    let r = drawing.params.tube_radius();
    for kind in [ViewKind::Header, ViewKind::Return] {
        for p in drawing.sheet.view(kind).unwrap().view.on_layer(Layer::Tube) {
            let Shape::Circle { center, .. } = p.shape else {
                panic!("tube layer holds {p:?}");
            };
            assert!(center.y - r >= 0.0);
            assert!(center.y + r <= drawing.params.casing_height());
        }
    }
}
