use coilcad_params::CoilParameters;

use super::LABEL_HEIGHT;
use crate::types::{Layer, Point2D, Primitive, TextAlign, TextLabel, View, ViewKind};

/// Upper bound on the fin lines drawn in the front view.
///
/// Real coils carry hundreds of fins; the drawing shows a sample taken on
/// true fin positions so the density still reads correctly.
pub const MAX_FIN_SAMPLES: u64 = 40;

/// X offsets (from the fin-pack edge) of the sampled fin lines.
///
/// Fins are plates stacked along the fin length, so seen from the front each
/// fin is a vertical line across the fin height and the sample runs along FL
/// rather than hatching across FH.
///
/// Fins sit every `25.4 / FPI` mm. Positions on the two fin-pack edges are
/// skipped, and a stride is chosen so at most [`MAX_FIN_SAMPLES`] remain.
pub fn fin_sample_positions(fin_length: f64, fin_spacing: f64) -> Vec<f64> {
    assert!(fin_spacing > 0.0, "fin spacing must be positive");

    let interior = ((fin_length / fin_spacing).ceil() as u64).saturating_sub(1);
    if interior == 0 {
        return Vec::new();
    }
    let stride = interior.div_ceil(MAX_FIN_SAMPLES);

    (1..=interior / stride)
        .map(|k| (k * stride) as f64 * fin_spacing)
        .collect()
}

/// Front view: casing, fin pack, sampled fins, plate reference lines and the
/// FPI label.
pub fn generate_front_geometry(params: &CoilParameters) -> View {
    let mut view = View::new(ViewKind::Front);

    let cl = params.casing_left();
    let cb = params.casing_bottom();
    let fl = params.fin_length();
    let fh = params.fin_height();

    view.push(Primitive::rect(
        Layer::Casing,
        0.0,
        0.0,
        params.casing_width(),
        params.casing_height(),
    ));
    view.push(Primitive::rect(Layer::Coil, cl, cb, fl, fh));

    for dx in fin_sample_positions(fl, params.fin_spacing()) {
        let x = cl + dx;
        view.push(Primitive::line(
            Layer::Fin,
            Point2D::new(x, cb),
            Point2D::new(x, cb + fh),
        ));
    }

    // Centre lines of the bottom and top tubes.
    for y in [cb + params.bottom_plate(), cb + fh - params.top_plate()] {
        view.push(Primitive::line(
            Layer::Plate,
            Point2D::new(cl, y),
            Point2D::new(cl + fl, y),
        ));
    }

    let centre = Point2D::new(cl + fl / 2.0, cb + fh / 2.0 - LABEL_HEIGHT / 2.0);
    view.push(Primitive::text(
        Layer::Label,
        TextLabel::new(centre, format!("{} FPI", params.fpi()), LABEL_HEIGHT)
            .aligned(TextAlign::Center),
    ));

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use coilcad_params::RawParameters;

    #[test]
    fn test_fin_samples_are_capped_and_on_pitch() {
        let spacing = 25.4 / 13.0;
        let xs = fin_sample_positions(1330.0, spacing);
        assert_eq!(xs.len(), MAX_FIN_SAMPLES as usize);
        for x in &xs {
            let k = x / spacing;
            assert!((k - k.round()).abs() < 1e-9, "{x} is not on a fin");
            assert!(*x > 0.0 && *x < 1330.0);
        }
    }

    #[test]
    fn test_few_fins_are_all_drawn() {
        // 10 mm at 1 FPI: no interior fin.
        assert!(fin_sample_positions(10.0, 25.4).is_empty());
        // 100 mm at 1 FPI: fins at 25.4, 50.8, 76.2.
        assert_eq!(fin_sample_positions(100.0, 25.4).len(), 3);
    }

    #[test]
    fn test_front_outlines() {
        let params = RawParameters::default().validate().unwrap();
        let view = generate_front_geometry(&params);

        assert_eq!(view.bounds.width(), params.casing_width());
        assert_eq!(view.bounds.height(), params.casing_height());
        assert_eq!(view.on_layer(Layer::Fin).count(), 40);

        let label = view.on_layer(Layer::Label).next().unwrap();
        match &label.shape {
            crate::Shape::Text(t) => assert_eq!(t.text, "13 FPI"),
            other => panic!("expected text, got {other:?}"),
        }
    }
}
