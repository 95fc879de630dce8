use trackmatch::{
    EllipseRegion, Matcher, PixelBuffer, RectRegion, Rgba, SearchRect, TemplateBuilder,
    TrackMatchError,
};

fn textured(width: usize, height: usize, seed: usize) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let v = (x * 37 + y * 91 + seed * 13) ^ (x * y);
        Rgba::opaque((v % 256) as u8, ((v / 3) % 256) as u8, ((v * 7) % 256) as u8)
    })
    .unwrap()
}

#[test]
fn border_mask_trims_exactly_and_rebuilds_identically() {
    let (width, height, k) = (20, 16, 3);
    let sample = textured(width, height, 0);
    let mask = RectRegion::new(
        k as f64,
        k as f64,
        (width - 2 * k) as f64,
        (height - 2 * k) as f64,
    );

    let mut builder = TemplateBuilder::with_mask(sample.clone(), mask);
    let first = builder.template().clone();
    assert_eq!(first.width(), width - 2 * k);
    assert_eq!(first.height(), height - 2 * k);
    assert_eq!(first.trim_offsets(), (k, k));
    assert_eq!(first.pixels().get(0, 0), sample.get(k, k));

    builder.build(sample.view(), 255, 0).unwrap();
    let second = builder.template();
    assert_eq!(second.pixels(), first.pixels());
    assert_eq!(second.plan().red(), first.plan().red());
    assert_eq!(second.plan().transparent(), first.plan().transparent());

    let other = TemplateBuilder::with_mask(sample.clone(), mask);
    assert_eq!(other.template().pixels(), first.pixels());
}

#[test]
fn ellipse_mask_keeps_border_free_template() {
    let sample = textured(15, 11, 4);
    let builder = TemplateBuilder::with_mask(sample, EllipseRegion::inscribed(0.0, 0.0, 15.0, 11.0));
    let template = builder.template();
    let (w, h) = (template.width(), template.height());
    let transparent = template.plan().transparent();
    assert!((0..h).any(|y| !transparent[y * w]));
    assert!((0..h).any(|y| !transparent[y * w + w - 1]));
    assert!((0..w).any(|x| !transparent[x]));
    assert!((0..w).any(|x| !transparent[(h - 1) * w + x]));
    assert!(transparent.iter().any(|&t| t));
    for (px, &t) in template.pixels().data().iter().zip(transparent) {
        if t {
            assert_eq!(*px, Rgba::TRANSPARENT);
        }
    }
}

#[test]
fn mismatched_sample_is_rejected_without_changes() {
    let mut builder = TemplateBuilder::new(textured(8, 6, 1), None);
    let before = builder.template().clone();
    let err = builder.build(textured(8, 7, 1).view(), 255, 0).err().unwrap();
    assert_eq!(
        err,
        TrackMatchError::DimensionMismatch {
            expected_width: 8,
            expected_height: 6,
            width: 8,
            height: 7,
        }
    );
    assert_eq!(builder.template().pixels(), before.pixels());
}

#[test]
fn zero_weights_keep_current_template() {
    let reference = textured(8, 6, 1);
    let mut builder = TemplateBuilder::new(reference.clone(), None);
    let template = builder.build(textured(8, 6, 9).view(), 0, 0).unwrap();
    assert_eq!(template.pixels(), &reference);
    assert_eq!(builder.weights(), (255, 0));
}

#[test]
fn weights_blend_sample_with_reference() {
    let reference = PixelBuffer::filled(4, 4, Rgba::opaque(255, 0, 0)).unwrap();
    let sample = PixelBuffer::filled(4, 4, Rgba::opaque(0, 0, 255)).unwrap();
    let mut builder = TemplateBuilder::new(reference.clone(), None);

    let template = builder.build(sample.view(), 255, 128).unwrap();
    assert_eq!(template.pixels().get(2, 2), Some(Rgba::opaque(128, 0, 127)));
    assert_eq!(builder.weights(), (255, 128));

    // the sample alone replaces the working image
    let template = builder.build(sample.view(), 255, 0).unwrap();
    assert_eq!(template.pixels(), &sample);
    assert_eq!(builder.reference(), &reference);
}

#[test]
fn working_pixels_can_be_restored() {
    let reference = textured(6, 6, 2);
    let mut builder = TemplateBuilder::new(reference.clone(), None);
    let saved = builder.working_pixels().clone();

    builder.build(textured(6, 6, 5).view(), 255, 0).unwrap();
    assert_ne!(builder.working_pixels(), &saved);

    builder.set_working_pixels(saved.clone()).unwrap();
    assert_eq!(builder.working_pixels(), &saved);
    builder.build(reference.view(), 255, 0).unwrap();
    assert_eq!(builder.template().pixels(), &reference);

    let wrong = PixelBuffer::filled(5, 6, Rgba::TRANSPARENT).unwrap();
    assert!(builder.set_working_pixels(wrong).is_err());
}

#[test]
fn set_template_with_new_size_resets_reference() {
    let mut builder = TemplateBuilder::new(textured(6, 6, 2), None);
    let larger = textured(9, 7, 3);
    builder.replace_template(larger.clone());
    assert_eq!(builder.reference(), &larger);
    assert_eq!(builder.template().pixels(), &larger);
    assert_eq!(builder.weights(), (255, 0));
}

#[test]
fn excluded_ring_does_not_affect_matching() {
    let interior = textured(8, 8, 7);
    let with_ring = |ring: Rgba| {
        PixelBuffer::from_fn(10, 10, |x, y| {
            if (1..9).contains(&x) && (1..9).contains(&y) {
                interior.get(x - 1, y - 1).unwrap()
            } else {
                ring
            }
        })
        .unwrap()
    };
    let mask = RectRegion::new(1.0, 1.0, 8.0, 8.0);
    let mut dark = Matcher::with_mask(with_ring(Rgba::opaque(0, 0, 0)), mask);
    let mut bright = Matcher::with_mask(with_ring(Rgba::opaque(255, 255, 255)), mask);
    assert_eq!(dark.template().pixels(), bright.template().pixels());
    assert_eq!((dark.template().width(), dark.template().height()), (8, 8));

    let target = PixelBuffer::from_fn(40, 40, |x, y| {
        if (20..28).contains(&x) && (14..22).contains(&y) {
            interior.get(x - 20, y - 14).unwrap()
        } else {
            Rgba::opaque(((x * 5) % 256) as u8, 90, ((y * 3) % 256) as u8)
        }
    })
    .unwrap();
    let rect = SearchRect::new(10, 10, 20, 20);
    let a = dark.find_match(target.view(), rect);
    let b = bright.find_match(target.view(), rect);
    assert_eq!(a.location, b.location);
    assert_eq!(a.peak_height.to_bits(), b.peak_height.to_bits());
    let location = a.location.unwrap();
    // sample origin sits one pixel up-left of the matched interior
    assert_eq!((location.x, location.y), (19.0, 13.0));
}
