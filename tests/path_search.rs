use trackmatch::{
    LineConstraint, MatchConfig, Matcher, PeakModel, PixelBuffer, Point, Rgba, SearchKind,
    SearchRect,
};

fn textured(width: usize, height: usize) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let v = (x * 37 + y * 91) ^ (x * y * 5);
        Rgba::opaque((v % 251) as u8, ((v / 7) % 253) as u8, ((x * 17 + y * 3) % 256) as u8)
    })
    .unwrap()
}

/// Column profile of a soft vertical bar centered at `center`.
fn bar(width: usize, height: usize, center: f64) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, _| {
        let d = x as f64 + 0.5 - center;
        let v = (40.0 + 180.0 * (-d * d / 12.5).exp() + 0.5).floor() as u8;
        Rgba::opaque(v, 60, 60)
    })
    .unwrap()
}

/// Row profile of a soft horizontal bar centered at `center`.
fn bar_rows(width: usize, height: usize, center: f64) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |_, y| {
        let d = y as f64 + 0.5 - center;
        let v = (40.0 + 180.0 * (-d * d / 12.5).exp() + 0.5).floor() as u8;
        Rgba::opaque(60, v, 60)
    })
    .unwrap()
}

fn textured_matcher() -> (PixelBuffer, Matcher) {
    let target = textured(40, 30);
    let sample = target.view().roi(12, 9, 7, 5).unwrap().to_owned_buffer();
    (target, Matcher::new(sample, None))
}

#[test]
fn line_missing_rect_reports_negative_width() {
    let (target, mut matcher) = textured_matcher();
    let line = LineConstraint::new(Point::new(0.0, 100.0), 0.0);
    let result = matcher.find_match_along_line(target.view(), SearchRect::new(5, 5, 25, 18), line);
    assert_eq!(result.kind, SearchKind::Line);
    assert!(!result.is_match());
    assert!(result.peak_height.is_nan());
    assert!(result.peak_width < 0.0);
    assert_eq!(matcher.last_peak().0, result.peak_width);

    let grid = matcher.find_match(target.view(), SearchRect::new(5, 5, 0, 0));
    assert!(grid.peak_width.is_nan());
}

#[test]
fn degenerate_rect_is_not_a_line_miss() {
    let (target, mut matcher) = textured_matcher();
    let degenerate = matcher.find_match_along_line(
        target.view(),
        SearchRect::new(5, 5, 0, 0),
        LineConstraint::new(Point::new(5.0, 5.0), 0.3),
    );
    assert_eq!(degenerate.kind, SearchKind::Line);
    assert!(!degenerate.is_match());
    assert!(degenerate.peak_height.is_nan());
    assert!(degenerate.peak_width.is_nan());
    let (width, height) = matcher.last_peak();
    assert!(width.is_nan() && height.is_nan());
}

#[test]
fn horizontal_line_finds_exact_copy() {
    let (target, mut matcher) = textured_matcher();
    // 7x5 template: left = 3, top = 2; row 11 holds centers of top-left row 9
    let line = LineConstraint::new(Point::new(0.0, 11.5), 0.0);
    let result = matcher.find_match_along_line(target.view(), SearchRect::new(5, 5, 25, 18), line);
    let location = result.location.unwrap();
    assert_eq!((location.x, location.y), (12.0, 9.0));
    assert!(result.peak_height.is_infinite());
    assert!(result.peak_width.is_nan());
    assert_eq!(result.preview.unwrap().dimensions(), (7, 5));
}

#[test]
fn diagonal_line_through_match_center() {
    let (target, mut matcher) = textured_matcher();
    let line = LineConstraint::new(Point::new(15.5, 11.5), 0.6);
    let result = matcher.find_match_along_line(target.view(), SearchRect::new(5, 5, 25, 18), line);
    let location = result.location.unwrap();
    assert_eq!((location.x, location.y), (12.0, 9.0));
    assert!(result.peak_height.is_infinite());
}

#[test]
fn angle_is_counter_clockwise_with_y_up() {
    let (target, mut matcher) = textured_matcher();
    let rect = SearchRect::new(5, 5, 25, 18);
    // anchor 8 px from the copy's center (15.5, 11.5) along 30 degrees, y up
    let theta = std::f64::consts::FRAC_PI_6;
    let anchor = Point::new(15.5 + 8.0 * theta.cos(), 11.5 - 8.0 * theta.sin());

    let line = LineConstraint::new(anchor, theta);
    let result = matcher.find_match_along_line(target.view(), rect, line);
    let location = result.location.unwrap();
    assert_eq!((location.x, location.y), (12.0, 9.0));
    assert!(result.peak_height.is_infinite());

    // the mirrored line leaves the area above the copy
    let mirrored_line = LineConstraint::new(anchor, -theta);
    let mirrored = matcher.find_match_along_line(target.view(), rect, mirrored_line);
    assert!(mirrored.is_match());
    assert!(!mirrored.peak_height.is_infinite());
}

#[test]
fn spread_reaches_parallel_lines() {
    let (target, mut matcher) = textured_matcher();
    let rect = SearchRect::new(5, 5, 25, 18);
    let off_line = LineConstraint::new(Point::new(0.0, 13.5), 0.0);

    let narrow = matcher.find_match_along_line(target.view(), rect, off_line.with_spread(1));
    assert!(narrow.peak_height.is_finite());

    let wide = matcher.find_match_along_line(target.view(), rect, off_line.with_spread(2));
    let location = wide.location.unwrap();
    assert_eq!((location.x, location.y), (12.0, 9.0));
    assert!(wide.peak_height.is_infinite());
}

#[test]
fn best_at_line_end_skips_refinement() {
    let target = PixelBuffer::from_fn(40, 20, |x, _| Rgba::opaque((x * 6) as u8, 50, 50)).unwrap();
    let sample = target.view().roi(30, 10, 5, 5).unwrap().to_owned_buffer();
    let mut matcher = Matcher::new(sample, None);

    // centers x in [5, 15]: top-left columns 3..=12, all left of the copy
    let line = LineConstraint::new(Point::new(0.0, 12.5), 0.0);
    let result = matcher.find_match_along_line(target.view(), SearchRect::new(5, 5, 10, 10), line);
    let location = result.location.unwrap();
    assert_eq!((location.x, location.y), (12.0, 10.0));
    assert!(result.peak_height.is_finite() && result.peak_height > 0.0);
    assert!(result.peak_width.is_nan());
}

#[test]
fn line_fit_refines_along_direction() {
    // bar centered at 5.5 in the template and 20.3 in the target: shift 14.8
    let target = bar(40, 20, 20.3);
    let sample = bar(11, 7, 5.5);
    let rect = SearchRect::new(5, 5, 30, 10);
    let line = LineConstraint::new(Point::new(0.0, 10.5), 0.0);

    let mut gaussian = Matcher::new(sample.clone(), None);
    let result = gaussian.find_match_along_line(target.view(), rect, line);
    let location = result.location.unwrap();
    assert!((location.x - 14.8).abs() < 0.2, "{location:?}");
    assert!(location.x < 15.0);
    assert_eq!(location.y, 7.0);
    assert!(result.peak_width > 0.0);
    assert!(result.is_usable(trackmatch::USABLE_PEAK_HEIGHT));

    let mut parabola = Matcher::new(sample, None).with_config(MatchConfig {
        peak_model: PeakModel::Parabola,
        ..MatchConfig::default()
    });
    let result = parabola.find_match_along_line(target.view(), rect, line);
    let location = result.location.unwrap();
    assert!((location.x - 14.8).abs() < 0.05, "{location:?}");
}

#[test]
fn vertical_line_delta_follows_searched_direction() {
    // bar rows centered at 5.5 in the template and 20.3 in the target: shift 14.8
    let target = bar_rows(20, 40, 20.3);
    let sample = bar_rows(7, 11, 5.5);
    let rect = SearchRect::new(5, 5, 10, 30);
    let mut matcher = Matcher::new(sample, None).with_config(MatchConfig {
        peak_model: PeakModel::Parabola,
        ..MatchConfig::default()
    });

    for angle in [std::f64::consts::FRAC_PI_2, -std::f64::consts::FRAC_PI_2] {
        let line = LineConstraint::new(Point::new(10.5, 0.0), angle);
        let result = matcher.find_match_along_line(target.view(), rect, line);
        let location = result.location.unwrap();
        assert!((location.y - 14.8).abs() < 0.05, "{angle}: {location:?}");
        assert_eq!(location.x, 7.0);
    }
}
