//! Search rectangles and their clamping against the target.

/// A sub-pixel position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Requested region of candidate template centers, in target pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SearchRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl SearchRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Template margins around a candidate center.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl Insets {
    /// Insets of a `width x height` template: `left = width / 2`,
    /// `right = width - left`, and likewise vertically.
    pub fn for_template(width: usize, height: usize) -> Self {
        let left = width / 2;
        let top = height / 2;
        Self {
            left,
            right: width - left,
            top,
            bottom: height - top,
        }
    }
}

/// A search rectangle after clamping; every offset `0..=width` by
/// `0..=height` places the whole template inside the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchArea {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub insets: Insets,
}

impl SearchArea {
    /// Target coordinates of the window the search reads.
    pub fn window_origin(&self) -> (usize, usize) {
        (self.x - self.insets.left, self.y - self.insets.top)
    }

    /// Size of the window the search reads.
    pub fn window_size(&self) -> (usize, usize) {
        (
            self.width + self.insets.left + self.insets.right,
            self.height + self.insets.top + self.insets.bottom,
        )
    }
}

/// Clamps `rect` so a template with `insets` fits at every offset inside a
/// `target_width x target_height` target.
///
/// Returns `None` when nothing remains to search.
pub fn clamp_search_rect(
    rect: SearchRect,
    target_width: usize,
    target_height: usize,
    insets: Insets,
) -> Option<SearchArea> {
    let (x, width) = clamp_axis(
        rect.x,
        rect.width,
        target_width,
        insets.left,
        insets.right,
    )?;
    let (y, height) = clamp_axis(
        rect.y,
        rect.height,
        target_height,
        insets.top,
        insets.bottom,
    )?;
    Some(SearchArea {
        x,
        y,
        width,
        height,
        insets,
    })
}

fn clamp_axis(
    start: i32,
    len: i32,
    extent: usize,
    before: usize,
    after: usize,
) -> Option<(usize, usize)> {
    let extent = i64::try_from(extent).ok()?;
    let before = i64::try_from(before).ok()?;
    let after = i64::try_from(after).ok()?;
    let start = i64::from(start).min(extent - after).max(before);
    let len = i64::from(len).min(extent - start - after);
    if len <= 0 {
        return None;
    }
    Some((usize::try_from(start).ok()?, usize::try_from(len).ok()?))
}
