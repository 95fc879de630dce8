//! Match preview rendering.

use crate::image::{PixelBuffer, TargetWindow};
use crate::template::Template;

/// Copies the template-sized patch of the window at `offset`.
///
/// Pixels under opaque template pixels get alpha 255, the rest alpha 0.
/// Returns `None` if the patch does not fit in the window.
pub(crate) fn render_preview(
    window: &TargetWindow,
    template: &Template,
    offset: (usize, usize),
) -> Option<PixelBuffer> {
    let (ox, oy) = offset;
    let transparent = template.plan().transparent();
    let width = template.width();
    let mut data = Vec::with_capacity(transparent.len());
    for y in 0..template.height() {
        for x in 0..width {
            let px = window.pixel(ox + x, oy + y)?;
            data.push(if transparent[y * width + x] {
                px.with_alpha(0)
            } else {
                px
            });
        }
    }
    PixelBuffer::new(data, width, template.height()).ok()
}
