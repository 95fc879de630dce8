//! SRC_OVER compositing of a sample onto the working image.

use crate::image::{PixelBuffer, PixelView, Rgba};

/// Composites `src` over `dst` with an extra opacity in `0..=255`.
///
/// Colors are non-premultiplied. An opacity of zero leaves `dst` untouched and
/// an opacity of 255 with an opaque source copies the source exactly.
/// `src` must have the same dimensions as `dst`.
pub(crate) fn composite_over(dst: &mut PixelBuffer, src: PixelView<'_>, opacity: u8) {
    if opacity == 0 {
        return;
    }
    debug_assert_eq!((src.width(), src.height()), dst.dimensions());
    let extra = opacity as f64 / 255.0;
    let width = dst.width();
    for (y, dst_row) in dst.data_mut().chunks_exact_mut(width).enumerate() {
        let Some(src_row) = src.row(y) else {
            break;
        };
        for (d, &s) in dst_row.iter_mut().zip(src_row) {
            *d = over(s, *d, extra);
        }
    }
}

fn over(src: Rgba, dst: Rgba, extra: f64) -> Rgba {
    let sa = src.a as f64 / 255.0 * extra;
    let da = dst.a as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba::TRANSPARENT;
    }
    let dst_weight = da * (1.0 - sa);
    let mix = |s: u8, d: u8| to_u8((s as f64 * sa + d as f64 * dst_weight) / out_a);
    Rgba {
        r: mix(src.r, dst.r),
        g: mix(src.g, dst.g),
        b: mix(src.b, dst.b),
        a: to_u8(out_a * 255.0),
    }
}

#[inline]
fn to_u8(v: f64) -> u8 {
    (v + 0.5).floor().clamp(0.0, 255.0) as u8
}
