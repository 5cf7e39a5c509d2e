// src/app/gfx.rs
use eframe::egui::{self as eg, ColorImage, TextureHandle};

/// Upload an RGBA image to a GPU texture. (UI thread only)
pub fn upload_rgba(
    ctx: &eg::Context,
    w: u32,
    h: u32,
    bytes: &[u8],
    name: &str,
) -> Result<TextureHandle, String> {
    let expected = (w as usize) * (h as usize) * 4;
    if w == 0 || h == 0 || bytes.len() != expected {
        return Err(format!("bad rgba buffer {w}x{h} ({} bytes)", bytes.len()));
    }
    let img = ColorImage::from_rgba_unmultiplied([w as usize, h as usize], bytes);
    Ok(ctx.load_texture(name.to_string(), img, eg::TextureOptions::LINEAR))
}

/// Size that fits `tex` into `max_w`, keeping its aspect ratio.
pub fn fit_width(tex: &TextureHandle, max_w: f32) -> eg::Vec2 {
    let size = tex.size_vec2();
    if size.x <= 0.0 {
        return eg::vec2(max_w, max_w * 0.56);
    }
    eg::vec2(max_w, size.y * (max_w / size.x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffers() {
        let ctx = eg::Context::default();
        assert!(upload_rgba(&ctx, 2, 2, &[0u8; 15], "x").is_err());
        assert!(upload_rgba(&ctx, 0, 2, &[], "x").is_err());
    }

    #[test]
    fn uploads_and_fits() {
        let ctx = eg::Context::default();
        let tex = upload_rgba(&ctx, 4, 6, &[255u8; 4 * 6 * 4], "poster").unwrap();
        let size = fit_width(&tex, 200.0);
        assert_eq!(size, eg::vec2(200.0, 300.0));
    }
}
