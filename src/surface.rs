//! Drawing seam between the engine and the page. The engine only needs a
//! fixed-size raster with rect fills, atlas blits and text; `CanvasSurface`
//! provides that over a 2d canvas context.

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::sprites::SpriteRegion;
use crate::util::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

impl TextAlign {
    fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font: &'static str,
    pub color: &'static str,
    pub align: TextAlign,
}

pub trait Surface {
    /// Logical width in CSS pixels.
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    /// Copy `src` from the atlas into `dst`, scaling if sizes differ.
    fn blit(&mut self, src: &SpriteRegion, dst: Rect);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle);
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    atlas: HtmlImageElement,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    /// Sizes the canvas backing store for the display's pixel ratio so the
    /// pixel-art stays crisp on HiDPI screens; drawing stays in logical units.
    pub fn new(
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        atlas: HtmlImageElement,
        width: f64,
        height: f64,
    ) -> Self {
        let ratio = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .filter(|r| *r > 0.0)
            .unwrap_or(1.0);
        canvas.set_width((width * ratio).round() as u32);
        canvas.set_height((height * ratio).round() as u32);
        if ratio != 1.0 {
            canvas
                .set_attribute("style", &format!("width:{width}px; height:{height}px;"))
                .ok();
            ctx.scale(ratio, ratio).ok();
        }
        ctx.set_image_smoothing_enabled(false);
        Self { canvas, ctx, atlas, width, height }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn blit(&mut self, src: &SpriteRegion, dst: Rect) {
        self.ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.atlas,
                src.x,
                src.y,
                src.width,
                src.height,
                dst.x,
                dst.y,
                dst.width,
                dst.height,
            )
            .ok();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) {
        self.ctx.set_font(style.font);
        self.ctx.set_fill_style_str(style.color);
        self.ctx.set_text_align(style.align.as_css());
        self.ctx.fill_text(text, x, y).ok();
    }
}
