//! Canvas 2D backend

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::palette::TEDX_RED;
use super::shapes::{DrawCmd, WATERMARK};

const FONT_FAMILY: &str = "Montserrat, sans-serif";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    pub fn render(&self, cmds: &[DrawCmd]) -> Result<(), JsValue> {
        for cmd in cmds {
            self.draw(cmd)?;
        }
        Ok(())
    }

    fn draw(&self, cmd: &DrawCmd) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Rect { pos, size, color } => {
                ctx.set_fill_style_str(color);
                ctx.fill_rect(pos.x.into(), pos.y.into(), size.x.into(), size.y.into());
            }
            DrawCmd::Line {
                from,
                to,
                width,
                color,
                alpha,
            } => {
                ctx.save();
                ctx.set_global_alpha((*alpha).into());
                ctx.set_stroke_style_str(color);
                ctx.set_line_width((*width).into());
                ctx.begin_path();
                ctx.move_to(from.x.into(), from.y.into());
                ctx.line_to(to.x.into(), to.y.into());
                ctx.stroke();
                ctx.restore();
            }
            DrawCmd::Glyph {
                text,
                pos,
                size,
                color,
                shadow,
            } => {
                ctx.save();
                ctx.set_fill_style_str(color);
                ctx.set_font(&format!("bold {size}px {FONT_FAMILY}"));
                ctx.set_text_align("center");
                ctx.set_text_baseline("bottom");
                if let Some(shadow) = shadow {
                    ctx.set_shadow_color(shadow);
                    ctx.set_shadow_blur(10.0);
                    ctx.set_shadow_offset_y(5.0);
                }
                ctx.fill_text(text, pos.x.into(), pos.y.into())?;
                ctx.restore();
            }
            DrawCmd::Watermark { pos, size, alpha } => {
                ctx.save();
                ctx.set_global_alpha((*alpha).into());
                ctx.set_fill_style_str(TEDX_RED);
                ctx.set_font(&format!("bold {size}px {FONT_FAMILY}"));
                ctx.set_text_align("left");
                ctx.set_text_baseline("middle");
                ctx.fill_text(WATERMARK, pos.x.into(), pos.y.into())?;
                ctx.restore();
            }
            DrawCmd::Dot {
                center,
                radius,
                color,
                alpha,
            } => {
                ctx.set_global_alpha((*alpha).into());
                ctx.set_fill_style_str(color);
                ctx.begin_path();
                ctx.arc(
                    center.x.into(),
                    center.y.into(),
                    (*radius).into(),
                    0.0,
                    std::f64::consts::TAU,
                )?;
                ctx.fill();
                ctx.set_global_alpha(1.0);
            }
        }
        Ok(())
    }
}
