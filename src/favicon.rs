//! Dynamically generated favicon.
//!
//! The icon is drawn on an offscreen canvas and installed as a PNG data
//! URL, so the accent color only lives in one place.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlLinkElement};

use crate::util;

const SIZE: f64 = 16.0;

fn draw(ctx: &CanvasRenderingContext2d, color: &str) {
    let r = 3.0;
    ctx.begin_path();
    ctx.move_to(r, 0.0);
    ctx.line_to(SIZE - r, 0.0);
    ctx.quadratic_curve_to(SIZE, 0.0, SIZE, r);
    ctx.line_to(SIZE, SIZE - r);
    ctx.quadratic_curve_to(SIZE, SIZE, SIZE - r, SIZE);
    ctx.line_to(r, SIZE);
    ctx.quadratic_curve_to(0.0, SIZE, 0.0, SIZE - r);
    ctx.line_to(0.0, r);
    ctx.quadratic_curve_to(0.0, 0.0, r, 0.0);
    ctx.close_path();
    ctx.set_fill_style_str(color);
    ctx.fill();
    // Color-indicator stripe, echoing the region cards.
    ctx.set_fill_style_str("rgba(255,255,255,0.85)");
    ctx.fill_rect(3.0, 3.0, 2.0, 10.0);
}

/// Render the icon and point `link[rel=icon]` at it, creating the link
/// element when the page has none.
pub fn install(color: &str) {
    let document = util::document();
    let Ok(canvas) = document.create_element("canvas") else {
        return;
    };
    let Ok(canvas) = canvas.dyn_into::<HtmlCanvasElement>() else {
        return;
    };
    canvas.set_width(SIZE as u32);
    canvas.set_height(SIZE as u32);
    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
    else {
        return;
    };
    draw(&ctx, color);
    let Ok(data_url) = canvas.to_data_url() else {
        return;
    };

    let link = document
        .query_selector("link[rel~=icon]")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlLinkElement>().ok());
    let link = match link {
        Some(link) => link,
        None => {
            let Some(created) = document
                .create_element("link")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlLinkElement>().ok())
            else {
                return;
            };
            created.set_rel("icon");
            if let Some(head) = document.head() {
                head.append_child(&created).ok();
            }
            created
        }
    };
    link.set_type("image/png");
    link.set_href(&data_url);
}
