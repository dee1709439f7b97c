use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::conversion::shift_to_origin;
use crate::types::{BoxRecord, LabelRecord};

const CENTROID_RADIUS: i32 = 7;
const CENTROID_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

// Palette size; hues are spread evenly so neighbouring class ids stay distinct
const PALETTE_CLASSES: i64 = 80;

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb<u8> {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Rgb([
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    ])
}

/// Deterministic color for a class id.
pub fn class_color(class_id: i64) -> Rgb<u8> {
    let slot = class_id.rem_euclid(PALETTE_CLASSES);
    let hue = (slot as f32 / PALETTE_CLASSES as f32) * 360.0;
    hsv_to_rgb(hue, 0.8, 0.9)
}

/// Draw the centroid of each label as a filled circle.
///
/// Labels are expected in absolute units; the caller scales them first.
pub fn draw_centroids(image: &mut RgbImage, labels: &[LabelRecord]) {
    for label in labels {
        draw_filled_circle_mut(
            image,
            (label.x_center as i32, label.y_center as i32),
            CENTROID_RADIUS,
            CENTROID_COLOR,
        );
    }
}

/// Draw hollow rectangles for each box, shifted into the tile's local frame.
///
/// `origin` is the tile's top-left corner in source-image coordinates; pass
/// `(0, 0)` when the boxes are already tile-local. Boxes whose shifted
/// geometry has no positive extent are skipped rather than drawn inverted.
pub fn draw_boxes(image: &mut RgbImage, boxes: &[BoxRecord], origin: (i64, i64)) {
    for bbox in shift_to_origin(boxes, origin) {
        let width = bbox.x1 - bbox.x0;
        let height = bbox.y1 - bbox.y0;
        if width <= 0 || height <= 0 {
            continue;
        }

        let rect = Rect::at(bbox.x0 as i32, bbox.y0 as i32).of_size(width as u32, height as u32);
        draw_hollow_rect_mut(image, rect, class_color(bbox.class_id));
    }
}
