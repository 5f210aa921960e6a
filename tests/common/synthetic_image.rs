#![allow(dead_code)]

use block_diagram_detector::edges::EdgeMap;

/// Membership test for a synthetic shape.
pub type Shape = Box<dyn Fn(i64, i64) -> bool>;

pub fn rect(left: i64, top: i64, right: i64, bottom: i64) -> Shape {
    Box::new(move |x, y| x >= left && x <= right && y >= top && y <= bottom)
}

pub fn ellipse(cx: i64, cy: i64, rx: i64, ry: i64) -> Shape {
    assert!(rx > 0 && ry > 0, "ellipse radii must be positive");
    Box::new(move |x, y| {
        let dx = (x - cx) as f64 / rx as f64;
        let dy = (y - cy) as f64 / ry as f64;
        dx * dx + dy * dy <= 1.0
    })
}

pub fn circle(cx: i64, cy: i64, r: i64) -> Shape {
    ellipse(cx, cy, r, r)
}

/// Right triangle with the right angle at `(x0, y0)` and legs running right
/// and down.
pub fn right_triangle(x0: i64, y0: i64, leg: i64) -> Shape {
    Box::new(move |x, y| x >= x0 && y >= y0 && (x - x0) + (y - y0) <= leg)
}

/// Marks the shape's boundary: member pixels with a 4-neighbour outside.
pub fn draw_outline(edges: &mut EdgeMap, shape: &Shape) {
    let (w, h) = (edges.bounds().width() as i64, edges.bounds().height() as i64);
    for y in 0..h {
        for x in 0..w {
            if !shape(x, y) {
                continue;
            }
            let exposed = [(1, 0), (-1, 0), (0, 1), (0, -1)]
                .iter()
                .any(|&(dx, dy)| !shape(x + dx, y + dy));
            if exposed {
                edges.set(x, y, true);
            }
        }
    }
}

/// Edge map holding the outlines of `shapes`.
pub fn outline_map(width: usize, height: usize, shapes: &[Shape]) -> EdgeMap {
    let mut edges = EdgeMap::new(width, height);
    for shape in shapes {
        draw_outline(&mut edges, shape);
    }
    edges
}

/// Edge map with every member pixel of `shapes` set.
pub fn filled_map(width: usize, height: usize, shapes: &[Shape]) -> EdgeMap {
    EdgeMap::from_fn(width, height, |x, y| {
        shapes.iter().any(|s| s(x as i64, y as i64))
    })
}

/// Opaque RGBA canvas: white background, shapes filled black.
pub fn rgba_canvas(width: usize, height: usize, shapes: &[Shape]) -> Vec<u8> {
    let mut rgba = vec![255u8; width * height * 4];
    for y in 0..height {
        for x in 0..width {
            if shapes.iter().any(|s| s(x as i64, y as i64)) {
                let i = (y * width + x) * 4;
                rgba[i..i + 3].fill(0);
            }
        }
    }
    rgba
}
