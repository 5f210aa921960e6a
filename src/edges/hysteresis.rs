//! Double-threshold hysteresis.
//!
//! Pixels with magnitude `>= high` seed a flood fill that keeps every
//! 8-connected pixel with magnitude `>= low` (and non-zero). The fill uses an
//! explicit stack so long edges cannot overflow the call stack.
use crate::edges::edge_map::EdgeMap;
use crate::image::{ImageF32, ImageView};

pub fn hysteresis(magnitude: &ImageF32, low: f32, high: f32) -> EdgeMap {
    let w = magnitude.width();
    let h = magnitude.height();
    let mut out = EdgeMap::new(w, h);
    let mut stack: Vec<(usize, usize)> = Vec::new();

    let keep = |m: f32| m > 0.0 && m >= low;

    for y in 0..h {
        for x in 0..w {
            let m = magnitude.get(x, y);
            if m <= 0.0 || m < high || out.is_foreground(x as i64, y as i64) {
                continue;
            }
            out.set(x as i64, y as i64, true);
            stack.push((x, y));
            while let Some((cx, cy)) = stack.pop() {
                for dy in -1i64..=1 {
                    for dx in -1i64..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = cx as i64 + dx;
                        let ny = cy as i64 + dy;
                        if !magnitude.in_bounds(nx, ny) || out.is_foreground(nx, ny) {
                            continue;
                        }
                        if keep(magnitude.get(nx as usize, ny as usize)) {
                            out.set(nx, ny, true);
                            stack.push((nx as usize, ny as usize));
                        }
                    }
                }
            }
        }
    }

    out
}
