use block_diagram_detector::classifier::ObjectType;
use block_diagram_detector::prelude::*;
use block_diagram_detector::tracer::CancellationToken;
use std::sync::Arc;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

// Demo: a boxed circle on a white canvas, parsed without trained statistics
// so every outer region has to be labelled by hand.
fn run() -> Result<(), String> {
    let (w, h) = (160usize, 100usize);
    let rgba = synthetic_diagram(w, h);
    let image = ImageRgba {
        w,
        h,
        stride: w * 4,
        data: &rgba,
    };

    let canny = CannyDetector::new(CannyParams::default());
    let out = canny
        .detect_with_diagnostics(&image)
        .map_err(|e| e.to_string())?;
    println!(
        "edges: {} foreground pixels in {:.3} ms",
        out.edge_map.foreground_count(),
        out.timings.total_ms
    );

    let mut parser = DiagramParser::new(
        out.edge_map,
        Arc::new(StatisticsTable::default()),
        ParserParams::default(),
    )
    .map_err(|e| e.to_string())?;
    let result = parser
        .run(&CancellationToken::new())
        .map_err(|e| e.to_string())?;
    println!("result={result:?} state={}", parser.state());

    if parser.state() == ParserState::PartialRecognized {
        let pending: Vec<(RegionId, i64)> = parser
            .unrecognized_regions()
            .map_err(|e| e.to_string())?
            .iter()
            .map(|r| (r.id(), r.bounds().area()))
            .collect();
        let largest = pending.iter().max_by_key(|p| p.1).map(|p| p.0);
        for (id, _) in pending {
            let label = if Some(id) == largest {
                ObjectType::Rectangle
            } else {
                ObjectType::Noise
            };
            parser
                .set_recognition(id, label)
                .map_err(|e| e.to_string())?;
            println!("  {id} -> {label}");
        }
    }

    let history: Vec<String> = parser.history().map(|s| s.to_string()).collect();
    println!("history: {}", history.join(" -> "));
    print!("{}", parser.ast());
    Ok(())
}

fn synthetic_diagram(w: usize, h: usize) -> Vec<u8> {
    let mut rgba = vec![255u8; w * h * 4];
    let (cx, cy, r) = (80.0f32, 50.0f32, 12.0f32);
    for y in 0..h {
        for x in 0..w {
            let in_frame = (20..140).contains(&x) && (15..85).contains(&y);
            let in_hole = (23..137).contains(&x) && (18..82).contains(&y);
            let d = (x as f32 - cx).hypot(y as f32 - cy);
            if (in_frame && !in_hole) || d <= r {
                let i = (y * w + x) * 4;
                rgba[i..i + 3].fill(0);
            }
        }
    }
    rgba
}
