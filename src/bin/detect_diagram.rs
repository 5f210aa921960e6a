use block_diagram_detector::config::load_config;
use block_diagram_detector::edges::CannyDetector;
use block_diagram_detector::image::io::{load_rgba_image, save_edge_map, write_json_file};
use block_diagram_detector::parser::{DiagramParser, ParserTask};
use block_diagram_detector::statistics::load_statistics;
use std::env;
use std::path::Path;
use std::sync::Arc;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let rgba = load_rgba_image(&config.input)?;
    let canny = CannyDetector::new(config.canny.clone());
    let edges = canny
        .detect_with_diagnostics(&rgba.as_view())
        .map_err(|e| format!("Edge detection failed: {e}"))?;
    save_edge_map(&edges.edge_map, &config.output.edge_image)?;
    println!(
        "Saved edge map ({} edge pixels, {:.2} ms) to {}",
        edges.edge_map.foreground_count(),
        edges.timings.total_ms,
        config.output.edge_image.display()
    );

    let stats = load_statistics(&config.statistics)?;
    let parser = DiagramParser::new(edges.edge_map, Arc::new(stats), config.parser.clone())
        .map_err(|e| format!("Parser setup failed: {e}"))?;
    let task = ParserTask::spawn(parser);
    let event = task
        .events()
        .recv()
        .map_err(|_| "Parser stopped without a finish event".to_string())?;
    println!(
        "Finished: {:?} ({} regions, {} unrecognized)",
        event.result,
        event.regions.len(),
        event.unrecognized.len()
    );
    let (parser, _events) = task
        .join()
        .map_err(|e| format!("Parsing failed: {e}"))?;

    let mut report = parser.report();
    report.timings.merge(&edges.timings);
    write_json_file(&config.output.report_json, &report)?;
    print!("{report}");
    print!("{}", parser.ast());
    println!("Saved report to {}", config.output.report_json.display());
    Ok(())
}

fn usage() -> String {
    "Usage: detect_diagram <config.json>".to_string()
}
