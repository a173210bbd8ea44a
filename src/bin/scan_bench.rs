use ropey::Rope;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use zlex::config::load_settings;
use zlex::perf;
use zlex::{render, LanguageId, Registry, Scanner, Settings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut lines: usize = 20_000;
    let mut iterations: usize = 20;
    let mut viewport: usize = 60;
    let mut file: Option<PathBuf> = None;
    let mut settings_path: Option<PathBuf> = None;
    let mut log_dir: Option<PathBuf> = None;

    for arg in std::env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--lines=") {
            lines = value.parse().unwrap_or(lines);
        } else if let Some(value) = arg.strip_prefix("--iterations=") {
            iterations = value.parse().unwrap_or(iterations);
        } else if let Some(value) = arg.strip_prefix("--viewport=") {
            viewport = value.parse().unwrap_or(viewport);
        } else if let Some(value) = arg.strip_prefix("--file=") {
            file = Some(PathBuf::from(value));
        } else if let Some(value) = arg.strip_prefix("--settings=") {
            settings_path = Some(PathBuf::from(value));
        } else if let Some(value) = arg.strip_prefix("--log-dir=") {
            log_dir = Some(PathBuf::from(value));
        }
    }

    let _logging = zlex::logging::init(log_dir.as_deref())?;

    let settings = match &settings_path {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    let registry = Registry::from_settings(&settings)?;

    let (text, grammar) = match &file {
        Some(path) => {
            let grammar = registry
                .for_path(path)
                .ok_or_else(|| format!("no grammar for {}", path.display()))?;
            (std::fs::read_to_string(path)?, grammar)
        }
        None => {
            let grammar = registry
                .for_extension(LanguageId::Ring.name())
                .ok_or("ring grammar missing")?;
            (generate_ring(lines), grammar)
        }
    };

    let mut spans = 0usize;
    let mut relevance = 0u64;
    let scan_start = Instant::now();
    for _ in 0..iterations {
        let _scope = perf::scope("bench.scan");
        let mut scanner = Scanner::with_options(&grammar, &text, settings.scan);
        for span in scanner.by_ref() {
            span?;
            spans += 1;
        }
        relevance = scanner.relevance();
    }
    print_scan_summary(iterations, text.len(), spans, relevance, scan_start.elapsed());

    let rope = Rope::from_str(&text);
    let total_lines = rope.len_lines();
    let stride = viewport.saturating_mul(50).max(1);
    let render_start = Instant::now();
    let mut frames = 0usize;
    for start in (0..total_lines).step_by(stride) {
        let _scope = perf::scope("bench.render");
        render::highlight_lines(&grammar, &rope, start, start + viewport)?;
        frames += 1;
    }
    print_render_summary(frames, render_start.elapsed());

    let report = perf::Report::take();
    if !report.is_empty() {
        println!("perf:\n{}", report);
    }
    Ok(())
}

fn generate_ring(lines: usize) -> String {
    const BLOCK: &str = r#"load "stdlib.ring"
# scanner settings
/* block comment /* nested */ still comment */
class Shape from Base
    name = "shape #{ "inner" } done"
    func area(x, y)
        if x >= 0x1F and not y
            see "value: " + len(name) + nl
        ok
        return x * 3.14e2
new Shape { :name = 'circle' }
"#;
    let block_lines = BLOCK.lines().count().max(1);
    BLOCK.repeat(lines.div_ceil(block_lines))
}

fn print_scan_summary(
    iterations: usize,
    bytes: usize,
    spans: usize,
    relevance: u64,
    elapsed: Duration,
) {
    let secs = elapsed.as_secs_f64().max(f64::EPSILON);
    let mib = (bytes * iterations) as f64 / (1024.0 * 1024.0);
    println!(
        "scan: iterations={} bytes={} spans={} relevance={} total_ms={:.3} throughput_mib_s={:.2}",
        iterations,
        bytes,
        spans / iterations.max(1),
        relevance,
        elapsed.as_secs_f64() * 1000.0,
        mib / secs
    );
}

fn print_render_summary(frames: usize, elapsed: Duration) {
    let avg_us = if frames > 0 {
        elapsed.as_secs_f64() * 1_000_000.0 / frames as f64
    } else {
        0.0
    };
    println!(
        "render: frames={} total_ms={:.3} avg_us={:.3}",
        frames,
        elapsed.as_secs_f64() * 1000.0,
        avg_us
    );
}
