use overlay::{path_boolean, path_from_path_data, BoolOp, FillRule};
use std::time::Instant;

fn wavy_blob(cx: f64, cy: f64, r: f64, lobes: usize) -> String {
    // A closed chain of cubics wobbling around a circle; lobes control how
    // many intersections two offset blobs produce.
    let mut d = String::new();
    let n = lobes * 2;
    for i in 0..=n {
        let t = i as f64 / n as f64 * std::f64::consts::TAU;
        let wobble = if i % 2 == 0 { 1.0 } else { 0.72 };
        let x = cx + r * wobble * t.cos();
        let y = cy + r * wobble * t.sin();
        if i == 0 {
            d.push_str(&format!("M {x} {y}"));
        } else {
            let prev_t = (i - 1) as f64 / n as f64 * std::f64::consts::TAU;
            let prev_wobble = if (i - 1) % 2 == 0 { 1.0 } else { 0.72 };
            let px = cx + r * prev_wobble * prev_t.cos();
            let py = cy + r * prev_wobble * prev_t.sin();
            let mx = (px + x) / 2.0 + (y - py) * 0.2;
            let my = (py + y) / 2.0 - (x - px) * 0.2;
            d.push_str(&format!(" Q {mx} {my} {x} {y}"));
        }
    }
    d.push_str(" Z");
    d
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut lobes = 24usize;
    let mut repeats = 20usize;
    for a in &args[1..] {
        if let Some(val) = a.strip_prefix("--lobes=") {
            if let Ok(v) = val.parse() {
                lobes = v;
            }
        } else if let Some(val) = a.strip_prefix("--repeats=") {
            if let Ok(v) = val.parse() {
                repeats = v;
            }
        }
    }

    let a = path_from_path_data(&wavy_blob(0.0, 0.0, 100.0, lobes)).expect("blob a");
    let b = path_from_path_data(&wavy_blob(40.0, 25.0, 100.0, lobes)).expect("blob b");

    // Warm once, then measure.
    let _ = path_boolean(&a, FillRule::NonZero, &b, FillRule::NonZero, BoolOp::Union);

    let mut times = Vec::with_capacity(repeats);
    let mut out_segments = 0usize;
    for _ in 0..repeats {
        let t0 = Instant::now();
        let result = path_boolean(&a, FillRule::NonZero, &b, FillRule::NonZero, BoolOp::Union).expect("union");
        times.push(t0.elapsed().as_secs_f64() * 1000.0);
        out_segments = result.iter().map(|p| p.len()).sum();
    }
    let avg = times.iter().sum::<f64>() / times.len() as f64;
    let min = times.iter().cloned().fold(f64::INFINITY, f64::min);

    println!(
        "lobes={} in_segments={} out_segments={} avg_ms={:.3} min_ms={:.3}",
        lobes,
        a.len() + b.len(),
        out_segments,
        avg,
        min
    );
}
