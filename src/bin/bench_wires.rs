//! Benchmark for the wire render pipeline.
//!
//! Builds a synthetic board of parallel chip chains with routed wires and
//! live sample history, then times path building, the timing cache and full
//! frames (playing and paused) against a surface that only counts calls.
//!
//! Run with: cargo run --profile perf --bin bench_wires

use std::collections::HashMap;
use std::time::Instant;

use wireflow_lib::connection_point::ConnectionPoint;
use wireflow_lib::geometry::{build_pixel_path, BoardLayout, Bounds};
use wireflow_lib::models::{ChipState, CycleResults, GameboardState, GridCell, PortRef, Wire};
use wireflow_lib::render::{
    render_frame, DrawSurface, FrameInput, LineCap, LineJoin, RenderOptions, SamplingMode,
};
use wireflow_lib::style::WireStyle;
use wireflow_lib::timing::WireAnimationCache;

const CHAINS: usize = 64;
const CHAIN_LEN: usize = 12;

/// Surface that drops geometry and keeps counts.
#[derive(Default)]
struct CountingSurface {
    strokes: usize,
    vertices: usize,
    style_changes: usize,
}

impl DrawSurface for CountingSurface {
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn begin_path(&mut self) {}
    fn move_to(&mut self, _x: f64, _y: f64) {
        self.vertices += 1;
    }
    fn line_to(&mut self, _x: f64, _y: f64) {
        self.vertices += 1;
    }
    fn stroke(&mut self) {
        self.strokes += 1;
    }
    fn set_stroke_style(&mut self, _color: &str) {
        self.style_changes += 1;
    }
    fn set_line_width(&mut self, _width: f64) {}
    fn set_global_alpha(&mut self, _alpha: f64) {}
    fn set_line_join(&mut self, _join: LineJoin) {}
    fn set_line_cap(&mut self, _cap: LineCap) {}
    fn set_shadow_color(&mut self, _color: &str) {}
    fn set_shadow_blur(&mut self, _blur: f64) {}
}

fn generate_board(layout: &BoardLayout) -> (GameboardState, CycleResults) {
    let mut chips = HashMap::new();
    let mut paths = Vec::new();
    let mut cycle = CycleResults {
        max_depth: CHAIN_LEN as u32 + 1,
        ..CycleResults::default()
    };

    for chain in 0..CHAINS {
        let row = 2 + (chain as i32 % 16) * 4;
        let ids: Vec<String> = (0..CHAIN_LEN).map(|i| format!("c{chain}-{i}")).collect();
        for (i, id) in ids.iter().enumerate() {
            chips.insert(
                id.clone(),
                ChipState {
                    id: id.clone(),
                    chip_type: "gain".into(),
                    position: GridCell::new(3 + i as i32 * 4, row),
                    params: Default::default(),
                    socket_count: 1,
                    plug_count: 1,
                },
            );
            cycle.node_depths.insert(id.clone(), i as u32 + 1);
            cycle.live_node_ids.insert(id.clone());
        }

        let mut ends: Vec<PortRef> = vec![PortRef::output(ConnectionPoint::input(chain as u32 % 3), 0)];
        for id in &ids {
            ends.push(PortRef::input(id.as_str(), 0));
            ends.push(PortRef::output(id.as_str(), 0));
        }
        ends.push(PortRef::input(ConnectionPoint::output(chain as u32 % 3), 0));

        for (k, pair) in ends.chunks(2).enumerate() {
            let id = format!("w{chain}-{k}");
            let mut wire = Wire::new(id.clone(), pair[0].clone(), pair[1].clone())
                .with_route(vec![GridCell::new(1 + k as i32 * 4, row + 1), GridCell::new(2 + k as i32 * 4, row + 1)]);
            for s in 0..40 {
                wire.push_sample(((s + k) as f64 * 0.7).sin() * 120.0);
            }
            cycle
                .wire_values
                .insert(id, (0..8).map(|p| ((p + k) as f64).cos() * 100.0).collect());
            paths.push(wire);
        }
    }

    let board = GameboardState {
        id: "bench".into(),
        chips,
        paths,
    };
    (board, cycle)
}

fn bench<F: FnMut() -> R, R>(name: &str, iterations: usize, mut f: F) -> std::time::Duration {
    // Warmup
    for _ in 0..2 {
        std::hint::black_box(f());
    }

    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(f());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;

    println!(
        "  {:<40} {:>8.3}ms  ({} iters, {:.2}ms total)",
        name,
        per_iter.as_secs_f64() * 1000.0,
        iterations,
        elapsed.as_secs_f64() * 1000.0,
    );
    per_iter
}

fn main() {
    let layout = BoardLayout {
        cell_size: 24.0,
        cols: 56,
        rows: 68,
    };
    let style = WireStyle::default();
    let (board, cycle) = generate_board(&layout);
    println!(
        "Synthetic board: {} chains x {} chips, {} wires\n",
        CHAINS,
        CHAIN_LEN,
        board.paths.len()
    );

    let iters = 200;
    println!("=== Stages ({iters} iterations each) ===\n");

    let t_paths = bench("build_pixel_path (all wires)", iters, || {
        board
            .paths
            .iter()
            .map(|w| build_pixel_path(w, Some(&board.chips), &layout).len())
            .sum::<usize>()
    });

    let t_cache = bench("WireAnimationCache::build", iters, || {
        WireAnimationCache::build(&cycle, &board.paths, 3)
    });

    let animation = WireAnimationCache::build(&cycle, &board.paths, 3);
    let segment_options = RenderOptions::default();
    let wire_options = RenderOptions {
        sampling: SamplingMode::Wire { playpoint: 3 },
        live_only: true,
        ..RenderOptions::default()
    };

    let playing = FrameInput {
        board: &board,
        layout: &layout,
        style: &style,
        cycle: Some(&cycle),
        animation: None,
        global_progress: None,
        options: &segment_options,
    };
    let paused = FrameInput {
        animation: Some(&animation),
        global_progress: Some(0.42),
        options: &wire_options,
        ..playing
    };

    let mut last_bounds: Option<Bounds> = None;
    let t_playing = bench("render_frame (playing, segment)", iters, || {
        let mut surface = CountingSurface::default();
        render_frame(&mut surface, &playing, None);
        surface.strokes
    });

    let t_paused = bench("render_frame (paused, wire + blips)", iters, || {
        let mut surface = CountingSurface::default();
        let mut capture = |b: &Bounds| last_bounds = Some(*b);
        render_frame(&mut surface, &paused, Some(&mut capture));
        surface.strokes
    });

    let mut surface = CountingSurface::default();
    render_frame(&mut surface, &paused, None);
    println!(
        "\n  paused frame: {} strokes, {} vertices, {} style changes",
        surface.strokes, surface.vertices, surface.style_changes
    );
    if let Some(bounds) = last_bounds {
        println!(
            "  captured bounds: {:.0}x{:.0}px",
            bounds.width(),
            bounds.height()
        );
    }

    println!("\n=== Summary ===\n");
    let total = t_paths + t_cache + t_playing + t_paused;
    let pcts = [
        ("paths", t_paths),
        ("timing cache", t_cache),
        ("playing frame", t_playing),
        ("paused frame", t_paused),
    ];
    for (name, t) in &pcts {
        let pct = t.as_secs_f64() / total.as_secs_f64() * 100.0;
        println!(
            "  {:<40} {:>5.1}%  ({:.3}ms)",
            name,
            pct,
            t.as_secs_f64() * 1000.0
        );
    }
}
