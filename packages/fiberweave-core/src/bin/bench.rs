use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use fiberweave_core::{
    reconcile_child_fibers, ChildSpec, FiberTree, NoopSink, PriorityLevel, Props,
};

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    implementation: &'static str,
    workload: String,
    timestamp: String,
    name: String,
    total_fibers: u64,
    duration_ms: f64,
    fibers_per_sec: f64,
    extra: Extra,
    source_file: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Extra {
    width: u64,
    passes: u64,
    mode: &'static str,
}

fn rows(width: u64, prefix: &str) -> ChildSpec {
    ChildSpec::list(
        (0..width).map(|i| ChildSpec::element("row", Some(format!("{prefix}{i}").as_str()), Props::new())),
    )
}

/// Mount `width` rows, then run `passes` updates against the previous chain.
/// `shift` renames every key so each update creates instead of cloning.
fn run(width: u64, passes: u64, shift: bool) -> f64 {
    let mut tree = FiberTree::new();
    let root = tree.create_root("table", Props::new(), PriorityLevel::Low);
    let specs = [rows(width, "a"), rows(width, if shift { "b" } else { "a" })];

    let start = Instant::now();
    let mut head = None;
    for pass in 0..=passes {
        let spec = &specs[(pass % 2) as usize];
        let next = reconcile_child_fibers(
            &mut tree,
            &mut NoopSink,
            root,
            head,
            spec,
            PriorityLevel::High,
        );
        tree.discard_chain(head);
        head = next;
    }
    start.elapsed().as_secs_f64() * 1000.0
}

fn main() {
    let mut width: u64 = 1_000;
    let mut passes: u64 = 20;
    let mut out_file: Option<PathBuf> = None;
    for arg in env::args().skip(1) {
        if let Some(val) = arg.strip_prefix("--width=") {
            width = val.parse().unwrap_or(width);
        } else if let Some(val) = arg.strip_prefix("--passes=") {
            passes = val.parse().unwrap_or(passes);
        } else if let Some(val) = arg.strip_prefix("--out=") {
            out_file = Some(PathBuf::from(val));
        }
    }

    let mut outputs = Vec::new();
    for (mode, shift) in [("clone", false), ("create", true)] {
        let duration_ms = run(width, passes, shift);
        let total_fibers = width * (passes + 1);
        let workload = format!("rows-{mode}-{width}x{passes}");
        outputs.push(Output {
            implementation: "fiberweave-core",
            workload: workload.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            name: workload,
            total_fibers,
            duration_ms,
            fibers_per_sec: if duration_ms > 0.0 {
                total_fibers as f64 / duration_ms * 1000.0
            } else {
                f64::INFINITY
            },
            extra: Extra {
                width,
                passes,
                mode,
            },
            source_file: out_file.as_ref().map(|p| p.display().to_string()),
        });
    }

    let json = serde_json::to_string_pretty(&outputs).expect("serialize");
    if let Some(path) = out_file {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdirs");
        }
        fs::write(&path, &json).expect("write output");
    }
    println!("{}", json);
}
