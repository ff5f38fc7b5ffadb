use crate::access::format_visit;
use chrono::{DateTime, Duration, Utc};
use footfall_sim::error::Result;
use footfall_sim::{Customer, IdentityPool, PageId, SiteGraph, WalkEnd, Walker};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Callback reporting (customers finished, last user id) as the run advances.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Options for configuring a generation run.
pub struct GenerateOptions {
    pub customers: usize,
    /// Per-session history bound; 0 runs each session to natural termination.
    pub max_steps: usize,
    /// Seed for the random source; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Simulated clock value sessions start from.
    pub start: DateTime<Utc>,
    /// Session starts are spread uniformly across this many seconds.
    pub spread_seconds: u64,
}

/// What a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub customers: usize,
    pub steps: usize,
    pub lines_written: usize,
    pub quits: usize,
    pub dead_ends: usize,
    pub exits: usize,
    pub step_caps: usize,
    pub window_start: String,
    pub window_end: String,
}

/// Simulate every customer against the shared graph and write the merged
/// log to the sink. Sessions run one at a time; each customer owns its walk
/// state and only reads the graph.
pub fn execute_generation<W: Write>(
    graph: &SiteGraph,
    entry: PageId,
    options: &GenerateOptions,
    sink: &mut W,
    progress: Option<ProgressCallback>,
) -> Result<RunSummary> {
    let run_id = Uuid::new_v4().to_string();
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut pool = IdentityPool::new();

    info!(
        run = %run_id,
        customers = options.customers,
        pages = graph.len(),
        "starting generation"
    );

    let mut timestamped: Vec<(DateTime<Utc>, String)> = Vec::new();
    let mut steps = 0;
    let (mut quits, mut dead_ends, mut exits, mut step_caps) = (0, 0, 0, 0);

    for n in 0..options.customers {
        let identity = pool.allocate(&mut rng)?;
        let mut customer = Customer::new(identity);

        let offset = if options.spread_seconds > 0 {
            rng.random_range(0..options.spread_seconds) as i64
        } else {
            0
        };

        let mut walker = Walker::new(graph, &mut rng);
        walker.start(&mut customer, entry, options.start + Duration::seconds(offset));
        match walker.run(&mut customer, options.max_steps)? {
            WalkEnd::Quit => quits += 1,
            WalkEnd::DeadEnd => dead_ends += 1,
            WalkEnd::Exited => exits += 1,
            WalkEnd::StepCap => step_caps += 1,
        }
        steps += customer.history.len();

        for visit in &customer.history {
            if let Some(line) = format_visit(graph, &customer, visit) {
                timestamped.push((visit.at, line));
            }
        }

        if let Some(ref callback) = progress {
            callback(n + 1, customer.identity.user_id.clone());
        }
    }

    // Real logs read in time order even when sessions interleave. The sort
    // is stable, so per-customer order survives timestamp ties.
    timestamped.sort_by(|a, b| a.0.cmp(&b.0));

    let window_start = timestamped.first().map(|(t, _)| *t).unwrap_or(options.start);
    let window_end = timestamped.last().map(|(t, _)| *t).unwrap_or(options.start);
    for (_, line) in &timestamped {
        writeln!(sink, "{}", line)?;
    }
    sink.flush()?;

    info!(run = %run_id, lines = timestamped.len(), "generation complete");

    Ok(RunSummary {
        run_id,
        customers: options.customers,
        steps,
        lines_written: timestamped.len(),
        quits,
        dead_ends,
        exits,
        step_caps,
        window_start: window_start.to_rfc3339(),
        window_end: window_end.to_rfc3339(),
    })
}

/// Render a run summary as text.
pub fn generate_run_report(summary: &RunSummary) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Run id: {}\n", summary.run_id));
    report.push_str(&format!("  Customers simulated: {}\n", summary.customers));
    report.push_str(&format!("  Transitions taken: {}\n", summary.steps));
    report.push_str(&format!("  Log lines written: {}\n", summary.lines_written));
    report.push_str(&format!(
        "  Window: {} .. {}\n",
        summary.window_start, summary.window_end
    ));
    report.push_str("\n# Session endings:\n");
    report.push_str(&format!("  Quit on page: {}\n", summary.quits));
    report.push_str(&format!("  Dead end: {}\n", summary.dead_ends));
    report.push_str(&format!("  Left the site: {}\n", summary.exits));
    report.push_str(&format!("  Hit step bound: {}\n", summary.step_caps));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report
}

/// Render a run summary as JSON.
pub fn generate_json_report(summary: &RunSummary) -> std::result::Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}
