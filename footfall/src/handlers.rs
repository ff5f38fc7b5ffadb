use chrono::{DateTime, Utc};
use clap::ArgMatches;
use colored::Colorize;
use footfall_core::demo::{demo_graph, demo_spec};
use footfall_core::generate::{
    GenerateOptions, ProgressCallback, execute_generation, generate_json_report,
    generate_run_report,
};
use footfall_sim::{SiteGraph, load_site};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

// Helper functions for the generate handler

/// Parse an RFC 3339 start time into UTC.
pub fn parse_start_time(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid start time '{}': {}", s, e))
}

/// Load the site graph from a spec file, or fall back to the demo site.
pub fn load_site_graph(path: Option<&PathBuf>) -> Result<SiteGraph, String> {
    match path {
        Some(path) => load_site(path)
            .map_err(|e| format!("failed to load site spec {}: {}", path.display(), e)),
        None => Ok(demo_graph()),
    }
}

/// Open the output sink: a buffered file, or stdout.
pub fn open_sink(path: Option<&PathBuf>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    })
}

pub fn handle_generate(args: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let customers = *args.get_one::<usize>("customers").unwrap();
    let max_steps = *args.get_one::<usize>("max-steps").unwrap();
    let spread_seconds = *args.get_one::<u64>("spread").unwrap();
    let seed = args.get_one::<u64>("seed").copied();
    let site = args.get_one::<PathBuf>("site");
    let output = args.get_one::<PathBuf>("output");
    let start = match args.get_one::<String>("start") {
        Some(s) => parse_start_time(s).map_err(anyhow::Error::msg)?,
        None => Utc::now(),
    };

    let graph = load_site_graph(site).map_err(anyhow::Error::msg)?;
    let entry = graph
        .page_id(0)
        .ok_or_else(|| anyhow::anyhow!("site spec has no pages"))?;

    // indicatif draws on stderr, so the bar never mixes with a stdout log.
    let progress_bar = if quiet {
        None
    } else {
        let pb = ProgressBar::new(customers as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} {msg} {pos}/{len}")
                .unwrap(),
        );
        pb.set_message("Simulating customers...");
        Some(pb)
    };

    let progress_callback: Option<ProgressCallback> = progress_bar.as_ref().map(|pb| {
        let pb = pb.clone();
        Arc::new(move |_done: usize, user: String| {
            pb.set_message(user);
            pb.inc(1);
        }) as ProgressCallback
    });

    let options = GenerateOptions {
        customers,
        max_steps,
        seed,
        start,
        spread_seconds,
    };
    let mut sink = open_sink(output)?;
    let summary = execute_generation(&graph, entry, &options, &mut sink, progress_callback)?;
    drop(sink);

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }
    info!(run = %summary.run_id, lines = summary.lines_written, "run complete");

    if quiet {
        return Ok(());
    }
    let rendered = match args.get_one::<String>("format").unwrap().as_str() {
        "json" => format!("{}\n", generate_json_report(&summary)?),
        _ => generate_run_report(&summary),
    };
    match output {
        Some(path) => {
            println!(
                "{} Wrote {} lines to {}\n",
                "✓".green().bold(),
                summary.lines_written,
                path.display()
            );
            print!("{}", rendered);
        }
        // The log owns stdout; keep the summary on stderr.
        None => eprint!("{}", rendered),
    }

    Ok(())
}

pub fn handle_site(args: &ArgMatches) -> anyhow::Result<()> {
    let json = demo_spec().to_json()?;
    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            std::fs::write(path, format!("{}\n", json))?;
            println!(
                "{} Wrote site template to {}",
                "✓".green().bold(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
