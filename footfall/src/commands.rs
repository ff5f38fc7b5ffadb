use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("footfall")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("footfall")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and summary output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("generate")
                .about(
                    "Simulate customers browsing the site graph and write the resulting \
                access log.",
                )
                .arg(
                    arg!(-c --"customers" <COUNT>)
                        .required(false)
                        .help("Number of customer sessions to simulate")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("100"),
                )
                .arg(
                    arg!(-s --"site" <PATH>)
                        .required(false)
                        .help("Path to a JSON site spec (default: built-in demo site)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Write the log to a file (default: stdout)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"seed" <SEED>)
                        .required(false)
                        .help("Seed the random source for a reproducible run")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--"max-steps" <COUNT>)
                        .required(false)
                        .help("Per-session step bound; 0 runs every session to natural termination")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("500"),
                )
                .arg(
                    arg!(--"start" <RFC3339>)
                        .required(false)
                        .help("Simulated clock start, e.g. 2014-08-01T00:00:00Z (default: now)"),
                )
                .arg(
                    arg!(--"spread" <SECONDS>)
                        .required(false)
                        .help("Spread session starts uniformly across this many seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("0"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Summary format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("site")
                .about("Print the built-in demo site spec as a JSON template to customize.")
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Write the spec to a file (default: stdout)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
}
