pub mod access;
pub mod demo;
pub mod generate;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
   __            _    __       _ _
  / _|          | |  / _|     | | |
 | |_ ___   ___ | |_ | |_ __ _| | |
 |  _/ _ \ / _ \| __||  _/ _` | | |
 |_| \___/ \___/ \__||_| \__,_|_|_|
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "{}",
        format!(
            "  v{} - synthetic access logs from simulated visitors",
            env!("CARGO_PKG_VERSION")
        )
        .dimmed()
    );
    println!();
}
