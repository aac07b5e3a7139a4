use std::io::{self, Write};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const TAGLINE: &str = "implant depth · pair geometry · NV centres";

const HELP_BANNER: &str = concat!(
    "\n  iprobe ",
    env!("CARGO_PKG_VERSION"),
    "\n  implant depth · pair geometry · NV centres\n"
);

pub fn banner_for_help() -> &'static str {
    HELP_BANNER
}

fn banner_line(command: &str) -> String {
    format!("iprobe v{VERSION} · {command}")
}

/// Two-line header naming the running subcommand.
pub fn print_banner(command: &str) {
    let line = banner_line(command);
    let width = line.chars().count().max(TAGLINE.chars().count());
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "  \x1b[1m{line}\x1b[0m");
    let _ = writeln!(stderr, "  \x1b[2m{TAGLINE}\x1b[0m");
    let _ = writeln!(stderr, "  \x1b[2m{}\x1b[0m", "─".repeat(width));
    let _ = writeln!(stderr);
}
