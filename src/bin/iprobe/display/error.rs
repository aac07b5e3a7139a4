use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_io_hints(err);
        collector.collect_analysis_hints(err);
        collector.collect_config_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_io_hints(&mut self, err: &Error) {
        use implant_probe::io::Error as IoError;

        let Some(io_err) = err.chain().find_map(|e| e.downcast_ref::<IoError>()) else {
            return;
        };

        self.mark_typed();

        match io_err {
            IoError::Io { source } => {
                self.add("Reading the input failed part-way through");
                self.collect_std_io_hints(source);
            }

            IoError::Open { path, source } => {
                self.add(format!("Could not open '{}'", path.display()));
                self.collect_std_io_hints(source);
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::IsADirectory => {
                self.add("The path is a directory");
                self.add("Pass a trajectory, data or point-list file instead");
            }

            ErrorKind::UnexpectedEof => {
                self.add("Unexpected end of file encountered");
                self.add("The file may be truncated or still being written");
            }

            ErrorKind::BrokenPipe => {
                self.add("Broken pipe: output consumer terminated");
                self.add("This may occur when piping to commands like `head`");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_analysis_hints(&mut self, err: &Error) {
        use implant_probe::analysis::Error as AnalysisError;

        let Some(analysis_err) = err.chain().find_map(|e| e.downcast_ref::<AnalysisError>())
        else {
            return;
        };

        self.mark_typed();

        match analysis_err {
            AnalysisError::InvalidConfig { field, detail } => {
                self.add(format!("Setting '{}' is out of range: {}", field, detail));
                self.add_field_hint(field);
            }

            AnalysisError::TooManyBins { width, .. } => {
                self.add(format!("Depths span too many {} Å bins", width));
                self.add("Use a larger --bin-width or set --max-depth");
                self.add("Check --surface-z; a wrong surface can inflate depths");
            }

            AnalysisError::NoData => {
                self.add("None of the inputs produced a depth in range");
                self.add("Check --atom-type against the type column of your files");
                self.add("Check --surface-z; depths above the surface are discarded");
                self.add("Use --no-max-depth if implants went deeper than the limit");
            }
        }
    }

    fn add_field_hint(&mut self, field: &str) {
        match field {
            "bin_width" => self.add("Use a positive --bin-width, e.g. 5"),
            "max_depth" => self.add("Use a positive --max-depth or pass --no-max-depth"),
            "surface_z" => self.add("Give --surface-z a finite height in Å or `auto`"),
            "min_depth" => self.add("--min-depth-nm must be zero or positive"),
            "pair_min" | "pair_max" => {
                self.add("--pair-min-nm and --pair-max-nm must be positive");
                self.add("The lower bound may not exceed the upper bound");
            }
            "isolation" => self.add("--isolation-nm must be positive"),
            "bond_cutoff" => self.add("Use a positive --bond-cutoff, e.g. 1.8"),
            _ => self.add("Review the command-line flags and configuration file"),
        }
    }

    fn collect_config_hints(&mut self, err: &Error) {
        let Some(toml_err) = err.chain().find_map(|e| e.downcast_ref::<toml::de::Error>()) else {
            return;
        };

        self.mark_typed();

        self.add("The configuration file could not be parsed");
        if toml_err.message().contains("unknown field") {
            self.add("Allowed tables: [depth], [pairs] and [nv]");
            self.add("Check key names for typos (e.g. bin_width, pair_max_nm)");
        } else {
            self.add("Check for missing quotes, brackets, or invalid values");
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("glob pattern") {
            self.add("Quote glob patterns so the shell does not expand them");
            self.add("Wildcards: *, ?, and [...] character classes");
            return;
        }

        if msg.contains("substrate") {
            self.add("Pass --substrate-type matching the host lattice atoms");
            self.add("Or give --surface-z a fixed height in Å");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            self.add("Ensure you have the required access rights");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn analysis_hints_through_context() {
        let err = Err::<(), _>(implant_probe::analysis::Error::NoData)
            .context("Depth report failed")
            .unwrap_err();
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints[0].contains("depth in range"));
    }

    #[test]
    fn field_specific_hint() {
        let err = anyhow::Error::new(implant_probe::analysis::Error::invalid_config(
            "bin_width",
            "must be a positive number, got 0",
        ));
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints.iter().any(|h| h.contains("--bin-width")));

        let err = anyhow::Error::new(implant_probe::analysis::Error::invalid_config(
            "bond_cutoff",
            "must be a positive number, got -1",
        ));
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints.iter().any(|h| h.contains("--bond-cutoff")));
    }

    #[test]
    fn too_many_bins_hint() {
        let err = anyhow::Error::new(implant_probe::analysis::Error::TooManyBins {
            required: 2e299,
            width: 5.0,
            limit: 1_000_000,
        });
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints[0].contains("5 Å bins"));
        assert!(hints.iter().any(|h| h.contains("--max-depth")));
    }

    #[test]
    fn io_open_hints() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = anyhow::Error::new(implant_probe::io::Error::open("run/N_list", io));
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints[0].contains("run/N_list"));
        assert!(hints.iter().any(|h| h.contains("not found")));
    }

    #[test]
    fn untyped_errors_fall_back_to_text() {
        let err = anyhow::anyhow!("Invalid glob pattern: 'run_[1'");
        let hints = HintCollector::collect(&err).unwrap();
        assert!(hints[0].contains("Quote glob patterns"));

        assert!(HintCollector::collect(&anyhow::anyhow!("something odd")).is_none());
    }
}
