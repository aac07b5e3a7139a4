use std::path::Path;

/// Greedy word wrap; never returns an empty list.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let fits = current.chars().count() + 1 + word.chars().count() <= width;
        if current.is_empty() {
            current.push_str(word);
        } else if fits {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

/// Shortens `s` to `max_len` characters, marking the cut with `…`.
pub fn truncate(s: &str, max_len: usize) -> String {
    match max_len {
        0 => return String::new(),
        1 if s.chars().count() > 1 => return "…".to_string(),
        _ => {}
    }

    if s.char_indices().nth(max_len).is_none() {
        return s.to_string();
    }

    let cut = s
        .char_indices()
        .nth(max_len - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    let mut out = String::with_capacity(cut + '…'.len_utf8());
    out.push_str(&s[..cut]);
    out.push('…');
    out
}

/// Label for an input in tables and progress lines: the parent directory
/// joined with the file name, since run directories usually share the
/// same list file name.
pub fn short_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match path
        .parent()
        .and_then(|p| p.file_name())
        .map(|p| p.to_string_lossy())
    {
        Some(dir) if !dir.is_empty() => format!("{dir}/{name}"),
        _ => name,
    }
}

/// Fixed three-decimal length in Å, `n/a` when absent.
pub fn angstrom(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3} Å"),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(wrap("no depths in range", 40), vec!["no depths in range"]);
        assert_eq!(
            wrap("check the surface height", 12),
            vec!["check the", "surface", "height"]
        );
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("N_list", 10), "N_list");
        assert_eq!(truncate("N_list", 6), "N_list");
        assert_eq!(truncate("run_042/N_list.txt", 8), "run_042…");
        assert_eq!(truncate("Å-range", 1), "…");
        assert_eq!(truncate("深さ分布", 3), "深さ…");
    }

    #[test]
    fn short_path_keeps_run_directory() {
        assert_eq!(short_path(Path::new("/data/run_7/N_list")), "run_7/N_list");
        assert_eq!(short_path(Path::new("dump.lammpstrj")), "dump.lammpstrj");
    }

    #[test]
    fn angstrom_formatting() {
        assert_eq!(angstrom(Some(5.5)), "5.500 Å");
        assert_eq!(angstrom(None), "n/a");
    }
}
