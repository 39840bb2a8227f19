/// A progress report parsed from a line of runtime output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub generation: u64,
    pub total: u64,
}

impl Progress {
    /// Completed fraction, clamped to `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        (self.generation as f64 / self.total as f64).clamp(0.0, 1.0)
    }
}

/// Recognise `Generation <n>/<total>` anywhere in a line, ignoring case.
pub fn parse_progress(line: &str) -> Option<Progress> {
    const KEYWORD: &str = "generation";

    let lower = line.to_ascii_lowercase();
    let mut search_from = 0;
    while let Some(pos) = lower[search_from..].find(KEYWORD) {
        let rest = &lower[search_from + pos + KEYWORD.len()..];
        if let Some(progress) = parse_fraction(rest) {
            return Some(progress);
        }
        search_from += pos + KEYWORD.len();
    }
    None
}

fn parse_fraction(rest: &str) -> Option<Progress> {
    let rest = rest.trim_start_matches([' ', ':', '\t']);
    let (generation, rest) = split_number(rest)?;
    let rest = rest.trim_start().strip_prefix('/')?.trim_start();
    let (total, _) = split_number(rest)?;
    if total == 0 {
        return None;
    }
    Some(Progress { generation, total })
}

fn split_number(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_generation_line() {
        let p = parse_progress("Generation 25/250").unwrap();
        assert_eq!(p, Progress { generation: 25, total: 250 });
        assert!((p.fraction() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_case_and_surrounding_text() {
        let p = parse_progress("[INFO] generation: 10 / 20, best fitness 0.93").unwrap();
        assert_eq!(p, Progress { generation: 10, total: 20 });
        assert_eq!(p.fraction(), 0.5);
    }

    #[test]
    fn test_fraction_clamped() {
        let p = parse_progress("Generation 300/250").unwrap();
        assert_eq!(p.fraction(), 1.0);
    }

    #[test]
    fn test_zero_total_ignored() {
        assert!(parse_progress("Generation 0/0").is_none());
    }

    #[test]
    fn test_unrelated_lines() {
        assert!(parse_progress("Loading image m42.fit").is_none());
        assert!(parse_progress("Generation of random genomes").is_none());
        assert!(parse_progress("").is_none());
    }

    #[test]
    fn test_later_match_in_line() {
        let p = parse_progress("generations configured; Generation 3/9").unwrap();
        assert_eq!(p, Progress { generation: 3, total: 9 });
    }
}
