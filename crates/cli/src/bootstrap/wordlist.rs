use anyhow::Context;

const BUILTIN: &str = include_str!("wordlist.txt");

/// Labels from `path`, or the built-in list when no file is given.
pub fn load_wordlist(path: Option<&str>) -> anyhow::Result<Vec<String>> {
    let raw = match path {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("reading wordlist {}", p))?,
        None => BUILTIN.to_string(),
    };
    Ok(parse_wordlist(&raw))
}

fn parse_wordlist(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_list_is_clean() {
        let words = load_wordlist(None).unwrap();
        assert!(words.len() > 50);
        assert!(words.iter().any(|w| w == "www"));
        assert!(words.iter().all(|w| !w.starts_with('#') && !w.contains(char::is_whitespace)));
    }

    #[test]
    fn test_file_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# staging hosts\nstaging\n\n  qa  \n").unwrap();

        let words = load_wordlist(file.path().to_str()).unwrap();

        assert_eq!(words, vec!["staging", "qa"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_wordlist(Some("/nonexistent/wordlist.txt")).is_err());
    }
}
