use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum ListedScript {
    Url(String),
    Record { url: String },
}

impl ListedScript {
    fn into_url(self) -> String {
        match self {
            Self::Url(url) | Self::Record { url } => url,
        }
    }
}

/// Parse a script list: a JSON array of URLs (or `{"url": ...}` objects),
/// or plain text with one URL per line. `#` starts a comment at the start of
/// a line or after whitespace, so URL fragments survive.
pub fn parse_script_list(text: &str) -> anyhow::Result<Vec<String>> {
    if text.trim_start().starts_with('[') {
        let listed: Vec<ListedScript> =
            serde_json::from_str(text).context("script list is not a JSON array of URLs")?;
        return Ok(listed
            .into_iter()
            .map(ListedScript::into_url)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect());
    }

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.split_once(" #").map_or(line, |(before, _)| before).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Read and parse a script list file.
pub fn read_script_list(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script list {}", path.display()))?;
    parse_script_list(&text).with_context(|| format!("invalid script list {}", path.display()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn plain_text_skips_blanks_and_comments() {
        let text = "\
# captured from shop.example.com
https://www.googletagmanager.com/gtag/js

https://js.stripe.com/v3/   # checkout
  https://evil-tracker.io/collect.js
";
        assert_eq!(
            parse_script_list(text).unwrap(),
            vec![
                "https://www.googletagmanager.com/gtag/js",
                "https://js.stripe.com/v3/",
                "https://evil-tracker.io/collect.js",
            ]
        );
    }

    #[test]
    fn json_array_accepts_strings_and_records() {
        let text = r#"[
            "https://js.stripe.com/v3/",
            {"url": "https://evil-tracker.io/collect.js", "discoveredAt": "2026-01-01T00:00:00Z"}
        ]"#;
        assert_eq!(
            parse_script_list(text).unwrap(),
            vec!["https://js.stripe.com/v3/", "https://evil-tracker.io/collect.js"]
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_script_list("[\"https://a.io/x.js\",").is_err());
        assert!(parse_script_list("[42]").is_err());
    }

    #[test]
    fn url_fragments_are_not_comments() {
        assert_eq!(
            parse_script_list("https://a.io/x.js#v2 # pinned\n").unwrap(),
            vec!["https://a.io/x.js#v2"]
        );
    }

    #[test]
    fn order_and_duplicates_are_preserved() {
        let text = "https://a.io/1.js\nhttps://b.io/2.js\nhttps://a.io/1.js\n";
        assert_eq!(parse_script_list(text).unwrap().len(), 3);
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("scripts.txt");
        std::fs::write(&path, "https://a.io/1.js\n").unwrap();
        assert_eq!(read_script_list(&path).unwrap(), vec!["https://a.io/1.js"]);
        assert!(read_script_list(&dir.path().join("missing.txt")).is_err());
    }
}
