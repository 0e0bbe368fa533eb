//! Embeds the rankings, benchmarks and indicators as JSON data blocks in the
//! static report page.

use super::combinations::COMBINATIONS;
use super::fund::RankedFund;
use anyhow::{Context, Result, anyhow};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

pub const SCRIPT_TYPE: &str = "application/json";
pub const DATA_CLASS: &str = "fci_data";
pub const ID_PREFIX: &str = "data_";
pub const ID_BENCHMARK: &str = "benchmarkGarantizado";
pub const ID_INDICATORS: &str = "datosFinancieros";

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b([^>]*)>.*?</script>[ \t]*\r?\n?").expect("valid script regex")
});
static BODY_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").expect("valid body regex"));
static BODY_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body\b").expect("valid body regex"));
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:-]+)\s*=\s*["']([^"']*)["']"#).expect("valid attribute regex")
});

fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    ATTR_RE
        .captures_iter(attrs)
        .find(|c| c[1].eq_ignore_ascii_case(name))
        .and_then(|c| c.get(2))
        .map(|m| m.as_str())
}

fn is_generated(attrs: &str) -> bool {
    let is_data_block = attribute(attrs, "type") == Some(SCRIPT_TYPE)
        && attribute(attrs, "class").is_some_and(|c| c.split_whitespace().any(|c| c == DATA_CLASS));
    let is_fixed_id = matches!(attribute(attrs, "id"), Some(ID_BENCHMARK | ID_INDICATORS));
    is_data_block || is_fixed_id
}

/// A JSON data block. `</` is escaped so the payload cannot close the tag.
pub fn script_tag<T: Serialize>(id: &str, data: &T, class: Option<&str>) -> Result<String> {
    let json = serde_json::to_string_pretty(data)
        .with_context(|| format!("Failed to serialize data block {id}"))?
        .replace("</", "<\\/");
    let class_attr = class.map_or_else(String::new, |c| format!(r#" class="{c}""#));
    Ok(format!(
        "<script type=\"{SCRIPT_TYPE}\" id=\"{id}\"{class_attr}>\n{json}\n</script>\n"
    ))
}

/// Data blocks for every combination (in table order), the benchmarks and the indicators.
pub fn render_blocks<B: Serialize, I: Serialize>(
    rankings: &BTreeMap<String, Vec<RankedFund>>,
    benchmarks: &B,
    indicators: &I,
) -> Result<String> {
    let mut blocks = String::new();
    for combination in &COMBINATIONS {
        let id = combination.id();
        let empty = Vec::new();
        let funds = rankings.get(&id).unwrap_or(&empty);
        blocks.push_str(&script_tag(&format!("{ID_PREFIX}{id}"), funds, Some(DATA_CLASS))?);
    }
    blocks.push_str(&script_tag(ID_BENCHMARK, benchmarks, None)?);
    blocks.push_str(&script_tag(ID_INDICATORS, indicators, None)?);
    Ok(blocks)
}

/// Replaces previously generated data blocks in the body of `html` with
/// `blocks`, appended at the end of the body. The head is left untouched.
pub fn inject_blocks(html: &str, blocks: &str) -> Result<String> {
    let body_start = BODY_OPEN_RE
        .find(html)
        .map(|m| m.start())
        .ok_or_else(|| anyhow!("No <body> tag found in report"))?;
    let (head, body) = html.split_at(body_start);

    let mut removed = 0;
    let cleaned = SCRIPT_RE.replace_all(body, |caps: &regex::Captures| {
        if is_generated(&caps[1]) {
            removed += 1;
            String::new()
        } else {
            caps[0].to_string()
        }
    });
    debug!("Removed {} old data blocks", removed);

    let close = BODY_CLOSE_RE
        .find_iter(&cleaned)
        .last()
        .map_or(cleaned.len(), |m| m.start());
    let mut updated = String::with_capacity(html.len() + blocks.len());
    updated.push_str(head);
    updated.push_str(&cleaned[..close]);
    updated.push_str(blocks);
    updated.push_str(&cleaned[close..]);
    Ok(updated)
}

pub fn update_report<P: AsRef<Path>>(path: P, blocks: &str) -> Result<()> {
    let path = path.as_ref();
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report: {}", path.display()))?;
    let updated = inject_blocks(&html, blocks)?;
    std::fs::write(path, updated)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    info!("Updated {} with new data blocks", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><script src="app.js"></script></head>
<body>
<div id="app"></div>
<script type="application/json" id="data_base" class="fci_data">
[]
</script>
<script type="application/json" id="benchmarkGarantizado">
[{"nombre": "old"}]
</script>
<script>console.log("keep");</script>
</body>
</html>
"#;

    #[test]
    fn test_script_tag_escapes_closing_sequence() {
        let tag =
            script_tag("data_x", &json!({"name": "</script>ñ"}), Some(DATA_CLASS)).unwrap();
        assert!(
            tag.starts_with(r#"<script type="application/json" id="data_x" class="fci_data">"#)
        );
        assert!(tag.contains(r"<\/script>ñ"));
        assert_eq!(tag.matches("</script>").count(), 1);
    }

    #[test]
    fn test_inject_replaces_generated_blocks() {
        let blocks = script_tag("data_usd", &json!([]), Some(DATA_CLASS)).unwrap();
        let updated = inject_blocks(PAGE, &blocks).unwrap();

        assert!(!updated.contains("data_base"));
        assert!(!updated.contains(r#""old""#));
        assert!(updated.contains(r#"<script>console.log("keep");</script>"#));
        assert!(updated.contains(r#"<script src="app.js"></script>"#));
        let block_pos = updated.find("data_usd").unwrap();
        assert!(block_pos < updated.find("</body>").unwrap());
        assert!(block_pos > updated.find("keep").unwrap());
    }

    #[test]
    fn test_inject_is_repeatable() {
        let blocks = script_tag("data_usd", &json!([1]), Some(DATA_CLASS)).unwrap();
        let once = inject_blocks(PAGE, &blocks).unwrap();
        let twice = inject_blocks(&once, &blocks).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_inject_keeps_head_blocks() {
        let page = r#"<html>
<head>
<script type="application/json" id="datosFinancieros">{"source": "head"}</script>
<script type="application/json" id="data_head" class="fci_data">[]</script>
</head>
<body>
<script type="application/json" id="datosFinancieros">{"source": "body"}</script>
</body>
</html>
"#;
        let blocks = script_tag(ID_INDICATORS, &json!({"source": "new"}), None).unwrap();
        let updated = inject_blocks(page, &blocks).unwrap();

        let body_pos = updated.find("<body>").unwrap();
        assert!(updated[..body_pos].contains(r#"{"source": "head"}"#));
        assert!(updated[..body_pos].contains(r#"id="data_head""#));
        assert!(!updated.contains(r#"{"source": "body"}"#));
        assert!(updated[body_pos..].contains(r#""source": "new""#));
        assert_eq!(updated.matches(r#"id="datosFinancieros""#).count(), 2);
    }

    #[test]
    fn test_missing_body_fails() {
        assert!(inject_blocks("<html><head></head></html>", "").is_err());
    }

    #[test]
    fn test_render_blocks_covers_every_combination() {
        let mut rankings = BTreeMap::new();
        rankings.insert(
            "sa_ytd_usd".to_string(),
            vec![RankedFund {
                name: "Dolar - Clase A".to_string(),
                daily_variation: Some(0.01),
                ytd_variation: Some(1.5),
                currency: "USD".to_string(),
                classification: 3,
                min_investment: 1,
            }],
        );
        let blocks = render_blocks(&rankings, &json!([]), &json!({})).unwrap();

        assert_eq!(blocks.matches(r#"class="fci_data""#).count(), 16);
        assert!(blocks.contains(r#"id="data_base""#));
        assert!(blocks.contains(r#"id="data_sa_ytd_usd""#));
        assert!(blocks.contains("Dolar - Clase A"));
        assert!(blocks.contains(r#"id="benchmarkGarantizado""#));
        assert!(blocks.contains(r#"id="datosFinancieros""#));
    }
}
