//! Minimal HTML table extraction.
//!
//! Deliberately naive string scanning tailored to reference pages carrying
//! plain data tables: no DOM is built, tag and attribute names are matched
//! ASCII case-insensitively, and nested tables inside cells are not
//! supported.

/// Header cells plus data rows of one `<table>` element, as cleaned text.
#[derive(Debug, Clone)]
pub struct HtmlTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Scan `doc` for `<table>` elements in document order and return the first
/// one whose header row satisfies `accept`.
pub fn first_matching_table(doc: &str, accept: impl Fn(&[String]) -> bool) -> Option<HtmlTable> {
    let mut from = 0usize;
    while let Some((start, end)) = tag_block(doc, "<table", "</table>", from) {
        let table = parse_table(&doc[start..end]);
        if accept(&table.headers) {
            return Some(table);
        }
        from = end;
    }
    None
}

fn parse_table(block: &str) -> HtmlTable {
    let mut headers = Vec::new();
    let mut rows = Vec::new();
    let mut pos = 0usize;

    while let Some((tr_start, tr_end)) = tag_block(block, "<tr", "</tr>", pos) {
        let tr = &block[tr_start..tr_end];
        pos = tr_end;

        if headers.is_empty() {
            let header_cells = cells(tr, "<th", "</th>");
            if !header_cells.is_empty() {
                headers = header_cells;
                continue;
            }
        }

        let data_cells = cells(tr, "<td", "</td>");
        if !data_cells.is_empty() {
            rows.push(data_cells);
        }
    }

    HtmlTable { headers, rows }
}

fn cells(tr: &str, open: &str, close: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((start, end)) = tag_block(tr, open, close, pos) {
        out.push(clean_text(inner_of(&tr[start..end])));
        pos = end;
    }
    out
}

/// Find the next complete `<open ...>…</close>` block at or after `from`,
/// returning byte offsets of the whole block.
fn tag_block(s: &str, open: &str, close: &str, from: usize) -> Option<(usize, usize)> {
    let lower = ascii_lower(s);
    let open_lower = ascii_lower(open);
    let close_lower = ascii_lower(close);

    let start = find_tag_open(&lower, &open_lower, from)?;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lower.get(open_end..)?.find(&close_lower)?;
    let end = open_end + end_rel + close.len();
    Some((start, end))
}

/// Locate an opening tag, rejecting longer tag names that merely share the
/// prefix (`<th` must not match `<thead`).
fn find_tag_open(lower: &str, open: &str, from: usize) -> Option<usize> {
    let mut at = from;
    loop {
        let rel = lower.get(at..)?.find(open)?;
        let idx = at + rel;
        match lower.as_bytes().get(idx + open.len()) {
            Some(b) if b.is_ascii_alphanumeric() => at = idx + open.len(),
            _ => return Some(idx),
        }
    }
}

/// Content of a complete tag block, without the wrapping open/close tags.
fn inner_of(block: &str) -> &str {
    let Some(open_end) = block.find('>') else {
        return "";
    };
    let Some(close_start) = block.rfind('<') else {
        return "";
    };
    if close_start > open_end {
        &block[open_end + 1..close_start]
    } else {
        ""
    }
}

fn clean_text(s: &str) -> String {
    normalize_ws(&decode_entities(&strip_tags(s)))
}

/// Remove every `<...>` run from the string.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Decode the handful of entities that actually occur in the source pages.
fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Collapse whitespace runs into single spaces and trim.
fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// ASCII-only lowercasing; leaves multi-byte characters alone so byte
/// offsets stay aligned with the original string.
fn ascii_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        <html><body>
        <table class="infobox"><tr><td>not the one</td></tr></table>
        <table class="wikitable sortable" id="constituents">
          <tbody>
            <tr><th>Symbol</th><th>Security</th><th>GICS Sector</th></tr>
            <tr><td><a href="/q?s=MMM">MMM</a></td><td>3M</td><td>Industrials</td></tr>
            <tr><td>AOS</td><td>A. O. Smith</td><td>Industrials</td></tr>
          </tbody>
        </table>
        </body></html>
    "#;

    fn starts_with_symbol(headers: &[String]) -> bool {
        headers.first().map(|h| h == "Symbol").unwrap_or(false)
    }

    #[test]
    fn picks_first_table_matching_header() {
        let table = first_matching_table(DOC, starts_with_symbol).unwrap();
        assert_eq!(table.headers, vec!["Symbol", "Security", "GICS Sector"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["MMM", "3M", "Industrials"]);
    }

    #[test]
    fn no_match_returns_none() {
        assert!(first_matching_table(DOC, |h| h.first().map(|s| s == "CIK").unwrap_or(false))
            .is_none());
    }

    #[test]
    fn th_does_not_match_thead() {
        let doc = r#"
            <table>
              <thead><tr><th>Symbol</th></tr></thead>
              <tbody><tr><td>MMM</td></tr></tbody>
            </table>
        "#;
        let table = first_matching_table(doc, starts_with_symbol).unwrap();
        assert_eq!(table.headers, vec!["Symbol"]);
        assert_eq!(table.rows, vec![vec!["MMM"]]);
    }

    #[test]
    fn cleans_entities_tags_and_whitespace() {
        let doc = r#"
            <table>
              <tr><th>Symbol</th><th>Security</th></tr>
              <tr><td> BRK.B </td><td><b>Berkshire&nbsp;Hathaway</b>
                  &amp; Co.</td></tr>
            </table>
        "#;
        let table = first_matching_table(doc, starts_with_symbol).unwrap();
        assert_eq!(table.rows[0], vec!["BRK.B", "Berkshire Hathaway & Co."]);
    }

    #[test]
    fn case_insensitive_tags() {
        let doc = "<TABLE><TR><TH>Symbol</TH></TR><TR><TD>MMM</TD></TR></TABLE>";
        let table = first_matching_table(doc, starts_with_symbol).unwrap();
        assert_eq!(table.rows, vec![vec!["MMM"]]);
    }
}
