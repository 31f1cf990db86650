use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::WWW_AUTHENTICATE;
use reqwest::{Response, StatusCode, Url};
use tracing::{debug, trace};

use crate::config::SyslogEndpoint;
use crate::provider::types::{sorted_or_sentinel, LogEntry};
use crate::provider::{LogError, LogResult};

// Tokens of the aggregation server's directory listing format. A listing
// line carries a link cell followed by date and size cells:
//
//   <tr><td><a href="server.log.2024-02-01">server.log.2024-02-01</a></td>
//   <td>01-Feb-2024 04:00</td><td>24K</td></tr>
const LINK_SEPARATOR: &str = "<a href=\"";
const NAME_BOUNDARY: &str = "\">";
const CELL_SEPARATOR: &str = "</td><td>";
const COLUMN_END: &str = "</td>";
const ESCAPED_SPACE: &str = "%20";

/// Filenames qualifying as log entries in a remote listing. A substring
/// match is sufficient.
static LOG_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.log").expect("log name pattern is valid"));

/// One qualifying listing line, split into its named fragments.
struct ListingLine<'a> {
    href: &'a str,
    date_cell: &'a str,
    size_cell: &'a str,
}

/// Match a single listing line. A line qualifies only when splitting on the
/// link token yields exactly two fragments and splitting on the cell token
/// yields exactly three.
fn match_line(line: &str) -> Option<ListingLine<'_>> {
    let link_fragments: Vec<&str> = line.split(LINK_SEPARATOR).collect();
    if link_fragments.len() != 2 {
        return None;
    }
    let href = link_fragments[1].split(NAME_BOUNDARY).next()?;

    let cells: Vec<&str> = line.split(CELL_SEPARATOR).collect();
    if cells.len() != 3 {
        return None;
    }
    Some(ListingLine {
        href,
        date_cell: cells[1].split(COLUMN_END).next()?,
        size_cell: cells[2].split(COLUMN_END).next()?,
    })
}

/// Parse the raw text of a remote directory listing into a sorted index.
/// Malformed lines are skipped, not failed; an empty result becomes the
/// no-logs sentinel.
pub fn parse_index(raw: &str) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    for line in raw.lines() {
        let Some(matched) = match_line(line) else {
            trace!("skipping non-entry listing line");
            continue;
        };
        if !LOG_NAME_PATTERN.is_match(matched.href) {
            trace!("skipping listing entry without log name: {}", matched.href);
            continue;
        }
        let name = matched.href.replace('\\', "").replace(ESCAPED_SPACE, " ");
        entries.push(LogEntry::new(name, matched.date_cell, matched.size_cell));
    }
    sorted_or_sentinel(entries)
}

/// HTTP client for the syslog aggregation server. Request-scoped: built
/// from the endpoint configuration for a single resolve or retrieve call.
pub struct RemoteLogClient {
    endpoint: SyslogEndpoint,
    http: reqwest::Client,
}

impl RemoteLogClient {
    pub fn new(endpoint: SyslogEndpoint) -> LogResult<Self> {
        endpoint.validate().map_err(LogError::Configuration)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .build()
            .map_err(|e| LogError::Configuration(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { endpoint, http })
    }

    /// Issue an authenticated GET for the given URL. The configured port
    /// applies when the URL does not name one.
    pub async fn fetch(&self, url: &str) -> LogResult<Response> {
        let mut target =
            Url::parse(url).map_err(|e| LogError::InvalidEndpoint(format!("{url}: {e}")))?;
        if target.port().is_none() {
            // Ignored for URLs that cannot carry a port.
            let _ = target.set_port(Some(self.endpoint.port));
        }
        debug!("fetching {}", target);

        let response = self
            .http
            .get(target)
            .basic_auth(&self.endpoint.username, Some(&self.endpoint.password))
            .send()
            .await
            .map_err(|e| LogError::retrieval(url, e))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let challenge = response
                .headers()
                .get(WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("<none>")
                .to_string();
            return Err(LogError::Configuration(format!(
                "syslog server rejected credentials for user '{}' (configured realm '{}', server challenge: {})",
                self.endpoint.username, self.endpoint.realm, challenge
            )));
        }
        response
            .error_for_status()
            .map_err(|e| LogError::retrieval(url, e))
    }

    /// Fetch and parse the directory index behind `url`.
    pub async fn fetch_index(&self, url: &str) -> LogResult<Vec<LogEntry>> {
        let body = self
            .fetch(url)
            .await?
            .text()
            .await
            .map_err(|e| LogError::retrieval(url, e))?;
        Ok(parse_index(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::types::NO_LOG_FILES;

    fn row(name_href: &str, name_text: &str, date: &str, size: &str) -> String {
        format!(
            "<tr><td><a href=\"{name_href}\">{name_text}</a></td><td>{date}</td><td>{size}</td></tr>"
        )
    }

    #[test]
    fn well_formed_line_becomes_an_entry() {
        let listing = row(
            "server.log.2024-02-01",
            "server.log.2024-02-01",
            "01-Feb-2024 04:00",
            "24K",
        );
        let entries = parse_index(&listing);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "server.log.2024-02-01");
        assert_eq!(entries[0].date, "01-Feb-2024 04:00");
        assert_eq!(entries[0].size, "24K");
    }

    #[test]
    fn escaped_spaces_and_backslashes_are_removed_from_names() {
        let listing = row(
            "app%20error.log",
            "app error.log",
            "01-Feb-2024 04:00",
            "1.5K",
        );
        let entries = parse_index(&listing);
        assert_eq!(entries[0].name, "app error.log");

        let listing = row("server\\.log", "server.log", "01-Feb-2024 04:00", "2K");
        let entries = parse_index(&listing);
        assert_eq!(entries[0].name, "server.log");
    }

    #[test]
    fn line_with_two_cells_is_skipped() {
        // Date and size collapsed into one cell: only two cell fragments.
        let listing =
            "<tr><td><a href=\"server.log\">server.log</a></td><td>01-Feb-2024 24K</td></tr>";
        let entries = parse_index(listing);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, NO_LOG_FILES);
    }

    #[test]
    fn line_without_link_is_skipped() {
        let listing = "<tr><td>parent directory</td><td>01-Feb-2024</td><td>-</td></tr>";
        let entries = parse_index(listing);
        assert!(entries[0].is_sentinel());
    }

    #[test]
    fn non_log_names_are_skipped() {
        let listing = [
            row("readme.txt", "readme.txt", "01-Feb-2024 04:00", "1K"),
            row("server.log", "server.log", "01-Feb-2024 04:00", "2K"),
        ]
        .join("\n");
        let entries = parse_index(&listing);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "server.log");
    }

    #[test]
    fn entries_come_back_sorted() {
        let listing = [
            row("b.log", "b.log", "d", "1K"),
            row("A.log", "A.log", "d", "1K"),
        ]
        .join("\n");
        let names: Vec<String> = parse_index(&listing).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["A.log", "b.log"]);
    }

    #[test]
    fn empty_listing_yields_sentinel() {
        let entries = parse_index("");
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_sentinel());
    }
}
