use std::path::Path;

use crate::errors::ReachError;
use crate::models::VulnerabilityTarget;

const ID_COLUMN: usize = 0;
const SINK_CLASS_COLUMN: usize = 2;
const SINK_METHOD_COLUMN: usize = 3;

/// Read the vulnerability list: a CSV file with a header row and at least the
/// columns `id, <library>, sink class, sink method`.
pub async fn read_vulnerabilities(path: &Path) -> Result<Vec<VulnerabilityTarget>, ReachError> {
    if !path.is_file() {
        return Err(ReachError::Config(format!(
            "Vulnerabilities file not found: {}",
            path.display()
        )));
    }
    let content = tokio::fs::read_to_string(path).await?;
    parse_vulnerabilities(&content)
}

pub fn parse_vulnerabilities(content: &str) -> Result<Vec<VulnerabilityTarget>, ReachError> {
    let mut targets = Vec::new();
    for (line_no, line) in content.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_csv_line(line);
        if fields.len() <= SINK_METHOD_COLUMN {
            return Err(ReachError::Config(format!(
                "Cannot parse the vulnerabilities file: line {} has {} columns, expected at least {}",
                line_no + 1,
                fields.len(),
                SINK_METHOD_COLUMN + 1
            )));
        }
        let id = fields[ID_COLUMN].trim();
        let sink_class = fields[SINK_CLASS_COLUMN].trim();
        let sink_method = fields[SINK_METHOD_COLUMN].trim();
        if id.is_empty() || sink_class.is_empty() || sink_method.is_empty() {
            return Err(ReachError::Config(format!(
                "Cannot parse the vulnerabilities file: line {} has an empty id, class or method",
                line_no + 1
            )));
        }
        targets.push(VulnerabilityTarget::new(id, sink_class, sink_method));
    }
    Ok(targets)
}

/// Split one CSV record, honouring double-quoted fields and `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_header_and_blank_lines() {
        let csv = "cve,library,class,method\nCVE-2021-1,g:a:1.0,org.lib.Parser,parse\n\nCVE-2021-2,g:b:2.0,org.lib.Loader,load(Ljava/lang/String;)V\n";
        let targets = parse_vulnerabilities(csv).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0], VulnerabilityTarget::new("CVE-2021-1", "org.lib.Parser", "parse"));
        assert_eq!(targets[1].sink_method, "load(Ljava/lang/String;)V");
    }

    #[test]
    fn test_parse_quoted_fields() {
        let csv = "h\n\"CVE-1\",\"g:a,1.0\",org.X,\"run(I,I)V\"\n";
        let targets = parse_vulnerabilities(csv).unwrap();
        assert_eq!(targets[0].sink_class, "org.X");
        assert_eq!(targets[0].sink_method, "run(I,I)V");
    }

    #[test]
    fn test_parse_rejects_short_rows() {
        let err = parse_vulnerabilities("h\nCVE-1,lib,org.X\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_header_only() {
        assert!(parse_vulnerabilities("cve,library,class,method\n").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = read_vulnerabilities(Path::new("/nonexistent/vulns.csv")).await.unwrap_err();
        assert!(matches!(err, ReachError::Config(_)));
    }
}
