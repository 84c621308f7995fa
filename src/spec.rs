//! Coordinate list parsing.
//!
//! A spec file holds one `group:artifact` or `group:artifact:version` per
//! line. Anything else is reported and skipped; only an unreadable source is
//! an error.

use crate::coordinate::Coordinate;
use crate::ui;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub fn parse_spec_file(path: &Path) -> io::Result<Vec<Coordinate>> {
    let file = File::open(path)?;
    parse_spec(BufReader::new(file))
}

pub fn parse_spec<R: BufRead>(reader: R) -> io::Result<Vec<Coordinate>> {
    let mut coordinates = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Some(coordinate) => coordinates.push(coordinate),
            None => ui::warn(format!("Invalid artifact entry on line {}: '{}'", index + 1, line)),
        }
    }
    Ok(coordinates)
}

/// Parses a single spec line. Returns `None` for malformed lines.
pub fn parse_line(line: &str) -> Option<Coordinate> {
    let parts: Vec<&str> = line.split(':').map(str::trim).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    match parts.as_slice() {
        [group, artifact] => Some(Coordinate::new(*group, *artifact)),
        [group, artifact, version] => Some(Coordinate::new(*group, *artifact).with_version(*version)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_line_with_version() {
        let c = parse_line("com.google.guava:guava:30.1-jre").unwrap();
        assert_eq!(c.group_id, "com.google.guava");
        assert_eq!(c.artifact_id, "guava");
        assert_eq!(c.version.as_deref(), Some("30.1-jre"));
    }

    #[test]
    fn test_parse_line_latest() {
        let c = parse_line("com.google.guava:guava").unwrap();
        assert_eq!(c.version, None);
    }

    #[test]
    fn test_parse_line_trims_parts() {
        let c = parse_line("  org.slf4j : slf4j-api : 2.0.13 ").unwrap();
        assert_eq!(c.to_string(), "org.slf4j:slf4j-api:2.0.13");
    }

    #[test]
    fn test_parse_line_rejects_bad_shapes() {
        assert!(parse_line("guava").is_none());
        assert!(parse_line("").is_none());
        assert!(parse_line("a:b:c:d").is_none());
        assert!(parse_line("a::1.0").is_none());
        assert!(parse_line("a:b:").is_none());
    }

    #[test]
    fn test_parse_spec_keeps_order_and_duplicates() {
        let input = "com.example:one:1.0\nbroken-line\ncom.example:two\ncom.example:one:1.0\n";
        let coords = parse_spec(Cursor::new(input)).unwrap();
        let rendered: Vec<String> = coords.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["com.example:one:1.0", "com.example:two", "com.example:one:1.0"]
        );
    }

    #[test]
    fn test_parse_spec_file_missing_is_error() {
        let result = parse_spec_file(Path::new("definitely/not/here/spec.txt"));
        assert!(result.is_err());
    }
}
