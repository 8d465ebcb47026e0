//! Reader for the LETOR / SVMlight ranking format
//!
//! ```text
//! 2 qid:10 1:0.03 2:0.5 3:0.12 # docid = GX000
//! ```
//!
//! Consecutive lines with the same qid form one query. Feature indices are
//! 1-based; indices missing from a line read as 0.0.

use super::{Document, Query, check_feature_len};
use crate::error::{LtrError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

struct Line {
    qid: String,
    label: f64,
    features: Vec<(usize, f64)>,
}

fn parse_error(line: usize, message: impl Into<String>) -> LtrError {
    LtrError::Parse { line, message: message.into() }
}

fn parse_line(text: &str, line: usize) -> Result<Option<Line>> {
    let content = text.split('#').next().unwrap_or("").trim();
    if content.is_empty() {
        return Ok(None);
    }

    let mut tokens = content.split_whitespace();
    let label = tokens.next()
        .ok_or_else(|| parse_error(line, "missing label"))?
        .parse::<f64>()
        .map_err(|e| parse_error(line, format!("bad label: {}", e)))?;

    let qid = tokens.next()
        .and_then(|t| t.strip_prefix("qid:"))
        .ok_or_else(|| parse_error(line, "missing qid"))?
        .to_string();

    let mut features = Vec::new();
    for token in tokens {
        let (index, value) = token.split_once(':')
            .ok_or_else(|| parse_error(line, format!("bad feature `{}`", token)))?;
        let index = index.parse::<usize>()
            .ok()
            .filter(|&i| i > 0)
            .ok_or_else(|| parse_error(line, format!("bad feature index `{}`", index)))?;
        let value = value.parse::<f64>()
            .map_err(|e| parse_error(line, format!("bad feature value: {}", e)))?;
        features.push((index, value));
    }

    Ok(Some(Line { qid, label, features }))
}

fn dense(features: &[(usize, f64)], len: usize) -> Vec<f64> {
    let mut out = vec![0.0; len];
    for &(index, value) in features {
        out[index - 1] = value;
    }
    out
}

/// Read queries from LETOR-formatted text
pub fn read_letor<R: BufRead>(reader: R) -> Result<Vec<Query>> {
    let mut lines = Vec::new();
    for (number, text) in reader.lines().enumerate() {
        if let Some(line) = parse_line(&text?, number + 1)? {
            lines.push(line);
        }
    }

    let len = lines.iter()
        .flat_map(|l| l.features.iter().map(|&(i, _)| i))
        .max()
        .unwrap_or(0);

    let mut queries: Vec<Query> = Vec::new();
    for line in lines {
        let starts_new = queries.last().is_none_or(|q| q.id != line.qid);
        if starts_new {
            queries.push(Query::new(line.qid.clone(), Vec::new()));
        }
        if let Some(query) = queries.last_mut() {
            let position = query.documents.len();
            query.documents.push(Document::new(dense(&line.features, len), line.label, position));
        }
    }

    check_feature_len(&queries, len)?;
    log::debug!("read {} queries with {} features", queries.len(), len);
    Ok(queries)
}

/// Read queries from a LETOR file
pub fn read_letor_file(path: impl AsRef<Path>) -> Result<Vec<Query>> {
    let file = File::open(path)?;
    read_letor(BufReader::new(file))
}
