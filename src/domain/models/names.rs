//! Resource naming convention: `app[-stack[-detail...]][-vNNN]`.

use serde::Serialize;

/// Components decoded from a compound resource name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Names {
    /// The full name minus any push sequence suffix
    pub cluster: String,
    pub app: String,
    pub stack: Option<String>,
    pub detail: Option<String>,
    pub sequence: Option<u32>,
}

impl Names {
    /// Decode `name`. Returns `None` when no valid application prefix exists.
    pub fn parse(name: &str) -> Option<Self> {
        let (cluster, sequence) = split_sequence(name);

        let mut parts = cluster.split('-');
        let app = parts.next().filter(|app| is_valid_app(app))?;
        let stack = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
        let rest: Vec<&str> = parts.collect();
        let detail = Some(rest.join("-")).filter(|d| !d.is_empty());

        Some(Self {
            cluster: cluster.to_string(),
            app: app.to_string(),
            stack,
            detail,
            sequence,
        })
    }
}

fn split_sequence(name: &str) -> (&str, Option<u32>) {
    if let Some((prefix, suffix)) = name.rsplit_once('-') {
        if let Some(digits) = suffix.strip_prefix('v') {
            if digits.len() >= 3 && digits.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(seq) = digits.parse() {
                    return (prefix, Some(seq));
                }
            }
        }
    }
    (name, None)
}

fn is_valid_app(app: &str) -> bool {
    !app.is_empty()
        && app
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
