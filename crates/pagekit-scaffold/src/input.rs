//! Parsing of `identifier:description` requests.

/// A request to scaffold one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Page identifier, e.g. `blog` or `admin/users`
    pub chunk: String,

    /// Link label, defaults to the identifier
    pub description: String,
}

/// Errors for malformed requests.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid input {0:?}: expected `page:description`, e.g. `a:Page A` or `a/b/c:Page ABC`")]
    MissingSeparator(String),

    #[error("Invalid page identifier {chunk:?}: {reason}")]
    InvalidIdentifier { chunk: String, reason: &'static str },
}

/// Parse a line of operator input.
///
/// Only the first `:` separates identifier from description, so descriptions
/// may contain colons themselves.
pub fn parse_request(line: &str) -> Result<PageRequest, InputError> {
    let line = line.trim();

    let Some((chunk, description)) = line.split_once(':') else {
        return Err(InputError::MissingSeparator(line.to_string()));
    };

    let chunk = chunk.trim().trim_end_matches('/');
    validate_identifier(chunk)?;

    let description = description.trim();
    let description = if description.is_empty() {
        chunk
    } else {
        description
    };

    Ok(PageRequest {
        chunk: chunk.to_string(),
        description: description.to_string(),
    })
}

/// Check that an identifier is a relative, forward-slash path that is safe to use
/// as a directory name and as a URL path inside an HTML attribute.
fn validate_identifier(chunk: &str) -> Result<(), InputError> {
    let invalid = |reason| {
        Err(InputError::InvalidIdentifier {
            chunk: chunk.to_string(),
            reason,
        })
    };

    if chunk.is_empty() {
        return invalid("identifier is empty");
    }
    if chunk.starts_with('/') {
        return invalid("identifier must be a relative path");
    }
    if let Some(c) = chunk
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || "\\\"'<>&#?%".contains(*c))
    {
        return match c {
            '\\' => invalid("use `/` to separate nested directories"),
            c if c.is_whitespace() => invalid("identifier must not contain whitespace"),
            '#' | '?' | '%' => invalid("identifier must not contain `#`, `?` or `%`"),
            _ => invalid("identifier contains a character that is not allowed in a path"),
        };
    }
    if chunk
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return invalid("identifier contains an empty, `.` or `..` segment");
    }

    Ok(())
}
