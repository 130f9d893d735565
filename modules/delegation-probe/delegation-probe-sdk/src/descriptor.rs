//! Resolved backend connection strings.
//!
//! Two syntaxes are accepted: URL form (`postgres://user@host/db`,
//! `sqlite::memory:`) and ADO-style `key=value;` form
//! (`Server=sql01;Database=Intranet;Integrated Security=SSPI`). The raw string
//! is kept in a [`SecretString`]; everything that leaves the descriptor for
//! logs or reports goes through [`ConnectionDescriptor::redacted`].

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::DescriptorError;

const MASK: &str = "***";
const SENSITIVE_KEYS: &[&str] = &["password", "pwd"];

#[derive(Clone, PartialEq, Eq)]
enum Syntax {
    Url { scheme: String },
    KeyValue,
}

/// A named, validated connection string.
#[derive(Clone)]
pub struct ConnectionDescriptor {
    name: String,
    raw: SecretString,
    syntax: Syntax,
}

impl ConnectionDescriptor {
    /// Validate `raw` and wrap it.
    ///
    /// # Errors
    ///
    /// - `Empty` if `raw` is blank
    /// - `Malformed` if `raw` is neither a URL nor a `key=value;` list
    pub fn parse(name: impl Into<String>, raw: &str) -> Result<Self, DescriptorError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DescriptorError::Empty);
        }

        let syntax = match Url::parse(trimmed) {
            Ok(url) => Syntax::Url {
                scheme: url.scheme().to_owned(),
            },
            Err(url_err) => {
                if key_value_pairs(trimmed).is_some() {
                    Syntax::KeyValue
                } else {
                    return Err(DescriptorError::Malformed {
                        reason: format!("not a URL ({url_err}) and not a key=value list"),
                    });
                }
            }
        };

        Ok(Self {
            name: name.into(),
            raw: SecretString::from(trimmed.to_owned()),
            syntax,
        })
    }

    /// The configuration key this descriptor was resolved from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL scheme, lowercase. `None` for `key=value;` descriptors.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        match &self.syntax {
            Syntax::Url { scheme } => Some(scheme),
            Syntax::KeyValue => None,
        }
    }

    #[must_use]
    pub fn is_key_value(&self) -> bool {
        self.syntax == Syntax::KeyValue
    }

    /// The raw connection string. Only drivers should call this.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.raw.expose_secret()
    }

    /// The connection string with passwords masked.
    #[must_use]
    pub fn redacted(&self) -> String {
        match self.syntax {
            Syntax::Url { .. } => redact_url(self.expose()),
            Syntax::KeyValue => redact_key_value(self.expose()),
        }
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("name", &self.name)
            .field("target", &self.redacted())
            .finish()
    }
}

fn is_sensitive(key: &str) -> bool {
    SENSITIVE_KEYS
        .iter()
        .any(|k| k.eq_ignore_ascii_case(key.trim()))
}

/// One `key=value` entry of an ADO-style connection string. `value` keeps its
/// quotes.
struct KeyValuePair<'a> {
    key: &'a str,
    value: &'a str,
}

/// Split an ADO-style connection string into entries. Values quoted with `'`
/// or `"` may contain `;` and `=`; a doubled quote inside them is a literal
/// quote. `None` if the string is not a well-formed list.
fn key_value_pairs(raw: &str) -> Option<Vec<KeyValuePair<'_>>> {
    let mut pairs = Vec::new();
    let mut rest = raw;
    loop {
        rest = rest.trim_start_matches(|c: char| c == ';' || c.is_whitespace());
        if rest.is_empty() {
            break;
        }

        let eq = rest.find('=')?;
        let key = rest[..eq].trim_end();
        if key.is_empty() || key.contains(';') {
            return None;
        }

        let after = &rest[eq + 1..];
        let len = value_len(after)?;
        pairs.push(KeyValuePair {
            key,
            value: after[..len].trim(),
        });

        rest = after[len..].trim_start();
        if !(rest.is_empty() || rest.starts_with(';')) {
            return None;
        }
    }

    (!pairs.is_empty()).then_some(pairs)
}

/// Byte length of the value at the start of `s`, up to but excluding the
/// terminating `;`.
fn value_len(s: &str) -> Option<usize> {
    let lead = s.len() - s.trim_start().len();
    let body = s[lead..].as_bytes();
    match body.first() {
        Some(&quote @ (b'"' | b'\'')) => {
            let mut i = 1;
            while i < body.len() {
                if body[i] == quote {
                    if body.get(i + 1) == Some(&quote) {
                        i += 2;
                        continue;
                    }
                    return Some(lead + i + 1);
                }
                i += 1;
            }
            None
        }
        _ => Some(body.iter().position(|&b| b == b';').map_or(s.len(), |i| lead + i)),
    }
}

fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return MASK.to_owned();
    };

    if url.password().is_some() && url.set_password(Some(MASK)).is_err() {
        return MASK.to_owned();
    }

    if url.query_pairs().any(|(k, _)| is_sensitive(&k)) {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let value = if is_sensitive(&k) {
                    MASK.to_owned()
                } else {
                    v.into_owned()
                };
                (k.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    url.into()
}

fn redact_key_value(raw: &str) -> String {
    let Some(pairs) = key_value_pairs(raw) else {
        return MASK.to_owned();
    };

    pairs
        .iter()
        .map(|pair| {
            let value = if is_sensitive(pair.key) {
                MASK
            } else {
                pair.value
            };
            format!("{}={value}", pair.key)
        })
        .collect::<Vec<_>>()
        .join(";")
}
