//! Keyword library metadata and dispatch by name.
//!
//! Test runners address keywords by their human-readable names ("Email
//! Subject Should Match") and pass every argument as a string.
//! [`MailosaurKeywords::run_keyword`] resolves the name against [`KEYWORDS`],
//! converts the arguments and calls the matching method.

use crate::errors::{KeywordError, KeywordResult};
use crate::keywords::MailosaurKeywords;

/// Version reported by the library.
pub const LIBRARY_VERSION: &str = "0.1";

/// Lifetime of a library instance within a test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryScope {
    /// One instance for the whole run.
    Global,
    /// One instance per suite.
    Suite,
    /// One instance per test.
    Test,
}

impl LibraryScope {
    /// Returns the scope name as test runners spell it.
    pub fn as_str(self) -> &'static str {
        match self {
            LibraryScope::Global => "GLOBAL",
            LibraryScope::Suite => "SUITE",
            LibraryScope::Test => "TEST",
        }
    }
}

impl std::fmt::Display for LibraryScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope of the library.
pub const LIBRARY_SCOPE: LibraryScope = LibraryScope::Global;

/// Type of a keyword argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// Free text.
    Text,
    /// Non-negative integer.
    Count,
    /// Boolean flag.
    Flag,
}

/// A declared keyword argument.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentSpec {
    /// Argument name.
    pub name: &'static str,
    /// Argument type.
    pub kind: ArgumentKind,
}

/// A keyword exposed by the library.
#[derive(Debug, Clone, Copy)]
pub struct KeywordSpec {
    /// Human-readable keyword name.
    pub name: &'static str,
    /// Arguments in call order.
    pub arguments: &'static [ArgumentSpec],
    /// Keyword documentation.
    pub doc: &'static str,
}

impl KeywordSpec {
    /// Returns the argument names joined for display.
    pub fn signature(&self) -> String {
        self.arguments
            .iter()
            .map(|arg| arg.name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

const fn text(name: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        kind: ArgumentKind::Text,
    }
}

const fn count(name: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        kind: ArgumentKind::Count,
    }
}

const fn flag(name: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        kind: ArgumentKind::Flag,
    }
}

/// Every keyword the library provides.
pub const KEYWORDS: &[KeywordSpec] = &[
    KeywordSpec {
        name: "Email Subject Should Match",
        arguments: &[text("matcher")],
        doc: "Checks the subject of the last email received on the server domain equals the matcher.",
    },
    KeywordSpec {
        name: "Email Subject Should Contain",
        arguments: &[text("matcher")],
        doc: "Checks the subject of the last email received on the server domain contains the matcher.",
    },
    KeywordSpec {
        name: "Delete All Emails",
        arguments: &[],
        doc: "Deletes all emails on the selected server.",
    },
    KeywordSpec {
        name: "Email Should Have Links",
        arguments: &[count("links_number")],
        doc: "Checks the last email contains exactly links_number links.",
    },
    KeywordSpec {
        name: "Email Should Have Attachments",
        arguments: &[count("attachments_number")],
        doc: "Checks the last email contains exactly attachments_number attachments.",
    },
    KeywordSpec {
        name: "Email Body Should Contain",
        arguments: &[text("matcher"), flag("case_insensitive")],
        doc: "Checks the body of the last email contains the matcher. With case_insensitive the comparison ignores case.",
    },
    KeywordSpec {
        name: "Email Links Should Contain Text",
        arguments: &[text("text")],
        doc: "Checks at least one link in the last email contains the text.",
    },
    KeywordSpec {
        name: "Email Sender Should Be",
        arguments: &[text("matcher")],
        doc: "Checks the sender of the last email is the matcher.",
    },
];

/// Normalizes a keyword name for lookup: lower case, no spaces or underscores.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Finds a keyword by name, ignoring case, spaces and underscores.
pub fn find_keyword(name: &str) -> Option<&'static KeywordSpec> {
    let wanted = normalize_name(name);
    KEYWORDS
        .iter()
        .find(|spec| normalize_name(spec.name) == wanted)
}

fn parse_count(spec: &KeywordSpec, value: &str) -> KeywordResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(spec, format!("'{}' is not a valid count", value)))
}

fn parse_flag(spec: &KeywordSpec, value: &str) -> KeywordResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" | "none" | "" => Ok(false),
        _ => Err(invalid(spec, format!("'{}' is not a valid boolean", value))),
    }
}

fn invalid(spec: &KeywordSpec, message: impl Into<String>) -> KeywordError {
    KeywordError::InvalidArguments {
        keyword: spec.name.to_string(),
        message: message.into(),
    }
}

impl MailosaurKeywords {
    /// Runs a keyword by name with string arguments.
    ///
    /// # Errors
    ///
    /// Returns [`KeywordError::UnknownKeyword`] for an unknown name and
    /// [`KeywordError::InvalidArguments`] when the arguments do not match the
    /// keyword's signature. Otherwise returns whatever the keyword returns.
    pub async fn run_keyword(&mut self, name: &str, args: &[String]) -> KeywordResult<()> {
        let spec = find_keyword(name).ok_or_else(|| KeywordError::UnknownKeyword {
            name: name.to_string(),
        })?;

        if args.len() != spec.arguments.len() {
            return Err(invalid(
                spec,
                format!(
                    "expected {} argument(s) ({}), got {}",
                    spec.arguments.len(),
                    spec.signature(),
                    args.len()
                ),
            ));
        }

        tracing::info!(keyword = spec.name, "Running keyword");

        match spec.name {
            "Email Subject Should Match" => self.email_subject_should_match(&args[0]).await,
            "Email Subject Should Contain" => self.email_subject_should_contain(&args[0]).await,
            "Delete All Emails" => self.delete_all_emails().await,
            "Email Should Have Links" => {
                let expected = parse_count(spec, &args[0])?;
                self.email_should_have_links(expected).await
            }
            "Email Should Have Attachments" => {
                let expected = parse_count(spec, &args[0])?;
                self.email_should_have_attachments(expected).await
            }
            "Email Body Should Contain" => {
                let case_insensitive = parse_flag(spec, &args[1])?;
                self.email_body_should_contain(&args[0], case_insensitive)
                    .await
            }
            "Email Links Should Contain Text" => {
                self.email_links_should_contain_text(&args[0]).await
            }
            "Email Sender Should Be" => self.email_sender_should_be(&args[0]).await,
            _ => Err(KeywordError::UnknownKeyword {
                name: name.to_string(),
            }),
        }
    }
}
