//! Line-oriented command shell over a [`Repository`]
//!
//! The shell turns one input line into a [`Command`], runs it against the
//! repository and renders the result as output lines. It holds no state of
//! its own beyond the repository, so the interactive binary, scripted runs
//! and tests all drive it the same way.
//!
//! ## Commands
//!
//! ```text
//! CREATE name                 READ name
//! INSERT name content...      UPDATE name content...
//! SNAPSHOT name message...    ROLLBACK name [versionId]
//! HISTORY name                TREE name
//! RECENT_FILES [n]            BIGGEST_TREES [n]
//! EXIT | QUIT
//! ```
//!
//! Input is split on whitespace; multi-word content and messages are joined
//! back with single spaces.
//!
//! ```rust
//! use chronofs::shell::Shell;
//! use chronofs::Repository;
//!
//! let mut shell = Shell::new(Repository::new());
//! assert_eq!(shell.execute("CREATE a").lines, vec!["File 'a' created."]);
//! shell.execute("INSERT a hello   world");
//! assert_eq!(shell.execute("READ a").lines, vec!["hello world"]);
//! ```

use crate::error::ChronoFsError;
use crate::repository::Repository;
use crate::types::HistoryEntry;
use crate::version::VersionId;
use chrono::{DateTime, Local, Utc};
use std::fmt::Write;
use thiserror::Error;
use tracing::debug;

/// Text printed for an unknown command or wrong argument count
pub const UNKNOWN_COMMAND: &str = "Error: Unknown command or incorrect arguments.";
/// Text printed when a ROLLBACK version id is not a number
pub const INVALID_VERSION_ID: &str = "Error: Invalid version ID for ROLLBACK.";
/// Text printed when a ranking count is not a number
pub const INVALID_COUNT: &str = "Error: Invalid number. Showing all by default.";

/// Reasons a line could not be turned into a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Unknown keyword or wrong number of arguments
    #[error("Unknown command or incorrect arguments.")]
    UnknownCommand,

    /// ROLLBACK id that is not an integer
    #[error("Invalid version ID for ROLLBACK.")]
    InvalidVersionId(String),
}

/// Optional count argument of the ranking commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Count {
    /// No count, or `-1`: list every file
    All,
    /// List at most this many files
    Top(usize),
    /// Any other negative count: header only, no rows
    Negative(i64),
    /// Not a number; reported, then treated as [`Count::All`]
    Invalid(String),
}

impl Count {
    fn parse(arg: Option<&&str>) -> Self {
        match arg {
            None => Count::All,
            Some(raw) => match leading_integer(raw) {
                Some(-1) => Count::All,
                Some(n) if n < 0 => Count::Negative(n),
                Some(n) => Count::Top(n as usize),
                None => Count::Invalid((*raw).to_string()),
            },
        }
    }

    fn limit(&self) -> Option<usize> {
        match self {
            Count::Top(n) => Some(*n),
            Count::Negative(_) => Some(0),
            Count::All | Count::Invalid(_) => None,
        }
    }

    fn label(&self) -> String {
        match self {
            Count::Top(n) => n.to_string(),
            Count::Negative(n) => n.to_string(),
            Count::All | Count::Invalid(_) => "All".to_string(),
        }
    }
}

/// Integer at the start of `raw`, ignoring anything after its digits
///
/// `"3abc"` reads as 3; `"abc"` and out-of-range values read as `None`.
fn leading_integer(raw: &str) -> Option<i64> {
    let sign = usize::from(raw.starts_with(['+', '-']));
    let digits = raw[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    raw[..sign + digits].parse().ok()
}

/// Where a ROLLBACK should move the active pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackTarget {
    /// No id, or `-1`: step to the parent
    Parent,
    /// Check out this version
    Version(VersionId),
    /// Negative id other than `-1`; never issued by any file
    Missing(i64),
}

impl RollbackTarget {
    fn parse(raw: &str) -> Result<Self, ParseError> {
        match leading_integer(raw) {
            Some(-1) => Ok(RollbackTarget::Parent),
            Some(id) if id < 0 => Ok(RollbackTarget::Missing(id)),
            Some(id) => Ok(RollbackTarget::Version(id as VersionId)),
            None => Err(ParseError::InvalidVersionId(raw.to_string())),
        }
    }
}

/// One parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Do nothing (blank line)
    Noop,
    /// `CREATE name`
    Create(String),
    /// `READ name`
    Read(String),
    /// `INSERT name content...`
    Insert { name: String, content: String },
    /// `UPDATE name content...`
    Update { name: String, content: String },
    /// `SNAPSHOT name message...`
    Snapshot { name: String, message: String },
    /// `ROLLBACK name [versionId]`
    Rollback { name: String, target: RollbackTarget },
    /// `HISTORY name`
    History(String),
    /// `TREE name`
    Tree(String),
    /// `RECENT_FILES [n]`
    RecentFiles(Count),
    /// `BIGGEST_TREES [n]`
    BiggestTrees(Count),
    /// `EXIT` or `QUIT`
    Exit,
}

impl Command {
    /// Parse one input line
    ///
    /// # Errors
    ///
    /// - [`ParseError::UnknownCommand`] for unknown keywords or wrong arity
    /// - [`ParseError::InvalidVersionId`] for a non-numeric ROLLBACK id
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            return Ok(Command::Noop);
        };
        let args: Vec<&str> = words.collect();

        let command = match (keyword, args.as_slice()) {
            ("CREATE", [name]) => Command::Create(name.to_string()),
            ("READ", [name]) => Command::Read(name.to_string()),
            ("HISTORY", [name]) => Command::History(name.to_string()),
            ("TREE", [name]) => Command::Tree(name.to_string()),
            ("INSERT", [name, rest @ ..]) if !rest.is_empty() => Command::Insert {
                name: name.to_string(),
                content: rest.join(" "),
            },
            ("UPDATE", [name, rest @ ..]) if !rest.is_empty() => Command::Update {
                name: name.to_string(),
                content: rest.join(" "),
            },
            ("SNAPSHOT", [name, rest @ ..]) if !rest.is_empty() => Command::Snapshot {
                name: name.to_string(),
                message: rest.join(" "),
            },
            ("ROLLBACK", [name]) => Command::Rollback {
                name: name.to_string(),
                target: RollbackTarget::Parent,
            },
            ("ROLLBACK", [name, id]) => Command::Rollback {
                name: name.to_string(),
                target: RollbackTarget::parse(id)?,
            },
            ("RECENT_FILES", rest) => Command::RecentFiles(Count::parse(rest.first())),
            ("BIGGEST_TREES", rest) => Command::BiggestTrees(Count::parse(rest.first())),
            ("EXIT" | "QUIT", _) => Command::Exit,
            _ => return Err(ParseError::UnknownCommand),
        };

        Ok(command)
    }
}

/// Output of one executed line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Lines to print, in order
    pub lines: Vec<String>,
    /// Whether the session should end
    pub exit: bool,
}

impl Response {
    fn line(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            exit: false,
        }
    }

    fn error(err: &ChronoFsError) -> Self {
        Self::line(format!("Error: {}", err))
    }
}

/// Command interpreter bound to one repository
#[derive(Debug)]
pub struct Shell {
    repo: Repository,
}

impl Shell {
    /// Wrap a repository
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// The repository being driven
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Parse and run one line
    pub fn execute(&mut self, line: &str) -> Response {
        match Command::parse(line) {
            Ok(command) => self.run(command),
            Err(ParseError::UnknownCommand) => Response::line(UNKNOWN_COMMAND),
            Err(ParseError::InvalidVersionId(raw)) => {
                debug!("Rejected ROLLBACK id {:?}", raw);
                Response::line(INVALID_VERSION_ID)
            }
        }
    }

    /// Run an already parsed command
    pub fn run(&mut self, command: Command) -> Response {
        match command {
            Command::Noop => Response::default(),
            Command::Create(name) => match self.repo.create(&name) {
                Ok(()) => Response::line(format!("File '{}' created.", name)),
                Err(e) => Response::error(&e),
            },
            Command::Read(name) => match self.repo.read(&name) {
                Ok(content) => Response::line(content),
                Err(e) => Response::error(&e),
            },
            Command::Insert { name, content } => match self.repo.insert(&name, &content) {
                Ok(_) => Response::line(format!("Content inserted into '{}'.", name)),
                Err(e) => Response::error(&e),
            },
            Command::Update { name, content } => match self.repo.update(&name, &content) {
                Ok(_) => Response::line(format!("Content updated in '{}'.", name)),
                Err(e) => Response::error(&e),
            },
            Command::Snapshot { name, message } => match self.repo.snapshot(&name, &message) {
                Ok(_) => Response::line(format!("Snapshot created for '{}'.", name)),
                Err(e) => Response::error(&e),
            },
            Command::Rollback { name, target } => {
                let target = match target {
                    RollbackTarget::Parent => None,
                    RollbackTarget::Version(id) => Some(id),
                    RollbackTarget::Missing(id) => {
                        return match self.repo.file(&name) {
                            Ok(_) => Response::line(format!(
                                "Error: Rollback failed. Version {} does not exist.",
                                id
                            )),
                            Err(e) => Response::error(&e),
                        };
                    }
                };
                match self.repo.rollback(&name, target) {
                    Ok(_) => Response::line(format!("Rollback successful for '{}'.", name)),
                    Err(e) => Response::error(&e),
                }
            }
            Command::History(name) => match self.repo.history(&name) {
                Ok(entries) => Response {
                    lines: entries.iter().map(|e| self.history_line(e)).collect(),
                    exit: false,
                },
                Err(e) => Response::error(&e),
            },
            Command::Tree(name) => match (self.repo.tree(&name), self.repo.stats(&name)) {
                (Ok(tree), Ok(stats)) => {
                    let mut lines: Vec<String> = tree
                        .lines
                        .iter()
                        .map(|line| line.label(|at| self.format_time(at)))
                        .collect();
                    lines.push(format!(
                        "{} versions, {} snapshots, {} leaves, depth {}, {} branch points",
                        stats.total_versions,
                        stats.snapshots,
                        stats.leaf_versions,
                        stats.max_depth,
                        stats.branch_points
                    ));
                    Response { lines, exit: false }
                }
                (Err(e), _) | (_, Err(e)) => Response::error(&e),
            },
            Command::RecentFiles(count) => {
                let mut lines = invalid_count_notice(&count);
                lines.push(format!("--- Top {} Recently Modified Files ---", count.label()));
                for ranked in self.repo.rank_by_recency(count.limit()) {
                    let modified = DateTime::<Utc>::from_timestamp_micros(ranked.score)
                        .map(|at| self.format_time(at))
                        .unwrap_or_else(|| ranked.score.to_string());
                    lines.push(format!("{} (Modified: {})", ranked.name, modified));
                }
                Response { lines, exit: false }
            }
            Command::BiggestTrees(count) => {
                let mut lines = invalid_count_notice(&count);
                lines.push(format!("--- Top {} Files by Version Count ---", count.label()));
                for ranked in self.repo.rank_by_size(count.limit()) {
                    lines.push(format!("{} ({} versions)", ranked.name, ranked.score));
                }
                Response { lines, exit: false }
            }
            Command::Exit => Response {
                lines: vec!["Exiting system.".to_string()],
                exit: true,
            },
        }
    }

    fn history_line(&self, entry: &HistoryEntry) -> String {
        format!(
            "Version: {}, Timestamp: {}, Message: {}",
            entry.id,
            self.format_time(entry.snapshot_at),
            entry.message
        )
    }

    /// Render a timestamp in local time with the configured pattern
    ///
    /// Falls back to RFC 3339 if the pattern cannot be rendered.
    pub fn format_time(&self, at: DateTime<Utc>) -> String {
        let local = at.with_timezone(&Local);
        let mut rendered = String::new();
        match write!(rendered, "{}", local.format(&self.repo.config().time_format)) {
            Ok(()) => rendered,
            Err(_) => local.to_rfc3339(),
        }
    }
}

fn invalid_count_notice(count: &Count) -> Vec<String> {
    match count {
        Count::Invalid(_) => vec![INVALID_COUNT.to_string()],
        _ => Vec::new(),
    }
}
