use std::{mem, str::FromStr, sync::LazyLock};

use nom::{
    IResult, Parser,
    character::complete::{alpha1, digit1, space1},
    combinator::{all_consuming, map_res},
    sequence::separated_pair,
};
use regex::Regex;

use crate::{
    Res,
    error::Error,
    git::{
        parse::cursor::LineCursor,
        status::{DefaultEntryFactory, StatusEntryFactory, StatusKind, StatusSnapshot},
    },
};

const HEADER_MARKER: &str = "##";
const BRANCH_SEPARATOR: &str = "...";
const RENAME_SEPARATOR: &str = "->";
const DELTA_SEPARATOR: &str = ", ";

// main...origin/main [ahead 1, behind 2]
static BRANCH_TRACKED_AND_DELTA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S*)\.\.\.(.*)\s\[(.*)\]").expect("branch header pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingHeader,
    CollectingEntries,
}

/// The line shapes that are understood. Everything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryCode {
    /// ` M`: unchanged in the index, modified in the worktree
    WorktreeModified,
    /// ` D`: unchanged in the index, deleted in the worktree
    WorktreeDeleted,
    /// `R `
    Renamed,
    /// `A `
    Added,
    /// `??`
    Untracked,
}

impl EntryCode {
    fn kind(self) -> StatusKind {
        match self {
            EntryCode::WorktreeModified => StatusKind::Modified,
            EntryCode::WorktreeDeleted => StatusKind::Deleted,
            EntryCode::Renamed => StatusKind::Renamed,
            EntryCode::Added => StatusKind::Added,
            EntryCode::Untracked => StatusKind::Untracked,
        }
    }
}

/// Incrementally parses `git status --porcelain --branch` output.
///
/// Lines are fed one at a time through [`StatusParser::consume_line`], with `None` marking the end
/// of one invocation's output. At that point the accumulated [`StatusSnapshot`] is handed to the
/// subscribed observer and the parser starts over, ready for the next invocation.
///
/// Nothing is parsed while there's no observer.
///
/// A line that can't be parsed aborts the cycle with [`Error::UnparseableLine`]. The parser keeps
/// whatever it had accumulated, so callers wanting to carry on must [`StatusParser::reset`] it.
pub struct StatusParser<'a, F = DefaultEntryFactory> {
    factory: F,
    observer: Option<Box<dyn FnMut(StatusSnapshot) + 'a>>,
    state: State,
    pending: StatusSnapshot,
}

impl<'a, F: StatusEntryFactory> StatusParser<'a, F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            observer: None,
            state: State::AwaitingHeader,
            pending: StatusSnapshot::default(),
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(StatusSnapshot) + 'a) {
        self.observer = Some(Box::new(observer));
    }

    pub fn unsubscribe(&mut self) {
        self.observer = None;
    }

    pub fn is_subscribed(&self) -> bool {
        self.observer.is_some()
    }

    /// Discards everything accumulated in the current cycle.
    pub fn reset(&mut self) {
        self.state = State::AwaitingHeader;
        self.pending = StatusSnapshot::default();
    }

    pub fn consume_line(&mut self, line: Option<&str>) -> Res<()> {
        log::trace!("status line: {:?}", line);

        let Some(observer) = self.observer.as_mut() else {
            return Ok(());
        };

        let Some(line) = line else {
            let snapshot = mem::take(&mut self.pending);
            log::debug!(
                "Emitting status for {:?} with {} entries",
                snapshot.local_branch,
                snapshot.entries.len()
            );
            observer(snapshot);
            self.state = State::AwaitingHeader;
            return Ok(());
        };

        let result = match self.state {
            State::AwaitingHeader => self.parse_header(line),
            State::CollectingEntries => self.parse_entry(line),
        };

        if let Err(ref e) = result {
            log::warn!("{}", e);
        }

        result
    }

    fn parse_header(&mut self, line: &str) -> Res<()> {
        let mut cursor = LineCursor::new(line);
        if !cursor.matches(HEADER_MARKER) {
            return Err(Error::unparseable(line, "branch header"));
        }

        cursor.move_next();
        cursor.move_next();
        cursor.skip_whitespace();

        let branches = if cursor.matches_regex(&BRANCH_TRACKED_AND_DELTA) {
            let branches = cursor.read_until_whitespace();
            cursor.move_to_after('[');
            self.parse_deltas(line, cursor.read_until(']'))?;
            branches
        } else {
            cursor.read_to_end()
        };

        let branches = branches
            .split(BRANCH_SEPARATOR)
            .filter(|branch| !branch.is_empty())
            .collect::<Vec<_>>();

        let Some(local) = branches.first() else {
            return Err(Error::unparseable(line, "branch name"));
        };

        self.pending.local_branch = Some(local.to_string());
        self.pending.remote_branch = match branches[..] {
            [_, remote] => Some(remote.to_string()),
            _ => None,
        };

        log::debug!(
            "Branch {:?} tracking {:?}",
            self.pending.local_branch,
            self.pending.remote_branch
        );

        self.state = State::CollectingEntries;
        Ok(())
    }

    fn parse_deltas(&mut self, line: &str, deltas: &str) -> Res<()> {
        for delta in deltas.split(DELTA_SEPARATOR).filter(|delta| !delta.is_empty()) {
            let (_, (label, count)) =
                parse_delta(delta).map_err(|_| Error::unparseable(line, "ahead/behind"))?;

            match label {
                "ahead" => self.pending.ahead = count,
                "behind" => self.pending.behind = count,
                _ => return Err(Error::unparseable(line, "ahead/behind")),
            }
        }

        Ok(())
    }

    fn parse_entry(&mut self, line: &str) -> Res<()> {
        let mut cursor = LineCursor::new(line);
        let Some(code) = read_entry_code(&mut cursor) else {
            return Err(Error::unparseable(line, "status code"));
        };

        let (path, original_path) = match code {
            EntryCode::Renamed => {
                let Some((from, to)) = cursor.read_to_end().split_once(RENAME_SEPARATOR) else {
                    return Err(Error::unparseable(line, "rename separator"));
                };

                let from = unquote(from.trim());
                if from.is_empty() {
                    return Err(Error::unparseable(line, "path"));
                }

                (unquote(to.trim()), Some(from.to_string()))
            }
            _ => (unquote(cursor.read_to_end()), None),
        };

        if path.is_empty() {
            return Err(Error::unparseable(line, "path"));
        }

        let entry = self
            .factory
            .create(path.to_string(), code.kind(), original_path);
        self.pending.entries.push(entry);
        Ok(())
    }
}

impl Default for StatusParser<'_> {
    fn default() -> Self {
        Self::new(DefaultEntryFactory)
    }
}

impl FromStr for StatusSnapshot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        collect_one(|parser| {
            for line in s.lines() {
                parser.consume_line(Some(line))?;
            }
            parser.consume_line(None)
        })
    }
}

/// Runs `feed` against a fresh parser and returns the status it emitted.
pub(crate) fn collect_one(
    feed: impl FnOnce(&mut StatusParser<'_>) -> Res<()>,
) -> Res<StatusSnapshot> {
    let mut snapshot = None;
    let mut parser: StatusParser = StatusParser::default();
    parser.subscribe(|status| snapshot = Some(status));

    feed(&mut parser)?;
    drop(parser);

    snapshot.ok_or(Error::NoStatusEmitted)
}

/// Reads the status code, leaving the cursor at the start of the path.
fn read_entry_code(cursor: &mut LineCursor) -> Option<EntryCode> {
    let code = if cursor.is_at_whitespace() {
        cursor.skip_whitespace();
        match cursor.peek_char()? {
            'M' => EntryCode::WorktreeModified,
            'D' => EntryCode::WorktreeDeleted,
            _ => return None,
        }
    } else {
        match cursor.peek_char()? {
            'R' => EntryCode::Renamed,
            'A' => EntryCode::Added,
            '?' => EntryCode::Untracked,
            _ => return None,
        }
    };

    match code {
        EntryCode::Untracked => cursor.skip_while(|c| c == '?'),
        _ => cursor.move_next(),
    }

    // Two-letter codes like `AM` or `RD` aren't supported
    if !cursor.is_at_whitespace() {
        return None;
    }

    cursor.skip_whitespace();
    Some(code)
}

/// `ahead 1`
fn parse_delta(input: &str) -> IResult<&str, (&str, u32)> {
    all_consuming(separated_pair(
        alpha1,
        space1,
        map_res(digit1, |n: &str| n.parse::<u32>()),
    ))
    .parse(input)
}

fn unquote(path: &str) -> &str {
    let path = path.strip_prefix('"').unwrap_or(path);
    path.strip_suffix('"').unwrap_or(path)
}
