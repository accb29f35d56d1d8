use crate::{Res, error::Error};
use itertools::Itertools;
use std::{
    borrow::Cow,
    io::{self, BufRead, BufReader, Read},
    iter,
    process::{ChildStderr, Command, Stdio},
    thread::{self, JoinHandle},
};

pub(crate) fn command_args(cmd: &Command) -> Cow<'static, str> {
    iter::once(cmd.get_program().to_string_lossy())
        .chain(cmd.get_args().map(|arg| arg.to_string_lossy()))
        .join(" ")
        .into()
}

/// Feeds every line of `reader` to `sink`, then `None` to mark the end of the stream.
pub fn stream_reader(
    reader: impl BufRead,
    on_read_error: fn(io::Error) -> Error,
    mut sink: impl FnMut(Option<&str>) -> Res<()>,
) -> Res<()> {
    feed_lines(reader, on_read_error, &mut sink)?;
    sink(None)
}

/// Runs `cmd` and feeds its stdout to `sink` line by line as it arrives.
///
/// The end of the stream is only signalled once the command has exited successfully. On any
/// failure the sink never sees `None`.
pub fn stream_cmd(mut cmd: Command, mut sink: impl FnMut(Option<&str>) -> Res<()>) -> Res<()> {
    let args = command_args(&cmd);
    log::debug!("Running '{}'", args);

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(Error::SpawnCmd)?;

    let Some(stdout) = child.stdout.take() else {
        return Err(Error::CouldntReadCmdOutput(io::Error::other("no stdout")));
    };

    let stderr = child.stderr.take().map(drain_stderr);

    let reader = BufReader::new(stdout);
    if let Err(err) = feed_lines(reader, Error::CouldntReadCmdOutput, &mut sink) {
        log::debug!("Stopping '{}'", args);
        if let Err(kill_err) = child.kill() {
            log::warn!("Couldn't kill '{}': {}", args, kill_err);
        }
        child.wait().map_err(Error::CouldntAwaitCmd)?;
        return Err(err);
    }

    let status = child.wait().map_err(Error::CouldntAwaitCmd)?;
    let stderr = collect_stderr(stderr);
    log::debug!("'{}' finished with {:?}", args, status);
    if !stderr.is_empty() {
        log::debug!("'{}' stderr: {}", args, stderr);
    }

    if !status.success() {
        return Err(Error::CmdBadExit(args.into_owned(), status.code(), stderr));
    }

    sink(None)
}

// Read on its own thread so a chatty stderr can't block stdout
fn drain_stderr(mut stderr: ChildStderr) -> JoinHandle<io::Result<String>> {
    thread::spawn(move || {
        let mut out = String::new();
        stderr.read_to_string(&mut out)?;
        Ok(out)
    })
}

fn collect_stderr(handle: Option<JoinHandle<io::Result<String>>>) -> String {
    match handle.map(JoinHandle::join) {
        Some(Ok(Ok(out))) => out.trim_end().to_string(),
        Some(Ok(Err(err))) => {
            log::warn!("Couldn't read stderr: {}", err);
            String::new()
        }
        Some(Err(_)) => {
            log::warn!("stderr reader panicked");
            String::new()
        }
        None => String::new(),
    }
}

fn feed_lines(
    reader: impl BufRead,
    on_read_error: fn(io::Error) -> Error,
    sink: &mut impl FnMut(Option<&str>) -> Res<()>,
) -> Res<()> {
    for line in reader.lines() {
        let line = line.map_err(on_read_error)?;
        sink(Some(&line))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(lines: &mut Vec<Option<String>>) -> impl FnMut(Option<&str>) -> Res<()> + '_ {
        move |line| {
            lines.push(line.map(str::to_string));
            Ok(())
        }
    }

    #[test]
    fn reader_lines_then_end() {
        let mut lines = vec![];
        stream_reader(
            "## main\r\n M a.txt\n".as_bytes(),
            Error::ReadInput,
            record(&mut lines),
        )
        .unwrap();

        assert_eq!(
            lines,
            vec![Some("## main".to_string()), Some(" M a.txt".to_string()), None]
        );
    }

    #[test]
    fn sink_error_stops_reading() {
        let mut seen = 0;
        let result = stream_reader("a\nb\nc\n".as_bytes(), Error::ReadInput, |line| {
            seen += 1;
            match line {
                Some("b") => Err(Error::unparseable("b", "anything else")),
                _ => Ok(()),
            }
        });

        assert!(result.is_err());
        assert_eq!(seen, 2);
    }

    #[cfg(unix)]
    #[test]
    fn cmd_output_is_streamed() {
        let mut cmd = Command::new("printf");
        cmd.arg("## main\\n?? new.txt\\n");

        let mut lines = vec![];
        stream_cmd(cmd, record(&mut lines)).unwrap();

        assert_eq!(
            lines,
            vec![Some("## main".to_string()), Some("?? new.txt".to_string()), None]
        );
    }

    #[cfg(unix)]
    #[test]
    fn bad_exit_skips_end_of_stream() {
        let mut lines = vec![];
        let result = stream_cmd(Command::new("false"), record(&mut lines));

        assert!(matches!(
            result,
            Err(Error::CmdBadExit(ref args, Some(1), ref stderr)) if args == "false" && stderr.is_empty()
        ));
        assert!(lines.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn stderr_is_captured() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo '## main'; echo oops >&2; exit 3"]);

        let mut lines = vec![];
        let result = stream_cmd(cmd, record(&mut lines));

        assert!(matches!(
            result,
            Err(Error::CmdBadExit(_, Some(3), ref stderr)) if stderr == "oops"
        ));
        assert_eq!(lines, vec![Some("## main".to_string())]);
    }

    #[test]
    fn missing_program() {
        let result = stream_cmd(Command::new("surely-not-a-real-program"), |_| Ok(()));
        assert!(matches!(result, Err(Error::SpawnCmd(_))));
    }
}
