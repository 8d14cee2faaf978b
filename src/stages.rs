//! Built-in source, filter, map and sink stages.
//!
//! Each stage is a `Stage` constant with its declared parameters, plus a
//! small constructor function for the usual way of using it: sources are run
//! immediately, everything else is bound one argument short and chained.
//!
//! | Stage        | Params               | Role   |
//! |--------------|----------------------|--------|
//! | `CAT`        | files                | source |
//! | `FIND`       | topdir, pattern      | source |
//! | `SHELLCMD`   | cmd                  | source |
//! | `SHELL`      | iter, cmd            | filter |
//! | `GREP`       | iter, match          | filter |
//! | `TR`         | iter, transform      | map    |
//! | `PRINTLINES` | iter, sep, filename  | sink   |
//! | `NOTEMPTY`   | iter                 | test   |

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::arg::{Arg, Args, Bound, Func};
use crate::binding::Partial;
use crate::error::{PipeError, Result};
use crate::flow::{Flow, Sequence};
use crate::stage::{Param, Stage};
use crate::value::Value;

pub const CAT: Stage = Stage::new("cat", &[Param::new("files")], cat_files);

pub const FIND: Stage = Stage::new(
    "find",
    &[Param::new("topdir"), Param::new("pattern").prepared(check_glob)],
    find_files,
);

pub const SHELLCMD: Stage = Stage::new("shellcmd", &[Param::new("cmd")], run_shellcmd);

pub const SHELL: Stage = Stage::new(
    "shell",
    &[Param::new("iter"), Param::new("cmd")],
    run_shell_stage,
);

pub const GREP: Stage = Stage::new(
    "grep",
    &[Param::new("iter"), Param::new("match").prepared(compile_pattern)],
    grep_items,
);

pub const TR: Stage = Stage::new(
    "tr",
    &[Param::new("iter"), Param::new("transform")],
    map_items,
);

pub const PRINTLINES: Stage = Stage::new(
    "printlines",
    &[Param::new("iter"), Param::new("sep"), Param::new("filename")],
    print_lines,
);

pub const NOTEMPTY: Stage = Stage::new("notempty", &[Param::new("iter")], not_empty);

/// Lines of one file or a list of files, read lazily.
pub fn cat(files: impl Into<Arg>) -> Result<Flow> {
    CAT.call(Args::new().arg(files))?.into_flow()
}

/// Paths under `topdir` whose file name matches the glob `pattern`.
pub fn find(topdir: &str, pattern: &str) -> Result<Flow> {
    FIND.call(Args::new().arg(topdir).arg(pattern))?.into_flow()
}

/// Standard output lines of `cmd`.
pub fn shellcmd(cmd: &str) -> Result<Flow> {
    SHELLCMD.call(Args::new().arg(cmd))?.into_flow()
}

/// Pipe the upstream elements through `cmd`.
pub fn shell(cmd: &str) -> Result<Partial> {
    SHELL.bind(Args::new().arg(cmd))
}

/// Keep elements matching a pattern (at the start) or a predicate.
pub fn grep(pattern: impl Into<Arg>) -> Result<Partial> {
    GREP.bind(Args::new().arg(pattern))
}

/// Apply `transform` to every element.
pub fn tr<F>(transform: F) -> Result<Partial>
where
    F: Fn(&Value) -> Value + 'static,
{
    TR.bind(Args::new().arg(crate::arg::func(transform)))
}

/// Like `tr`, but bound without signature checks.
pub fn each<F>(transform: F) -> Result<Partial>
where
    F: Fn(&Value) -> Value + 'static,
{
    TR.bind_unchecked(Args::new().arg(crate::arg::func(transform)))
}

/// Write elements joined by `sep` to `filename`, or stdout when `None`.
pub fn printlines(sep: &str, filename: Option<&str>) -> Result<Partial> {
    PRINTLINES.bind(Args::new().named("sep", sep).named("filename", filename))
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

fn cat_files(mut bound: Bound) -> Result<Flow> {
    let paths = match bound.flow("files")? {
        Flow::Value(Value::Str(path)) => Sequence::from_values([Value::Str(path)]),
        other => other.into_sequence()?,
    };
    Ok(Flow::Stream(Sequence::new(FileLines {
        paths,
        current: None,
    })))
}

/// Lines from a list of files, one file after the other.
///
/// Each file is opened only when the previous one is exhausted. Line
/// terminators are kept.
struct FileLines {
    paths: Sequence,
    current: Option<(PathBuf, BufReader<File>)>,
}

impl Iterator for FileLines {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((path, reader)) = &mut self.current {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => self.current = None,
                    Ok(_) => return Some(Ok(Value::Str(line))),
                    Err(e) => {
                        let err = PipeError::io(path.clone(), e);
                        self.current = None;
                        return Some(Err(err));
                    }
                }
                continue;
            }

            let path = match self.paths.next()? {
                Ok(Value::Str(path)) => PathBuf::from(path),
                Ok(other) => {
                    return Some(Err(PipeError::ElementType {
                        expected: "path",
                        found: other.kind(),
                    }));
                }
                Err(e) => return Some(Err(e)),
            };
            match File::open(&path) {
                Ok(file) => {
                    debug!(path = %path.display(), "opened file");
                    self.current = Some((path, BufReader::new(file)));
                }
                Err(e) => return Some(Err(PipeError::io(path, e))),
            }
        }
    }
}

fn check_glob(arg: Arg) -> Result<Arg> {
    if let Arg::Flow(Flow::Value(Value::Str(pattern))) = &arg {
        glob::Pattern::new(pattern)?;
    }
    Ok(arg)
}

fn find_files(mut bound: Bound) -> Result<Flow> {
    let topdir = bound.string("topdir")?;
    let pattern = glob::Pattern::new(&bound.string("pattern")?)?;
    let entries = WalkDir::new(topdir).into_iter().filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => return Some(Err(PipeError::from(e))),
        };
        let name = entry.file_name().to_string_lossy();
        if entry.path().is_file() && pattern.matches(&name) {
            Some(Ok(Value::Str(entry.path().to_string_lossy().into_owned())))
        } else {
            None
        }
    });
    Ok(Flow::Stream(Sequence::new(entries)))
}

fn run_shellcmd(mut bound: Bound) -> Result<Flow> {
    let cmd = bound.string("cmd")?;
    let output = run_command(&cmd, None)?;
    Ok(Flow::Value(Value::List(split_lines(&output))))
}

// ---------------------------------------------------------------------------
// Filters and maps
// ---------------------------------------------------------------------------

fn run_shell_stage(mut bound: Bound) -> Result<Flow> {
    let items = bound.sequence("iter")?;
    let cmd = bound.string("cmd")?;

    let mut buffer = String::new();
    for item in items {
        match item? {
            Value::Str(s) => buffer.push_str(&s),
            other => {
                return Err(PipeError::ElementType {
                    expected: "str",
                    found: other.kind(),
                });
            }
        }
    }

    let output = run_command(&cmd, Some(buffer))?;
    Ok(Flow::Value(Value::List(split_lines(&output))))
}

fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.args(["/C", cmd]);
        command
    } else {
        let mut command = Command::new("sh");
        command.args(["-c", cmd]);
        command
    }
}

/// Run `cmd` through the platform shell and capture its standard output.
///
/// Input is written from a helper thread so a command that produces output
/// before draining its input cannot deadlock. The exit status is not an
/// error; a non-zero status is only logged.
fn run_command(cmd: &str, input: Option<String>) -> Result<String> {
    let spawn_err = |source| PipeError::Spawn {
        cmd: cmd.to_string(),
        source,
    };

    let mut child = shell_command(cmd)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .spawn()
        .map_err(spawn_err)?;
    debug!(cmd, "spawned shell command");

    let writer = match (input, child.stdin.take()) {
        (Some(buffer), Some(mut stdin)) => {
            Some(thread::spawn(move || stdin.write_all(buffer.as_bytes())))
        }
        _ => None,
    };

    let output = child.wait_with_output().map_err(spawn_err)?;

    if let Some(handle) = writer {
        writer_result(handle.join()).map_err(spawn_err)?;
    }

    if !output.status.success() {
        warn!(cmd, status = %output.status, "shell command failed; keeping its output");
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Outcome of the stdin writer thread. A command that exits without reading
/// all of its input is not a failure.
fn writer_result(joined: thread::Result<io::Result<()>>) -> io::Result<()> {
    match joined {
        Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Ok(result) => result,
        Err(_) => Err(io::Error::other("stdin writer thread panicked")),
    }
}

fn split_lines(text: &str) -> Vec<Value> {
    text.split_inclusive('\n').map(Value::from).collect()
}

/// Turn a string pattern into a regex as soon as it is supplied.
fn compile_pattern(arg: Arg) -> Result<Arg> {
    match arg {
        Arg::Flow(Flow::Value(Value::Str(pattern))) => Ok(Arg::Regex(Regex::new(&pattern)?)),
        Arg::Func(_) | Arg::Regex(_) => Ok(arg),
        _ => Err(PipeError::ArgType {
            stage: "grep",
            param: "match",
            expected: "a pattern string, regex or callable",
        }),
    }
}

/// True when `re` matches at the very start of `text`.
fn matches_at_start(re: &Regex, text: &str) -> bool {
    re.find(text).is_some_and(|m| m.start() == 0)
}

enum Predicate {
    Pattern(Regex),
    Callable(Func),
}

impl Predicate {
    fn keep(&self, value: &Value) -> Result<bool> {
        match self {
            Predicate::Callable(f) => Ok(f(value).is_truthy()),
            Predicate::Pattern(re) => match value {
                Value::Str(s) => Ok(matches_at_start(re, s)),
                other => Err(PipeError::ElementType {
                    expected: "str",
                    found: other.kind(),
                }),
            },
        }
    }
}

fn grep_items(mut bound: Bound) -> Result<Flow> {
    let items = bound.sequence("iter")?;
    let predicate = match compile_pattern(bound.next_arg()?)? {
        Arg::Regex(re) => Predicate::Pattern(re),
        Arg::Func(f) => Predicate::Callable(f),
        Arg::Flow(_) => {
            return Err(PipeError::ArgType {
                stage: "grep",
                param: "match",
                expected: "a pattern string, regex or callable",
            });
        }
    };

    let kept = items.filter_map(move |item| match item {
        Ok(value) => match predicate.keep(&value) {
            Ok(true) => Some(Ok(value)),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        },
        Err(e) => Some(Err(e)),
    });
    Ok(Flow::Stream(Sequence::new(kept)))
}

fn map_items(mut bound: Bound) -> Result<Flow> {
    let items = bound.sequence("iter")?;
    let transform = bound.func("transform")?;
    let mapped = items.map(move |item| item.map(|value| transform(&value)));
    Ok(Flow::Stream(Sequence::new(mapped)))
}

// ---------------------------------------------------------------------------
// Sinks and tests
// ---------------------------------------------------------------------------

/// Write elements separated by `sep`; nothing at all for an empty sequence.
///
/// Returns the number of elements written.
fn write_joined<W: Write>(
    out: &mut W,
    items: Sequence,
    sep: &str,
    on_io: impl Fn(io::Error) -> PipeError,
) -> Result<usize> {
    let mut written = 0;
    for item in items {
        let value = item?;
        if written > 0 {
            out.write_all(sep.as_bytes()).map_err(&on_io)?;
        }
        write!(out, "{value}").map_err(&on_io)?;
        written += 1;
    }
    out.flush().map_err(&on_io)?;
    Ok(written)
}

fn print_lines(mut bound: Bound) -> Result<Flow> {
    let items = bound.sequence("iter")?;
    let sep = bound.string("sep")?;
    let filename = bound.opt_string("filename")?;

    match filename {
        Some(path) => {
            let file = File::create(&path).map_err(|e| PipeError::io(&path, e))?;
            // the handle is released when `out` drops, whichever way we leave
            let mut out = BufWriter::new(file);
            let written = write_joined(&mut out, items, &sep, |e| PipeError::io(&path, e))?;
            debug!(path = %path, written, "wrote lines");
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_joined(&mut out, items, &sep, PipeError::Stdout)?;
        }
    }
    Ok(Flow::Value(Value::None))
}

fn not_empty(mut bound: Bound) -> Result<Flow> {
    let mut items = bound.sequence("iter")?;
    match items.next() {
        None => Ok(Flow::Value(Value::Bool(false))),
        Some(Ok(_)) => Ok(Flow::Value(Value::Bool(true))),
        Some(Err(e)) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::func;
    use crate::pipeline::{Pipeline, chain};
    use std::cell::Cell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn lines(flow: Flow) -> Vec<String> {
        match flow.materialize().unwrap() {
            Value::List(items) => items.into_iter().map(|v| v.to_string()).collect(),
            other => panic!("Expected list, got {other:?}"),
        }
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_cat_single_file_keeps_terminators() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "a.txt", "one\ntwo\nthree");
        let out = cat(path.as_str()).unwrap();
        assert!(out.is_stream());
        assert_eq!(lines(out), vec!["one\n", "two\n", "three"]);
    }

    #[test]
    fn test_cat_files_in_list_order() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.txt", "a1\na2\n");
        let b = write_file(&dir, "b.txt", "b1\n");
        let out = cat(vec![b, a]).unwrap();
        assert_eq!(lines(out), vec!["b1\n", "a1\n", "a2\n"]);
    }

    #[test]
    fn test_cat_missing_file_surfaces_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.txt").to_string_lossy().into_owned();
        let err = cat(missing.as_str()).unwrap().materialize().unwrap_err();
        match err {
            PipeError::Io { source, .. } => assert_eq!(source.kind(), io::ErrorKind::NotFound),
            other => panic!("Expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_cat_chained_after_paths() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.txt", "x\n");
        let out = chain(vec![a], &CAT).unwrap();
        assert_eq!(lines(out), vec!["x\n"]);
    }

    #[test]
    fn test_find_matches_file_names() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_file(&dir, "keep.rs", "");
        write_file(&dir, "skip.txt", "");
        fs::write(dir.path().join("sub").join("deep.rs"), "").unwrap();

        let mut found = lines(find(&dir.path().to_string_lossy(), "*.rs").unwrap());
        found.sort();
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("keep.rs"));
        assert!(found[1].ends_with("deep.rs"));
    }

    #[test]
    fn test_find_then_cat() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "only.log", "entry\n");
        let out = Pipeline::start(find(&dir.path().to_string_lossy(), "*.log"))
            .through(&CAT)
            .finish()
            .unwrap();
        assert_eq!(lines(out), vec!["entry\n"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_lists_symlinked_files() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "real.rs", "");
        std::os::unix::fs::symlink(dir.path().join("real.rs"), dir.path().join("link.rs")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("sub"), dir.path().join("dir.rs")).unwrap();

        let mut found = lines(find(&dir.path().to_string_lossy(), "*.rs").unwrap());
        found.sort();
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("link.rs"));
        assert!(found[1].ends_with("real.rs"));
    }

    #[test]
    fn test_find_bad_glob_fails_at_bind() {
        let err = FIND.bind(Args::new().arg("[")).unwrap_err();
        assert!(matches!(err, PipeError::Glob(_)));
    }

    #[test]
    fn test_grep_matches_at_start_only() {
        let out = chain(
            vec!["root:/bin/bash", "daemon:/usr/sbin/nologin", "x /bin/bash"],
            grep(".*/bin/bash").unwrap(),
        )
        .unwrap();
        assert_eq!(lines(out), vec!["root:/bin/bash", "x /bin/bash"]);

        let out = chain(vec!["__radd__", "__add__", "x__r"], grep("__r").unwrap()).unwrap();
        assert_eq!(lines(out), vec!["__radd__"]);
    }

    #[test]
    fn test_grep_with_predicate() {
        let keep_long = func(|v| Value::Bool(v.to_string().len() > 2));
        let out = chain(vec!["ab", "abc", "abcd"], grep(keep_long).unwrap()).unwrap();
        assert_eq!(lines(out), vec!["abc", "abcd"]);
    }

    #[test]
    fn test_grep_bad_pattern_fails_before_consuming() {
        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let upstream = Sequence::new(std::iter::from_fn(move || {
            counter.set(counter.get() + 1);
            Some(Ok(Value::from("x")))
        }));
        let err = GREP
            .call(Args::new().arg(upstream).arg("(unclosed"))
            .unwrap_err();
        assert!(matches!(err, PipeError::Pattern(_)));
        assert_eq!(pulled.get(), 0);

        assert!(matches!(grep("(unclosed"), Err(PipeError::Pattern(_))));
    }

    #[test]
    fn test_grep_is_lazy() {
        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let upstream = Sequence::new(std::iter::from_fn(move || {
            counter.set(counter.get() + 1);
            Some(Ok(Value::from("match")))
        }));
        let out = chain(upstream, grep("m").unwrap()).unwrap();
        assert_eq!(pulled.get(), 0);
        let Flow::Stream(mut seq) = out else {
            panic!("Expected stream");
        };
        seq.next().unwrap().unwrap();
        assert_eq!(pulled.get(), 1);
    }

    #[test]
    fn test_tr_and_each_map_elements() {
        let upper = |v: &Value| Value::Str(v.to_string().to_uppercase());
        let out = chain("ab", tr(upper).unwrap()).unwrap();
        assert_eq!(lines(out), vec!["A", "B"]);

        let out = chain("ab", each(upper).unwrap()).unwrap();
        assert_eq!(lines(out), vec!["A", "B"]);
    }

    #[test]
    fn test_tr_rejects_non_callable() {
        let partial = TR.bind(Args::new().arg("nope")).unwrap();
        let err = chain("ab", partial).unwrap_err();
        assert!(matches!(
            err,
            PipeError::ArgType {
                stage: "tr",
                param: "transform",
                ..
            }
        ));
    }

    #[test]
    fn test_printlines_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let path_str = path.to_string_lossy().into_owned();

        let out = chain(
            vec!["a", "b", "c"],
            printlines(", ", Some(path_str.as_str())).unwrap(),
        )
        .unwrap();
        assert_eq!(out.as_value(), Some(&Value::None));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a, b, c");
        // the handle is closed, so the file can be removed straight away
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_printlines_empty_sequence_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        let path_str = path.to_string_lossy().into_owned();
        chain(Sequence::empty(), printlines("\n", Some(path_str.as_str())).unwrap()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_printlines_to_stdout_touches_no_file() {
        let dir = TempDir::new().unwrap();
        let out = chain(Sequence::empty(), printlines("\n", None).unwrap()).unwrap();
        assert_eq!(out.as_value(), Some(&Value::None));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        // stdout is still usable afterwards
        assert!(io::stdout().flush().is_ok());
    }

    #[test]
    fn test_printlines_needs_two_extra_arguments() {
        let err = PRINTLINES.call(Args::new().arg("\n")).unwrap_err();
        assert!(matches!(
            err,
            PipeError::Arity {
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_write_joined_uses_display() {
        let mut buf = Vec::new();
        let items = Sequence::from_values(vec![
            Value::Int(1),
            Value::Tuple(vec![Value::Int(0), Value::from("l")]),
        ]);
        let written = write_joined(&mut buf, items, "|", PipeError::Stdout).unwrap();
        assert_eq!(written, 2);
        assert_eq!(String::from_utf8(buf).unwrap(), "1|(0, 'l')");
    }

    #[test]
    fn test_notempty_consumes_at_most_one() {
        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let upstream = Sequence::new(std::iter::from_fn(move || {
            counter.set(counter.get() + 1);
            Some(Ok(Value::Int(1)))
        }));
        let out = chain(upstream, &NOTEMPTY).unwrap();
        assert_eq!(out.as_value(), Some(&Value::Bool(true)));
        assert_eq!(pulled.get(), 1);
    }

    #[test]
    fn test_notempty_on_empty() {
        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let upstream = Sequence::new(std::iter::from_fn(move || {
            counter.set(counter.get() + 1);
            None
        }));
        let out = chain(upstream, &NOTEMPTY).unwrap();
        assert_eq!(out.as_value(), Some(&Value::Bool(false)));
        assert_eq!(pulled.get(), 1);
    }

    #[test]
    fn test_split_lines_keeps_terminators() {
        assert_eq!(
            split_lines("a\nb\r\nc"),
            vec![Value::from("a\n"), Value::from("b\r\n"), Value::from("c")]
        );
        assert!(split_lines("").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_feeds_stdin() {
        let out = chain(vec!["b\n", "a\n", "c\n"], shell("sort").unwrap()).unwrap();
        assert!(!out.is_stream());
        assert_eq!(lines(out), vec!["a\n", "b\n", "c\n"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_ignores_exit_status() {
        let out = chain(vec!["x\n"], shell("cat; exit 3").unwrap()).unwrap();
        assert_eq!(lines(out), vec!["x\n"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_command_not_reading_stdin() {
        let out = chain(vec!["ignored\n"], shell("echo hi").unwrap()).unwrap();
        assert_eq!(lines(out), vec!["hi\n"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_shellcmd_source() {
        let out = shellcmd("printf 'one\\ntwo\\n'").unwrap();
        assert_eq!(lines(out), vec!["one\n", "two\n"]);
    }

    #[test]
    fn test_writer_panic_is_an_error() {
        let panicked: thread::Result<io::Result<()>> = Err(Box::new("writer died"));
        assert!(writer_result(panicked).is_err());

        let broken = Ok(Err(io::Error::from(io::ErrorKind::BrokenPipe)));
        assert!(writer_result(broken).is_ok());

        let denied = Ok(Err(io::Error::from(io::ErrorKind::PermissionDenied)));
        assert!(writer_result(denied).is_err());
    }

    #[test]
    fn test_shell_rejects_non_string_elements() {
        let err = chain(vec![Value::Int(1)], shell("cat").unwrap()).unwrap_err();
        assert!(matches!(err, PipeError::ElementType { expected: "str", .. }));
    }
}
