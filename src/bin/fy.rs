#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::too_many_lines
)]

//! `fy` is a small command-line front end for exercising each layer of the
//! crate against a real file.
//!
//! Modes:
//! - `scan <file>...`: print one line per token produced by the [`Scanner`].
//! - `parse <file>...`: print one line per event produced by the [`Parser`].
//! - `copy <file>...`: parse each document into a [`Document`] and emit it
//!   back out in block style, as a round-trip smoke test.
//! - `testsuite <file>...`: print events in the YAML test suite's compact
//!   notation (`+STR`, `-STR`, `+DOC`, `-DOC`, `+MAP`, `-MAP`, `+SEQ`,
//!   `-SEQ`, `=VAL`, `=ALI`).

use std::env;
use std::error::Error;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use fyaml::{
    yaml_emitter_new, yaml_emitter_set_output, yaml_parser_new, yaml_parser_set_input_string,
    Document, Event, EventData, ScalarStyle, Scanner, TokenData,
};

fn main() -> ExitCode {
    let mut args = env::args_os().skip(1);
    let Some(mode) = args.next().and_then(|arg| arg.into_string().ok()) else {
        return usage();
    };
    let files: Vec<_> = args.collect();
    if files.is_empty() {
        return usage();
    }

    for file in files {
        let input = match fs::read(&file) {
            Ok(input) => input,
            Err(err) => {
                let _ = writeln!(io::stderr(), "{}: {err}", file.to_string_lossy());
                return ExitCode::FAILURE;
            }
        };
        let result = match mode.as_str() {
            "scan" => run_scan(&input),
            "parse" => run_parse(&input),
            "copy" => run_copy(&input),
            "testsuite" => run_testsuite(&input),
            _ => return usage(),
        };
        if let Err(err) = result {
            let _ = writeln!(io::stderr(), "{mode}: {err}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn usage() -> ExitCode {
    let _ = writeln!(
        io::stderr(),
        "Usage: fy <scan|parse|copy|testsuite> <file>..."
    );
    ExitCode::FAILURE
}

fn run_scan(mut input: &[u8]) -> Result<(), Box<dyn Error>> {
    let mut scanner = Scanner::new();
    scanner.set_input_string(&mut input);
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    loop {
        let token = scanner.scan()?;
        let is_end = matches!(token.data, TokenData::StreamEnd);
        writeln!(stdout, "{:?}", token.data)?;
        if is_end {
            break;
        }
    }
    Ok(())
}

fn run_parse(mut input: &[u8]) -> Result<(), Box<dyn Error>> {
    let mut parser = yaml_parser_new();
    yaml_parser_set_input_string(&mut parser, &mut input);
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    loop {
        let event = parser.parse()?;
        let is_end = matches!(event.data, EventData::StreamEnd);
        writeln!(stdout, "{:?}", event.data)?;
        if is_end {
            break;
        }
    }
    Ok(())
}

fn run_copy(mut input: &[u8]) -> Result<(), Box<dyn Error>> {
    let mut parser = yaml_parser_new();
    yaml_parser_set_input_string(&mut parser, &mut input);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    loop {
        let mut document = Document::load(&mut parser)?;
        if document.get_root_node().is_none() {
            break;
        }
        let mut emitter = yaml_emitter_new();
        yaml_emitter_set_output(&mut emitter, &mut stdout);
        document.dump(&mut emitter)?;
        emitter.flush()?;
    }
    Ok(())
}

fn run_testsuite(mut input: &[u8]) -> Result<(), Box<dyn Error>> {
    let mut parser = yaml_parser_new();
    yaml_parser_set_input_string(&mut parser, &mut input);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    loop {
        let event = parser.parse()?;
        let is_end = matches!(event.data, EventData::StreamEnd);
        write_testsuite_event(&mut stdout, &event)?;
        if is_end {
            break;
        }
    }
    Ok(())
}

fn write_testsuite_event(stdout: &mut dyn Write, event: &Event) -> io::Result<()> {
    match &event.data {
        EventData::StreamStart { .. } => writeln!(stdout, "+STR"),
        EventData::StreamEnd => writeln!(stdout, "-STR"),
        EventData::DocumentStart { implicit, .. } => {
            if *implicit {
                writeln!(stdout, "+DOC")
            } else {
                writeln!(stdout, "+DOC ---")
            }
        }
        EventData::DocumentEnd { implicit } => {
            if *implicit {
                writeln!(stdout, "-DOC")
            } else {
                writeln!(stdout, "-DOC ...")
            }
        }
        EventData::Alias { anchor } => writeln!(stdout, "=ALI *{anchor}"),
        EventData::Scalar {
            anchor,
            tag,
            value,
            style,
            ..
        } => {
            let mut line = String::from("=VAL");
            if let Some(anchor) = anchor {
                write!(line, " &{anchor}").unwrap();
            }
            if let Some(tag) = tag {
                write!(line, " <{tag}>").unwrap();
            }
            line.push(' ');
            line.push(match style {
                ScalarStyle::Any | ScalarStyle::Plain => ':',
                ScalarStyle::SingleQuoted => '\'',
                ScalarStyle::DoubleQuoted => '"',
                ScalarStyle::Literal => '|',
                ScalarStyle::Folded => '>',
            });
            write_escaped(&mut line, value);
            writeln!(stdout, "{line}")
        }
        EventData::SequenceStart { anchor, tag, .. } => {
            let mut line = String::from("+SEQ");
            if let Some(anchor) = anchor {
                write!(line, " &{anchor}").unwrap();
            }
            if let Some(tag) = tag {
                write!(line, " <{tag}>").unwrap();
            }
            writeln!(stdout, "{line}")
        }
        EventData::SequenceEnd => writeln!(stdout, "-SEQ"),
        EventData::MappingStart { anchor, tag, .. } => {
            let mut line = String::from("+MAP");
            if let Some(anchor) = anchor {
                write!(line, " &{anchor}").unwrap();
            }
            if let Some(tag) = tag {
                write!(line, " <{tag}>").unwrap();
            }
            writeln!(stdout, "{line}")
        }
        EventData::MappingEnd => writeln!(stdout, "-MAP"),
    }
}

/// Escape a scalar value the way the YAML test suite expects: `\\`, `\0`,
/// `\b`, `\n`, `\r`, `\t`.
fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\x08' => out.push_str("\\b"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch => out.push(ch),
        }
    }
}
