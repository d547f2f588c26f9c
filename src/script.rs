//! Renders operations as ADB automation directives.
//!
//! Two input dialects exist for getting a command string into the chat
//! field: typing it character by character (`adb shell input text`) or
//! pasting it from the clipboard via a broadcast to the Clipper app. Both
//! wrap the command in taps, waits and confirmation key presses; neither
//! verifies that the device executed a step.

use nalgebra::Point2;
use snafu::ensure;
use tracing::info;

use crate::compact::{plan, OpKind, Operation, RunPolicy};
use crate::document::Document;
use crate::grid::group_blocks;
use crate::{MissingTotalBlocksSnafu, NoBlocksSnafu, Result};

/// A tap target on the device screen.
pub type ScreenPoint = Point2<i32>;

/// Android "enter" key code, used to submit the chat field.
const KEYCODE_ENTER: u32 = 66;
/// Android "paste" key code.
const KEYCODE_PASTE: u32 = 279;
/// Synchronous one-second pause for cmd.exe batch runners.
const CHOICE_WAIT: &str = "choice /t 1 /d y /n >nul";

/// The raw game command for an operation, before any dialect escaping.
pub fn command_text(op: &Operation) -> String {
    let Operation {
        y,
        z,
        namespace,
        special_value,
        ..
    } = op;
    match op.kind {
        OpKind::Point(x) => {
            format!("/setblock ~{x}~{y}~{z} {namespace} {special_value}")
        }
        OpKind::Fill(x0, x1) => {
            format!("/fill ~{x0}~{y}~{z} ~{x1}~{y}~{z} {namespace} {special_value}")
        }
    }
}

/// Escapes a command for `adb shell input text`.
///
/// The substitution table covers every character that the shell or the IME
/// would otherwise mangle; everything else passes through unchanged.
pub fn escape_direct(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' ' => escaped.push_str("\\u0020"),
            '/' => escaped.push_str("\\u002F"),
            '~' => escaped.push_str("\\u007E"),
            ':' => escaped.push_str("\\u003A"),
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escapes a command for the clipboard broadcast. The clipboard carries
/// text verbatim, so only spaces need protecting from the shell.
pub fn escape_clipboard(text: &str) -> String {
    text.replace(' ', "\\ ")
}

fn tap(target: ScreenPoint) -> String {
    format!("adb shell input tap {} {}", target.x, target.y)
}

fn keyevent(code: u32) -> String {
    format!("adb shell input keyevent {code}")
}

fn sleep_ms(millis: u32) -> String {
    format!("powershell -Command 'Start-Sleep -Milliseconds {millis}'")
}

/// Strategy seam between the two ways of delivering a command string to
/// the device. Implementations append their full step sequence for one
/// operation.
pub trait InputDialect {
    fn emit(&mut self, op: &Operation, out: &mut Vec<String>);
}

/// Types each command directly into the chat field.
///
/// Emits six lines per operation and keeps a running `current/total`
/// progress counter that the batch runner echoes after each submit.
#[derive(Debug)]
pub struct DirectType {
    chat_tap: ScreenPoint,
    total_blocks: u64,
    emitted_blocks: u64,
}

impl DirectType {
    pub fn new(chat_tap: ScreenPoint, total_blocks: u64) -> Self {
        Self {
            chat_tap,
            total_blocks,
            emitted_blocks: 0,
        }
    }
}

impl InputDialect for DirectType {
    fn emit(&mut self, op: &Operation, out: &mut Vec<String>) {
        out.push(tap(self.chat_tap));
        out.push(CHOICE_WAIT.into());
        out.push(format!(
            "adb shell input text \"{}\"",
            escape_direct(&command_text(op))
        ));
        out.push(keyevent(KEYCODE_ENTER));
        self.emitted_blocks += op.block_count();
        out.push(format!("echo {}/{}", self.emitted_blocks, self.total_blocks));
        out.push(CHOICE_WAIT.into());
    }
}

/// Loads each command into the device clipboard and pastes it.
///
/// Needs two tap targets: the control that opens the chat, and the text
/// field itself. Emits eleven lines per operation with millisecond-level
/// pacing; pastes of long fill commands settle faster than setblock spam,
/// hence the shorter wait.
#[derive(Debug)]
pub struct ClipboardPaste {
    chat_tap: ScreenPoint,
    field_tap: ScreenPoint,
}

impl ClipboardPaste {
    pub fn new(chat_tap: ScreenPoint, field_tap: ScreenPoint) -> Self {
        Self { chat_tap, field_tap }
    }
}

impl InputDialect for ClipboardPaste {
    fn emit(&mut self, op: &Operation, out: &mut Vec<String>) {
        let settle_ms = match op.kind {
            OpKind::Point(_) => 800,
            OpKind::Fill(..) => 400,
        };
        out.push(tap(self.chat_tap));
        out.push(sleep_ms(400));
        out.push(tap(self.field_tap));
        out.push(sleep_ms(100));
        out.push(tap(self.field_tap));
        out.push(format!(
            "adb shell am broadcast -a clipper.set -e text \"{}\"",
            escape_clipboard(&command_text(op))
        ));
        out.push(keyevent(KEYCODE_PASTE));
        out.push(sleep_ms(settle_ms));
        out.push(keyevent(KEYCODE_ENTER));
        out.push(sleep_ms(100));
        out.push(keyevent(KEYCODE_ENTER));
    }
}

/// Which dialect to render and the screen coordinates it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectConfig {
    DirectType { chat_tap: ScreenPoint },
    ClipboardPaste {
        chat_tap: ScreenPoint,
        field_tap: ScreenPoint,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptOptions {
    pub dialect: DialectConfig,
    pub policy: RunPolicy,
}

/// A rendered automation script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// One automation directive per line.
    pub lines: Vec<String>,
    /// Number of game commands (point or fill) the script submits.
    pub operations: usize,
}

/// Runs the whole pipeline: validate, resolve, group, compact, render.
pub fn generate(doc: &Document, options: &ScriptOptions) -> Result<Script> {
    doc.validate()?;
    if matches!(options.dialect, DialectConfig::DirectType { .. }) {
        ensure!(
            doc.total_blocks.is_some_and(|total| total > 0),
            MissingTotalBlocksSnafu
        );
    }

    let blocks = doc.resolve_blocks();
    let groups = group_blocks(&blocks);
    let operations = plan(&groups, options.policy);
    ensure!(!operations.is_empty(), NoBlocksSnafu);

    let mut dialect: Box<dyn InputDialect> = match options.dialect {
        DialectConfig::DirectType { chat_tap } => Box::new(DirectType::new(
            chat_tap,
            doc.total_blocks.unwrap_or_default(),
        )),
        DialectConfig::ClipboardPaste { chat_tap, field_tap } => {
            Box::new(ClipboardPaste::new(chat_tap, field_tap))
        }
    };

    let mut lines = Vec::new();
    for op in &operations {
        dialect.emit(op, &mut lines);
    }
    info!(
        blocks = blocks.len(),
        operations = operations.len(),
        lines = lines.len(),
        "rendered automation script"
    );
    Ok(Script {
        lines,
        operations: operations.len(),
    })
}
