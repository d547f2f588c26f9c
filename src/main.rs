//! Interactive front end: prompts for paths, dialect and screen
//! coordinates, then writes the generated script.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use blockscript::compact::RunPolicy;
use blockscript::document::Document;
use blockscript::script::{generate, DialectConfig, ScreenPoint, ScriptOptions};
use blockscript::{
    CreateOutputDirSnafu, Error, ParseDocumentSnafu, PromptSnafu, ReadInputSnafu, WriteOutputSnafu,
};
use snafu::ResultExt;
use tracing_subscriber::EnvFilter;

#[snafu::report]
fn main() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    println!("=== block JSON -> ADB automation script ===");

    let input_path = PathBuf::from(prompt("input path")?);
    let text = fs::read_to_string(&input_path).context(ReadInputSnafu { path: &input_path })?;
    let doc = Document::from_json(&text).context(ParseDocumentSnafu { path: &input_path })?;

    let output_path = PathBuf::from(prompt("output path")?);

    let dialect = prompt_dialect()?;
    let policy = match dialect {
        // The merged-span mode reproduces the old script's output but can
        // fill coordinates the input never contained, so it is opt-in.
        DialectConfig::DirectType { .. } => {
            if prompt_yes_no("bridge gaps between ranges like the legacy script? [y/N]")? {
                RunPolicy::MergedSpan
            } else {
                RunPolicy::PerRun
            }
        }
        DialectConfig::ClipboardPaste { .. } => RunPolicy::PerRun,
    };

    let script = generate(&doc, &ScriptOptions { dialect, policy })?;

    if let Some(dir) = output_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).context(CreateOutputDirSnafu { path: dir })?;
    }
    let mut body = script.lines.join("\n");
    body.push('\n');
    fs::write(&output_path, body).context(WriteOutputSnafu { path: &output_path })?;

    println!(
        "generated {} commands ({} lines) -> {}",
        script.operations,
        script.lines.len(),
        output_path.display()
    );
    Ok(())
}

fn prompt_dialect() -> Result<DialectConfig, Error> {
    loop {
        match prompt("input method (1 = type directly, 2 = paste from clipboard)")?.as_str() {
            "1" => {
                let chat_tap = prompt_screen_point("chat field")?;
                return Ok(DialectConfig::DirectType { chat_tap });
            }
            "2" => {
                let chat_tap = prompt_screen_point("chat open control")?;
                let field_tap = prompt_screen_point("text input field")?;
                return Ok(DialectConfig::ClipboardPaste { chat_tap, field_tap });
            }
            _ => println!("please enter 1 or 2"),
        }
    }
}

fn prompt_screen_point(label: &str) -> Result<ScreenPoint, Error> {
    let x = prompt_i32(&format!("{label} tap X coordinate"))?;
    let y = prompt_i32(&format!("{label} tap Y coordinate"))?;
    Ok(ScreenPoint::new(x, y))
}

fn prompt_i32(label: &str) -> Result<i32, Error> {
    loop {
        match prompt(label)?.parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("please enter a valid integer"),
        }
    }
}

fn prompt_yes_no(label: &str) -> Result<bool, Error> {
    Ok(matches!(prompt(label)?.as_str(), "y" | "Y" | "yes"))
}

fn prompt(label: &str) -> Result<String, Error> {
    print!("{label}: ");
    io::stdout().flush().context(PromptSnafu)?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).context(PromptSnafu)?;
    Ok(line.trim().to_string())
}
