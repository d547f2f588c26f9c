//! End-to-end tests that drive the full pipeline and reconstruct the
//! covered coordinates from the emitted script.

use std::collections::BTreeSet;

use blockscript::compact::RunPolicy;
use blockscript::document::Document;
use blockscript::script::{generate, DialectConfig, ScreenPoint, ScriptOptions};

fn direct_options() -> ScriptOptions {
    ScriptOptions {
        dialect: DialectConfig::DirectType {
            chat_tap: ScreenPoint::new(540, 1200),
        },
        policy: RunPolicy::PerRun,
    }
}

fn clipboard_options() -> ScriptOptions {
    ScriptOptions {
        dialect: DialectConfig::ClipboardPaste {
            chat_tap: ScreenPoint::new(100, 200),
            field_tap: ScreenPoint::new(300, 400),
        },
        policy: RunPolicy::PerRun,
    }
}

/// Undoes the direct-type escape table.
fn unescape_direct(text: &str) -> String {
    text.replace("\\u0020", " ")
        .replace("\\u002F", "/")
        .replace("\\u007E", "~")
        .replace("\\u003A", ":")
        .replace("\\\"", "\"")
        .replace("\\'", "'")
        .replace("\\\\", "\\")
}

/// Pulls the game command out of a text-delivery line, for either dialect.
fn extract_command(line: &str) -> Option<String> {
    if let Some(rest) = line.strip_prefix("adb shell input text \"") {
        return Some(unescape_direct(rest.strip_suffix('"')?));
    }
    if let Some(rest) = line.strip_prefix("adb shell am broadcast -a clipper.set -e text \"") {
        return Some(rest.strip_suffix('"')?.replace("\\ ", " "));
    }
    None
}

type Covered = (i32, i32, i32, String, i32);

fn parse_coords(part: &str) -> (i32, i32, i32) {
    let mut nums = part.split('~').skip(1).map(|n| n.parse::<i32>().unwrap());
    (
        nums.next().unwrap(),
        nums.next().unwrap(),
        nums.next().unwrap(),
    )
}

/// Expands every command in the script into the set of positions it covers.
fn covered_positions(lines: &[String]) -> BTreeSet<Covered> {
    let mut covered = BTreeSet::new();
    for command in lines.iter().filter_map(|line| extract_command(line)) {
        let parts: Vec<&str> = command.split(' ').collect();
        match parts[0] {
            "/setblock" => {
                let (x, y, z) = parse_coords(parts[1]);
                let inserted =
                    covered.insert((x, y, z, parts[2].to_string(), parts[3].parse().unwrap()));
                assert!(inserted, "position covered twice");
            }
            "/fill" => {
                let (x0, y, z) = parse_coords(parts[1]);
                let (x1, y1, z1) = parse_coords(parts[2]);
                assert_eq!((y, z), (y1, z1), "fill must stay on one line");
                assert!(x1 > x0, "a fill never covers a single block");
                for x in x0..=x1 {
                    let inserted =
                        covered.insert((x, y, z, parts[3].to_string(), parts[4].parse().unwrap()));
                    assert!(inserted, "position covered twice");
                }
            }
            other => panic!("unexpected command {other}"),
        }
    }
    covered
}

#[test]
fn adjacent_blocks_merge_and_gaps_stay_open() {
    let doc = Document::from_json(
        r#"{
            "namespaces": ["minecraft:stone"],
            "totalBlocks": 3,
            "chunkedBlocks": [
                {"startX": 0, "startZ": 0, "blocks": [
                    [0, 0, 0, 0, 0],
                    [0, 0, 1, 0, 0],
                    [0, 0, 5, 0, 0]
                ]}
            ]
        }"#,
    )
    .unwrap();

    let script = generate(&doc, &direct_options()).unwrap();
    // One fill for x 0..=1 plus one setblock at x=5, never a single [0,5] span.
    assert_eq!(script.operations, 2);
    assert_eq!(script.lines.len(), 12);

    let commands: Vec<String> = script
        .lines
        .iter()
        .filter_map(|line| extract_command(line))
        .collect();
    assert_eq!(
        commands,
        vec![
            "/fill ~0~3~0 ~1~3~0 minecraft:stone 0",
            "/setblock ~5~3~0 minecraft:stone 0",
        ]
    );

    // Progress counts blocks, not commands.
    assert!(script.lines.contains(&"echo 2/3".to_string()));
    assert!(script.lines.contains(&"echo 3/3".to_string()));
}

#[test]
fn every_valid_entry_is_covered_exactly_once() {
    let doc = Document::from_json(
        r#"{
            "namespaces": ["minecraft:stone", "minecraft:glass"],
            "chunkedBlocks": [
                {"startX": 0, "startZ": 0, "blocks": [
                    [0, 0, 14, 0, 0],
                    [0, 0, 15, 0, 0],
                    [1, 0, 15, 0, 0],
                    [0, 2, 15, 0, 0],
                    [0, 0, 3, 1, 7]
                ]},
                {"startX": 16, "startZ": 0, "blocks": [
                    [0, 0, 0, 0, 0],
                    [0, 0, 1, 0, 0],
                    [0, 0, 1, 0, 0],
                    [0, 0, 2],
                    [9, 0, 4, 0, 0]
                ]}
            ]
        }"#,
    )
    .unwrap();

    let script = generate(&doc, &clipboard_options()).unwrap();
    let covered = covered_positions(&script.lines);

    let expected: BTreeSet<Covered> = [
        // Run crossing the chunk boundary: x 14..=17 merges into one fill.
        (14, 3, 0, "minecraft:stone".to_string(), 0),
        (15, 3, 0, "minecraft:stone".to_string(), 0),
        (16, 3, 0, "minecraft:stone".to_string(), 0),
        (17, 3, 0, "minecraft:stone".to_string(), 0),
        // Same position, different namespace / special value: own groups.
        (15, 3, 0, "minecraft:glass".to_string(), 0),
        (15, 3, 0, "minecraft:stone".to_string(), 2),
        // Lone block on another plane, y offset by 3.
        (3, 4, 7, "minecraft:stone".to_string(), 0),
    ]
    .into();
    assert_eq!(covered, expected);
    // 14..=17 is the only fill, everything else is a point operation.
    assert_eq!(script.operations, 4);
}

#[test]
fn merged_span_compatibility_mode_bridges_gaps() {
    let doc = Document::from_json(
        r#"{
            "namespaces": ["minecraft:stone"],
            "totalBlocks": 5,
            "chunkedBlocks": [
                {"startX": 0, "startZ": 0, "blocks": [
                    [0, 0, 0, 0, 0],
                    [0, 0, 1, 0, 0],
                    [0, 0, 8, 0, 0],
                    [0, 0, 9, 0, 0]
                ]}
            ]
        }"#,
    )
    .unwrap();

    let mut options = direct_options();
    options.policy = RunPolicy::MergedSpan;
    let script = generate(&doc, &options).unwrap();

    let commands: Vec<String> = script
        .lines
        .iter()
        .filter_map(|line| extract_command(line))
        .collect();
    assert_eq!(commands, vec!["/fill ~0~3~0 ~9~3~0 minecraft:stone 0"]);
    // The legacy counter over-reports: the span claims 10 blocks of 5.
    assert!(script.lines.contains(&"echo 10/5".to_string()));
}
