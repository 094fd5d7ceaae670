use crate::tags::MemoryStore;
use crate::testing::{prompted, run_batch, tag_map, unattended, written};

use super::{BatchError, LineRef, RunOptions};

fn values(store: &MemoryStore, key: &str) -> Vec<Option<String>> {
    store
        .writes()
        .into_iter()
        .map(|(_, tags)| tags.get(key).cloned())
        .collect()
}

#[test]
fn test_reset_clears_values_and_modifiers() {
    let store = MemoryStore::new();
    let source = "\
:set ARTIST Monk
:seti TRACK 3 %02i
:setp TITLE _FILENAME '(.*)\\.flac' '\\1'
:seto GENRE Jazz
:reset
./a.flac
";
    let run = run_batch(source, &store, &[], unattended());
    assert_eq!(run.summary().written, 1);
    assert_eq!(written(&store, "./a.flac"), Some(tag_map(&[])));
    assert!(run.env.is_empty());
}

#[test]
fn test_set_once_applies_to_next_file_only() {
    let store = MemoryStore::new();
    let source = "\
:set GENRE Jazz
:set-once GENRE Bebop
:seto COMMENT live
./a.flac
./b.flac
";
    run_batch(source, &store, &[], unattended()).summary();
    assert_eq!(
        values(&store, "GENRE"),
        vec![Some("Bebop".into()), Some("Jazz".into())]
    );
    assert_eq!(values(&store, "COMMENT"), vec![Some("live".into()), None]);
}

#[test]
fn test_increments_follow_commits() {
    let store = MemoryStore::new();
    let source = "\
:set-incrementing TRACKNUMBER 5
./a.flac
./b.flac
./c.flac
";
    let run = run_batch(source, &store, &[], unattended());
    assert_eq!(run.summary().written, 3);
    assert_eq!(
        values(&store, "TRACKNUMBER"),
        vec![Some("5".into()), Some("6".into()), Some("7".into())]
    );
    assert_eq!(run.env.get("TRACKNUMBER"), Some("8"));
}

#[test]
fn test_increment_format_is_kept() {
    let store = MemoryStore::new();
    let source = ":seti TRACK 9 %02d\n./a.flac\n./b.flac\n";
    run_batch(source, &store, &[], unattended()).summary();
    assert_eq!(
        values(&store, "TRACK"),
        vec![Some("09".into()), Some("10".into())]
    );
}

#[test]
fn test_patterns_are_recomputed_per_file() {
    let store = MemoryStore::new();
    let source = "\
:set FROM abc123
:set-pattern TO FROM \"([a-z]+)[0-9]+\" \"X\\1\"
./a.flac
:set FROM xyz987
./b.flac
";
    run_batch(source, &store, &[], unattended()).summary();
    assert_eq!(
        values(&store, "TO"),
        vec![Some("Xabc".into()), Some("Xxyz".into())]
    );
}

#[test]
fn test_patterns_can_read_special_keys() {
    let store = MemoryStore::new();
    let source = "\
:setp TITLE _FILENAME '^[0-9]+ (.*)\\.flac$' '\\1'
:setp ALBUM _FOLDER '(.*)' '\\1'
./Portrait in Jazz/01 Come Rain or Come Shine.flac
";
    run_batch(source, &store, &[], unattended()).summary();
    let tags = written(&store, "./Portrait in Jazz/01 Come Rain or Come Shine.flac").unwrap();
    assert_eq!(tags.get("TITLE").map(String::as_str), Some("Come Rain or Come Shine"));
    assert_eq!(tags.get("ALBUM").map(String::as_str), Some("Portrait in Jazz"));
}

#[test]
fn test_internal_keys_never_written() {
    let store = MemoryStore::new();
    let source = "\
:set _DISC 2
:setp DISCNUMBER _DISC '(.*)' '\\1'
./a.flac
";
    let options = RunOptions {
        quiet: false,
        ..unattended()
    };
    let run = run_batch(source, &store, &[], options);
    let tags = written(&store, "./a.flac").unwrap();
    assert!(tags.keys().all(|k| !k.starts_with('_')));
    assert_eq!(tags.get("DISCNUMBER").map(String::as_str), Some("2"));
    assert!(!run.output.contains("_FILENAME"));
    assert!(!run.output.contains("_DISC"));
    assert!(run.output.contains("DISCNUMBER"));

    // per-file keys are gone once the file is done, user-set ones stay
    assert!(!run.env.contains("_FILENAME"));
    assert_eq!(run.env.get("_DISC"), Some("2"));
}

#[test]
fn test_unknown_command_halts_before_files() {
    let store = MemoryStore::new();
    let source = "\
# header
:set A 1

# more

:set B 2
:bogus arg
./a.flac
";
    let run = run_batch(source, &store, &[], unattended());
    match run.outcome {
        Err(BatchError::UnrecognizedCommand { command, line }) => {
            assert_eq!(command, "bogus");
            assert_eq!(line, LineRef(Some(7)));
        }
        other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
    }
    assert!(store.writes().is_empty());
}

#[test]
fn test_continued_lines_form_one_command() {
    let store = MemoryStore::new();
    let source = ":set TITLE \\\n'Blue in Green'\n./a.flac\n";
    run_batch(source, &store, &[], unattended()).summary();
    assert_eq!(
        values(&store, "TITLE"),
        vec![Some("Blue in Green".into())]
    );
}

#[test]
fn test_errors_after_continuation_report_first_line() {
    let store = MemoryStore::new();
    let source = ":set A 1\n:nope \\\nmore\n";
    let err = run_batch(source, &store, &[], unattended())
        .outcome
        .unwrap_err();
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_dry_run_writes_nothing_but_advances_state() {
    let store = MemoryStore::new();
    let options = RunOptions {
        dry_run: true,
        ..unattended()
    };
    let source = ":seti N 1\n:seto X y\n./a.flac\n./b.flac\n";
    let run = run_batch(source, &store, &[], options);
    let summary = run.summary();
    assert_eq!(summary.written, 2);
    assert!(summary.dry_run);
    assert!(store.writes().is_empty());
    assert!(run.output.contains("DRY RUN would write 2 tag(s) to ./a.flac"));
    assert!(run.output.contains("DRY RUN would write 1 tag(s) to ./b.flac"));
    assert_eq!(run.env.get("N"), Some("3"));
}

#[test]
fn test_declined_file_does_not_advance() {
    let store = MemoryStore::new();
    let source = ":seti N 1\n:seto X once\n./a.flac\n./b.flac\n";
    let run = run_batch(source, &store, &["n", "y"], prompted());
    let summary = run.summary();
    assert_eq!((summary.written, summary.skipped), (1, 1));

    let tags = written(&store, "./b.flac").unwrap();
    assert_eq!(tags.get("N").map(String::as_str), Some("1"));
    assert!(!tags.contains_key("X"));
    assert!(written(&store, "./a.flac").is_none());
}

#[test]
fn test_quit_stops_the_run() {
    let store = MemoryStore::new();
    let source = ":set A 1\n./a.flac\n./b.flac\n:bogus\n./c.flac\n";
    let run = run_batch(source, &store, &["y", "q"], prompted());
    let summary = run.summary();
    assert!(summary.quit);
    assert_eq!(summary.written, 1);
    assert_eq!(run.prompts.len(), 2);
    assert!(written(&store, "./b.flac").is_none());
}

#[test]
fn test_exhausted_input_quits() {
    let store = MemoryStore::new();
    let run = run_batch("./a.flac\n./b.flac\n", &store, &[], prompted());
    assert!(run.summary().quit);
    assert!(store.writes().is_empty());
}

#[test]
fn test_inline_commands_apply_to_current_file() {
    let store = MemoryStore::new();
    let source = ":set ARTIST Monk\n./a.flac\n./b.flac\n";
    let answers = [":set-once ARTIST 'Thelonious Monk'", ":set TITLE Misterioso", "", "y"];
    let run = run_batch(source, &store, &answers, prompted());
    assert_eq!(run.summary().written, 2);
    assert_eq!(run.prompts.len(), 4);

    let first = written(&store, "./a.flac").unwrap();
    assert_eq!(first.get("ARTIST").map(String::as_str), Some("Thelonious Monk"));
    assert_eq!(first.get("TITLE").map(String::as_str), Some("Misterioso"));

    let second = written(&store, "./b.flac").unwrap();
    assert_eq!(second.get("ARTIST").map(String::as_str), Some("Monk"));
    assert_eq!(second.get("TITLE").map(String::as_str), Some("Misterioso"));
}

#[test]
fn test_inline_command_errors_reprompt() {
    let store = MemoryStore::new();
    let answers = [":bogus", ":set _FILENAME x", ":set", "y"];
    let run = run_batch("./a.flac\n", &store, &answers, prompted());
    assert_eq!(run.summary().written, 1);
    assert_eq!(run.prompts.len(), 4);
    assert!(run.output.contains("Unrecognized command 'bogus' (prompt)"));
    assert!(run.output.contains("internal key '_FILENAME'"));
}

#[test]
fn test_inline_reset_keeps_file_keys() {
    let store = MemoryStore::new();
    let source = ":set A 1\n:setp T _FILENAME '(.*)' '\\1'\n./a.flac\n";
    run_batch(source, &store, &[":reset", ":setp B _FILENAME '(.*)' '\\1'", "y"], prompted())
        .summary();
    assert_eq!(
        written(&store, "./a.flac"),
        Some(tag_map(&[("B", "a.flac")]))
    );
}

#[test]
fn test_write_failure_is_fatal() {
    let store = MemoryStore::new();
    store.fail_writes_to("./b.flac");
    let source = ":seti N 1\n./a.flac\n./b.flac\n./c.flac\n";
    let run = run_batch(source, &store, &[], unattended());
    assert!(matches!(run.outcome, Err(BatchError::TagWrite(_))));
    assert_eq!(store.writes().len(), 1);
    assert_eq!(run.env.get("N"), Some("2"));
    assert!(!run.env.contains("_ABSPATH"));
}

#[test]
fn test_missing_source_key_aborts() {
    let store = MemoryStore::new();
    let source = ":setp TITLE NAME '(.*)' '\\1'\n./a.flac\n";
    let run = run_batch(source, &store, &[], unattended());
    match run.outcome {
        Err(BatchError::MissingSourceKey {
            key,
            source_key,
            path,
        }) => {
            assert_eq!(key, "TITLE");
            assert_eq!(source_key, "NAME");
            assert_eq!(path, "./a.flac");
        }
        other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
    }
    assert!(store.writes().is_empty());
}

#[test]
fn test_unset_drops_modifiers() {
    let store = MemoryStore::new();
    let source = ":seti N 1\n:unset N\n:set N x\n./a.flac\n./b.flac\n";
    run_batch(source, &store, &[], unattended()).summary();
    assert_eq!(
        values(&store, "N"),
        vec![Some("x".into()), Some("x".into())]
    );
}

#[test]
fn test_set_keeps_increment() {
    let store = MemoryStore::new();
    let source = ":seti N 1\n./a.flac\n:set N 10\n./b.flac\n./c.flac\n";
    run_batch(source, &store, &[], unattended()).summary();
    assert_eq!(
        values(&store, "N"),
        vec![Some("1".into()), Some("10".into()), Some("11".into())]
    );
}

#[test]
fn test_comments_and_blank_lines_are_ignored() {
    let store = MemoryStore::new();
    let source = "# mfbatch\n\n   \n#:bogus\n./a.flac\n";
    let run = run_batch(source, &store, &[], unattended());
    assert_eq!(run.summary().written, 1);
}

#[test]
fn test_quiet_unattended_run_prints_nothing() {
    let store = MemoryStore::new();
    let run = run_batch(":set A 1\n./a.flac\n", &store, &[], unattended());
    assert!(run.output.is_empty());
}

#[test]
fn test_set_once_on_derived_key_keeps_rule() {
    let store = MemoryStore::new();
    let source = "\
:set FROM abc
:setp TO FROM 'abc' 'derived'
:seto TO manual
./a.flac
./b.flac
";
    let run = run_batch(source, &store, &[], unattended());
    assert_eq!(run.summary().written, 2);
    assert_eq!(
        values(&store, "TO"),
        vec![Some("manual".into()), Some("derived".into())]
    );
}

#[test]
fn test_set_once_on_counter_does_not_break_count() {
    let store = MemoryStore::new();
    let source = "\
:seti TRACKNUMBER 1
./a.flac
:seto TRACKNUMBER A2
./b.flac
./c.flac
";
    let run = run_batch(source, &store, &[], unattended());
    assert_eq!(run.summary().written, 3);
    assert_eq!(
        values(&store, "TRACKNUMBER"),
        vec![Some("1".into()), Some("A2".into()), Some("3".into())]
    );
}

#[test]
fn test_pattern_with_unknown_group_is_an_argument_error() {
    let store = MemoryStore::new();
    let source = ":set FROM abc\n:setp TO FROM '(?P<word>\\w+)' '\\g<title>'\n./a.flac\n";
    let run = run_batch(source, &store, &[], unattended());
    match run.outcome {
        Err(BatchError::CommandArgument { command, line, .. }) => {
            assert_eq!(command, "setp");
            assert_eq!(line, LineRef(Some(2)));
        }
        other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
    }
    assert!(store.writes().is_empty());
}
