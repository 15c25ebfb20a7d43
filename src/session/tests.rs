//! End-to-end session tests against the fake interpreter.

#![cfg(unix)]

use super::*;
use crate::codec::DtaFileCodec;
use crate::driver::Platform;
use crate::test_support::{
    LinesCodec, dir_entries, install_fake_stata, install_interpreter, sh_settings,
};
use std::path::Path;
use tempfile::TempDir;

struct Harness {
    _bin: TempDir,
    temp_root: TempDir,
    workdir: TempDir,
    settings: Settings,
}

impl Harness {
    fn new(platform: Platform) -> Self {
        let bin = TempDir::new().unwrap();
        let fake = install_fake_stata(bin.path());
        Self {
            settings: sh_settings(&fake, platform),
            _bin: bin,
            temp_root: TempDir::new().unwrap(),
            workdir: TempDir::new().unwrap(),
        }
    }

    fn with_interpreter(body: &str) -> Self {
        let mut h = Self::new(Platform::Unix);
        let custom = install_interpreter(h._bin.path(), "custom", body);
        h.settings = sh_settings(&custom, Platform::Unix);
        h
    }

    fn request<T>(&self, commands: &[&str]) -> RunRequest<T> {
        RunRequest::new(CommandSource::from_values(commands.iter().copied()).unwrap())
            .with_temp_root(self.temp_root.path())
            .with_working_dir(self.workdir.path())
    }

    fn assert_clean(&self) {
        assert!(
            dir_entries(self.temp_root.path()).is_empty(),
            "session directory left behind: {:?}",
            dir_entries(self.temp_root.path())
        );
        assert!(
            dir_entries(self.workdir.path()).is_empty(),
            "files left in working directory: {:?}",
            dir_entries(self.workdir.path())
        );
    }
}

fn lines_codec() -> CodecSet<Vec<String>> {
    CodecSet::uniform(LinesCodec)
}

fn auto_table() -> Vec<String> {
    vec![
        "make,price,mpg".to_string(),
        "AMC Concord,4099,22".to_string(),
        "AMC Pacer,4749,17".to_string(),
    ]
}

#[test]
fn display_scenario_returns_rendered_value_and_no_table() {
    let h = Harness::new(Platform::Unix);

    let outcome = run(h.request::<Vec<String>>(&["display 1+1"]), &h.settings, &lines_codec())
        .unwrap();

    assert_eq!(
        outcome.output,
        Some(vec![". display 1+1".to_string(), "2".to_string()])
    );
    assert!(outcome.table.is_none());
    assert_eq!(outcome.exit_code, Some(0));
    h.assert_clean();
}

#[test]
fn slice_excludes_banner_and_teardown() {
    let h = Harness::new(Platform::Unix);

    let outcome = run(
        h.request::<Vec<String>>(&["display 2*3\ndisplay 10-4"]),
        &h.settings,
        &lines_codec(),
    )
    .unwrap();

    let output = outcome.output.unwrap();
    assert_eq!(output, vec![". display 2*3", "6", ". display 10-4", "6"]);
    assert!(!output.iter().any(|l| l.contains("fake Stata")));
    assert!(!output.iter().any(|l| l.contains("STATARUN-CUT")));
    assert!(!output.iter().any(|l| l.contains("exit, clear STATA")));
}

#[test]
fn identity_round_trip_returns_equal_table() {
    let h = Harness::new(Platform::Unix);

    let request = h
        .request(&["describe"])
        .with_input(auto_table())
        .with_output();
    let outcome = run(request, &h.settings, &lines_codec()).unwrap();

    assert_eq!(outcome.table, Some(auto_table()));
    h.assert_clean();
}

#[test]
fn legacy_save_round_trip() {
    let mut h = Harness::new(Platform::Unix);
    h.settings.stata_version = 15;

    let request = h
        .request(&["display 1"])
        .with_input(auto_table())
        .with_output()
        .with_legacy_save(true);
    let outcome = run(request, &h.settings, &lines_codec()).unwrap();

    assert_eq!(outcome.table, Some(auto_table()));
    h.assert_clean();
}

#[test]
fn caller_error_is_reported_in_output_and_data_still_returned() {
    let h = Harness::new(Platform::Unix);

    let request = h
        .request(&["error 198", "display 4"])
        .with_input(auto_table())
        .with_output();
    let outcome = run(request, &h.settings, &lines_codec()).unwrap();

    let output = outcome.output.unwrap();
    assert!(output.contains(&"r(198);".to_string()));
    assert!(output.contains(&"4".to_string()));
    assert_eq!(outcome.table, Some(auto_table()));
}

#[test]
fn echo_off_returns_no_output() {
    let mut h = Harness::new(Platform::Unix);
    h.settings.echo = false;

    let outcome = run(h.request::<Vec<String>>(&["display 1"]), &h.settings, &lines_codec())
        .unwrap();

    assert!(outcome.output.is_none());
    h.assert_clean();
}

#[test]
fn script_mode_runs_do_file_lines() {
    let h = Harness::new(Platform::Unix);
    let do_file = h._bin.path().join("analysis.do");
    std::fs::write(&do_file, "display 7\ndisplay 8\n").unwrap();

    let source = CommandSource::from_values([do_file.to_string_lossy().into_owned()]).unwrap();
    let request = RunRequest::<Vec<String>>::new(source)
        .with_temp_root(h.temp_root.path())
        .with_working_dir(h.workdir.path());
    let outcome = run(request, &h.settings, &lines_codec()).unwrap();

    assert_eq!(
        outcome.output.unwrap(),
        vec![". display 7", "7", ". display 8", "8"]
    );
    assert!(do_file.exists(), "caller's do-file must not be removed");
}

#[test]
fn windows_batch_log_is_authoritative_and_removed() {
    let h = Harness::new(Platform::Windows);

    let outcome = run(h.request::<Vec<String>>(&["display 3+4"]), &h.settings, &lines_codec())
        .unwrap();

    assert_eq!(
        outcome.output,
        Some(vec![". display 3+4".to_string(), "7".to_string()])
    );
    h.assert_clean();
}

#[test]
fn windows_batch_log_is_removed_when_echo_is_off() {
    let mut h = Harness::new(Platform::Windows);
    h.settings.echo = false;

    run(h.request::<Vec<String>>(&["display 1"]), &h.settings, &lines_codec()).unwrap();

    h.assert_clean();
}

#[test]
fn crash_before_second_marker_is_protocol_violation_and_cleans_up() {
    let h = Harness::new(Platform::Unix);

    let request = h
        .request(&["crash", "display 1"])
        .with_input(auto_table())
        .with_output();
    let err = run(request, &h.settings, &lines_codec()).unwrap_err();

    assert!(matches!(err, StataError::ProtocolViolation(_)));
    assert!(err.to_string().contains("found 1"));
    h.assert_clean();
}

#[test]
fn missing_output_dataset_is_output_missing_and_cleans_up() {
    let mut h = Harness::new(Platform::Unix);
    h.settings.echo = false;

    let request = h.request::<Vec<String>>(&["crash"]).with_output();
    let err = run(request, &h.settings, &lines_codec()).unwrap_err();

    assert!(matches!(err, StataError::OutputMissing(_)));
    h.assert_clean();
}

#[test]
fn silent_interpreter_is_protocol_violation() {
    let h = Harness::with_interpreter("exit 0\n");

    let err = run(h.request::<Vec<String>>(&["display 1"]), &h.settings, &lines_codec())
        .unwrap_err();

    assert!(matches!(err, StataError::ProtocolViolation(_)));
    assert!(err.to_string().contains("found 0"));
    h.assert_clean();
}

#[test]
fn nonzero_exit_after_full_run_is_not_a_failure() {
    let h = Harness::with_interpreter(
        "script=\"$2\"\nwhile IFS= read -r line; do printf '. %s\\n' \"$line\"; done < \"$script\"\nexit 9\n",
    );

    let outcome = run(h.request::<Vec<String>>(&["display 1"]), &h.settings, &lines_codec())
        .unwrap();

    assert_eq!(outcome.exit_code, Some(9));
    assert_eq!(outcome.output, Some(vec![". display 1".to_string()]));
}

#[test]
fn missing_executable_is_execution_failed_and_cleans_up() {
    let mut h = Harness::new(Platform::Unix);
    h.settings.stata_path = h._bin.path().join("not-installed");
    h.settings.extra_args.clear();

    let request = h.request(&["display 1"]).with_input(auto_table()).with_output();
    let err = run(request, &h.settings, &lines_codec()).unwrap_err();

    assert!(matches!(err, StataError::ExecutionFailed(_)));
    h.assert_clean();
}

#[test]
fn encode_failure_cleans_up_before_launch() {
    let h = Harness::new(Platform::Unix);

    let request = h
        .request(&["display 1"])
        .with_input(h._bin.path().join("absent.dta"))
        .with_output();
    let err = run(request, &h.settings, &CodecSet::uniform(DtaFileCodec::new())).unwrap_err();

    assert!(matches!(err, StataError::Codec(_)));
    h.assert_clean();
}

#[test]
fn dta_file_codec_round_trip() {
    let h = Harness::new(Platform::Unix);
    let data_dir = TempDir::new().unwrap();
    let input = data_dir.path().join("auto.dta");
    std::fs::write(&input, b"<stata_dta><header>").unwrap();
    let wanted = data_dir.path().join("result.dta");

    let request = h.request(&["display 0"]).with_input(input.clone()).with_output();
    let outcome = run(
        request,
        &h.settings,
        &CodecSet::uniform(DtaFileCodec::with_destination(&wanted)),
    )
    .unwrap();

    assert_eq!(outcome.table.as_deref(), Some(wanted.as_path()));
    assert_eq!(std::fs::read(&wanted).unwrap(), b"<stata_dta><header>");
    h.assert_clean();
}

#[test]
fn missing_configuration_fails_before_any_file_is_created() {
    let h = Harness::new(Platform::Unix);
    let config = Config {
        stata_version: Some(17),
        ..Default::default()
    };

    let err = run_configured(
        h.request::<Vec<String>>(&["display 1"]),
        &Overrides::default(),
        &EnvSnapshot::default(),
        &config,
        &lines_codec(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        StataError::MissingConfiguration {
            key: "stata_path",
            ..
        }
    ));
    h.assert_clean();
}

#[test]
fn empty_command_source_is_invalid_input() {
    let h = Harness::new(Platform::Unix);
    let request = RunRequest::<Vec<String>>::new(CommandSource::Inline(Vec::new()))
        .with_temp_root(h.temp_root.path());

    let err = run(request, &h.settings, &lines_codec()).unwrap_err();
    assert!(matches!(err, StataError::InvalidInput(_)));
    h.assert_clean();
}

#[test]
fn missing_working_dir_is_invalid_argument() {
    let h = Harness::new(Platform::Unix);
    let request = h
        .request::<Vec<String>>(&["display 1"])
        .with_working_dir(Path::new("/definitely/not/a/dir"));

    let err = run(request, &h.settings, &lines_codec()).unwrap_err();
    assert!(matches!(err, StataError::InvalidArgument(_)));
}

#[test]
fn concurrent_sessions_do_not_collide() {
    let h = Harness::new(Platform::Windows);
    let settings = h.settings.clone();
    let temp_root = h.temp_root.path().to_path_buf();
    let workdir = h.workdir.path().to_path_buf();

    let handles: Vec<_> = (1..=4)
        .map(|i| {
            let settings = settings.clone();
            let temp_root = temp_root.clone();
            let workdir = workdir.clone();
            std::thread::spawn(move || {
                let request = RunRequest::<Vec<String>>::new(
                    CommandSource::from_values([format!("display {}*10", i)]).unwrap(),
                )
                .with_temp_root(temp_root)
                .with_working_dir(workdir);
                let outcome = run(request, &settings, &lines_codec()).unwrap();
                (i, outcome.output.unwrap())
            })
        })
        .collect();

    for handle in handles {
        let (i, output) = handle.join().unwrap();
        assert_eq!(output, vec![format!(". display {}*10", i), format!("{}", i * 10)]);
    }
    h.assert_clean();
}

#[test]
fn preview_renders_without_running() {
    let source = CommandSource::from_values(["display 1"]).unwrap();
    let text = preview_script(&source, true, true, true, 14).unwrap();

    assert!(text.starts_with("set more off\nuse \"<input>.dta\", clear\n"));
    assert!(text.contains("saveold \"<output>.dta\", version(12)\n"));
    assert!(text.ends_with("exit, clear STATA\n"));
}
