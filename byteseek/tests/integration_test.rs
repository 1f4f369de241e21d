use byteseek::{search, DispatchMode, Needle, SearchConfig, WindowScanner};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use tempfile::tempdir;

fn create_test_files(dir: impl AsRef<Path>, files: &[(&str, &str)]) {
    for (name, content) in files {
        fs::write(dir.as_ref().join(name), content).unwrap();
    }
}

fn run(config: &SearchConfig) -> (String, byteseek::SearchSummary) {
    let mut out = Vec::new();
    let summary = search(config, &mut out).unwrap();
    (String::from_utf8(out).unwrap(), summary)
}

#[test]
fn test_end_to_end_directory_search() {
    let dir = tempdir().unwrap();
    create_test_files(
        &dir,
        &[
            ("alpha.txt", "xxabcxxabcxx"),
            ("beta.txt", "nothing here"),
            ("gamma.txt", "abc at the start"),
        ],
    );
    let sub = dir.path().join("nested");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("delta.txt"), "ends with abc").unwrap();

    let config = SearchConfig::new(dir.path(), "abc");
    let (text, summary) = run(&config);

    assert_eq!(summary.files_searched, 4);
    assert_eq!(summary.total_matches, 4);
    assert!(text.contains("alpha.txt(2):xx...xxa"));
    assert!(text.contains("alpha.txt(7):cxx...xx"));
    assert!(text.contains("gamma.txt(0):... at"));
    assert!(text.contains("delta.txt(10):th ..."));
}

#[test]
fn test_multi_window_file_on_disk() {
    // Larger than the window cap, so a real file goes through several
    // window refills and boundary carries.
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("big.bin");

    let window_cap = 500 * 1024;
    let mut content = vec![b'.'; window_cap * 2 + 12345];
    let planted: Vec<usize> = vec![
        0,
        window_cap - 3, // straddles the first window boundary
        window_cap + 17,
        content.len() - 6, // flush against the end
    ];
    for &at in &planted {
        content[at..at + 6].copy_from_slice(b"magic!");
    }
    fs::write(&file_path, &content).unwrap();

    let config = SearchConfig::new(&file_path, "magic!");
    let (text, summary) = run(&config);

    assert_eq!(summary.total_matches, planted.len());
    let offsets: Vec<usize> = text
        .lines()
        .map(|line| {
            let open = line.find('(').unwrap();
            let close = line.find(')').unwrap();
            line[open + 1..close].parse().unwrap()
        })
        .collect();
    assert_eq!(offsets, planted);
}

#[test]
fn test_scanner_and_dispatcher_agree_on_one_file() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("solo.txt");
    fs::write(&file_path, "lorem needle ipsum needle dolor").unwrap();

    let needle = Needle::new("needle").unwrap();
    let scanner = WindowScanner::new(&needle);
    let mut direct = Vec::new();
    let count = scanner.scan_file(&file_path, &mut direct).unwrap();

    let config = SearchConfig::new(&file_path, "needle");
    let (dispatched, summary) = run(&config);

    assert_eq!(count, 2);
    assert_eq!(summary.total_matches, 2);
    assert_eq!(String::from_utf8(direct).unwrap(), dispatched);
}

#[test]
fn test_modes_agree_on_mixed_tree() {
    let dir = tempdir().unwrap();
    for i in 0..10 {
        let body = format!("--- {} pattern --- pattern ---", i).repeat(20);
        fs::write(dir.path().join(format!("file{:02}.txt", i)), body).unwrap();
    }
    let sub = dir.path().join("deep");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("more.txt"), "one more pattern").unwrap();

    let mut config = SearchConfig::new(dir.path(), "pattern");
    config.mode = DispatchMode::Sync;
    let sync_run = run(&config);

    config.mode = DispatchMode::Concurrent;
    config.thread_count = NonZeroUsize::new(3).unwrap();
    let concurrent_run = run(&config);

    assert_eq!(sync_run, concurrent_run);
    assert_eq!(sync_run.1.total_matches, 10 * 40 + 1);
}

#[test]
fn test_unopenable_file_is_skipped_not_fatal() {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        create_test_files(&dir, &[("ok.txt", "a needle"), ("locked.txt", "a needle")]);
        let locked = dir.path().join("locked.txt");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::File::open(&locked).is_ok() {
            // Privileged user, permissions are not enforced.
            return;
        }

        let config = SearchConfig::new(dir.path(), "needle");
        let (text, summary) = run(&config);

        // Restore so tempdir cleanup works everywhere.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

        assert_eq!(summary.files_searched, 1);
        assert_eq!(summary.files_skipped, 1);
        assert!(text.contains("ok.txt(2):"));
        assert!(!text.contains("locked.txt"));
    }
}

#[test]
fn test_quoted_file_name_is_trimmed() {
    let dir = tempdir().unwrap();
    let name = "\"quoted.txt\"";
    fs::write(dir.path().join(name), "a needle").unwrap();

    let config = SearchConfig::new(dir.path(), "needle");
    let (text, _) = run(&config);
    assert!(text.starts_with("quoted.txt(2):"));
}

#[test]
fn test_binary_content() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("blob.bin");
    let mut content = vec![0u8, 1, 2, 0xFF, 0xFE];
    content.extend_from_slice(b"abc");
    content.extend_from_slice(&[0x80, 0x81]);
    fs::write(&file_path, &content).unwrap();

    let config = SearchConfig::new(&file_path, "abc");
    let mut out = Vec::new();
    let summary = search(&config, &mut out).unwrap();

    assert_eq!(summary.total_matches, 1);
    // Raw context bytes pass through verbatim.
    let expected: Vec<u8> = [
        b"blob.bin(5):".as_slice(),
        &[2, 0xFF, 0xFE],
        b"...",
        &[0x80, 0x81],
        b"\n",
    ]
    .concat();
    assert_eq!(out, expected);
}
