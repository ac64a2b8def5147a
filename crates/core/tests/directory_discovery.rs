mod common;

use common::{dll_exe_config, write_module};
use lodestone_api::{Finder, FinderError, ModuleHandle};
use lodestone_core::{DirectoryModuleFinder, PathCache};
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

fn names(modules: &[ModuleHandle]) -> Vec<String> {
    modules.iter().map(|m| m.name.clone()).collect()
}

fn isolated_finder(dir: &Path) -> DirectoryModuleFinder {
    DirectoryModuleFinder::with_config(dir, Arc::new(PathCache::new()), dll_exe_config()).unwrap()
}

#[cfg(unix)]
#[test]
fn test_alias_of_same_module_collapses() {
    let temp = tempfile::tempdir().unwrap();
    write_module(temp.path(), "a.dll");
    write_module(temp.path(), "b.dll");
    common::alias_module(temp.path(), "a.dll", "a_copy.dll");

    let finder = isolated_finder(temp.path());
    let modules = finder.find_all(false).unwrap();

    assert_eq!(modules.len(), 2);
    assert_eq!(names(&modules), vec!["a", "b"]);
}

#[test]
fn test_first_cached_call_equals_fresh_scan() {
    let temp = tempfile::tempdir().unwrap();
    write_module(temp.path(), "core.dll");
    write_module(temp.path(), "host.exe");

    let lazy = isolated_finder(temp.path());
    let eager = isolated_finder(temp.path());

    assert!(!lazy.is_populated());
    let from_cache = lazy.find_all(true).unwrap();
    assert_eq!(lazy.scan_count(), 1);
    assert_eq!(from_cache, eager.find_all(false).unwrap());
}

#[test]
fn test_missing_directory_keeps_prior_cache() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().canonicalize().unwrap().join("plugins");
    std::fs::create_dir(&dir).unwrap();
    write_module(&dir, "a.dll");

    let cache = Arc::new(PathCache::new());
    let finder = DirectoryModuleFinder::with_config(&dir, cache.clone(), dll_exe_config()).unwrap();
    let before = finder.find_all(false).unwrap();

    std::fs::remove_dir_all(&dir).unwrap();
    let err = finder.find_all(false).unwrap_err();
    assert!(matches!(err, FinderError::DirectoryNotFound(ref p) if *p == dir));
    assert!(err.is_scan_failure());

    assert!(finder.is_populated());
    assert_eq!(finder.find_all(true).unwrap(), before);
    assert_eq!(cache.get(&dir).unwrap(), before);
}

#[test]
fn test_missing_directory_on_fresh_finder() {
    let temp = tempfile::tempdir().unwrap();
    let cache = Arc::new(PathCache::new());
    let missing = temp.path().join("nope");
    let finder =
        DirectoryModuleFinder::with_config(&missing, cache.clone(), dll_exe_config()).unwrap();

    assert!(matches!(
        finder.find_all(true),
        Err(FinderError::DirectoryNotFound(_))
    ));
    assert!(!finder.is_populated());
    assert!(cache.is_empty());
}

#[test]
fn test_path_cache_shared_by_new_instances() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().canonicalize().unwrap();
    write_module(&dir, "a.dll");
    let cache = Arc::new(PathCache::new());

    let first = DirectoryModuleFinder::with_config(&dir, cache.clone(), dll_exe_config()).unwrap();
    let discovered = first.find_all(false).unwrap();

    // New module appears after the first scan; cached readers keep the old set.
    write_module(&dir, "b.dll");

    let second = DirectoryModuleFinder::with_config(&dir, cache.clone(), dll_exe_config()).unwrap();
    assert_eq!(second.find_all(true).unwrap(), discovered);
    assert_eq!(second.scan_count(), 0);

    // An explicit rescan sees the new module and overwrites the shared entry.
    let rescanned = second.find_all(false).unwrap();
    assert_eq!(names(&rescanned), vec!["a", "b"]);
    assert_eq!(cache.get(&dir).unwrap(), rescanned);

    let third = DirectoryModuleFinder::with_config(&dir, cache.clone(), dll_exe_config()).unwrap();
    assert_eq!(third.find_all(true).unwrap(), rescanned);

    // The first instance follows the shared entry too.
    assert_eq!(first.find_all(true).unwrap(), rescanned);
    assert_eq!(first.scan_count(), 1);
}

#[test]
fn test_populated_finder_sees_rescan_by_other_instance() {
    let temp = tempfile::tempdir().unwrap();
    write_module(temp.path(), "a.dll");
    let cache = Arc::new(PathCache::new());

    let first =
        DirectoryModuleFinder::with_config(temp.path(), cache.clone(), dll_exe_config()).unwrap();
    assert_eq!(names(&first.find_all(false).unwrap()), vec!["a"]);
    assert_eq!(names(&first.find_all(true).unwrap()), vec!["a"]);
    assert!(first.is_populated());

    write_module(temp.path(), "b.dll");
    let second =
        DirectoryModuleFinder::with_config(temp.path(), cache.clone(), dll_exe_config()).unwrap();
    let rescanned = second.find_all(false).unwrap();

    assert_eq!(first.find_all(true).unwrap(), rescanned);
    assert_eq!(names(&first.find_all(true).unwrap()), vec!["a", "b"]);
    assert_eq!(first.scan_count(), 1);
}

#[test]
fn test_path_cache_keyed_by_canonical_directory() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().join("plugins");
    std::fs::create_dir(&dir).unwrap();
    write_module(&dir, "a.dll");
    let cache = Arc::new(PathCache::new());

    let direct = DirectoryModuleFinder::with_config(&dir, cache.clone(), dll_exe_config()).unwrap();
    let discovered = direct.find_all(false).unwrap();
    assert!(cache.contains(&dir.canonicalize().unwrap()));

    // Same directory spelled through a parent hop.
    let roundabout = dir.join("..").join("plugins");
    let other =
        DirectoryModuleFinder::with_config(&roundabout, cache.clone(), dll_exe_config()).unwrap();
    assert_eq!(other.find_all(true).unwrap(), discovered);
    assert_eq!(other.scan_count(), 0);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_separate_caches_do_not_share() {
    let temp = tempfile::tempdir().unwrap();
    write_module(temp.path(), "a.dll");

    let first = isolated_finder(temp.path());
    first.find_all(false).unwrap();

    let isolated = isolated_finder(temp.path());
    isolated.find_all(true).unwrap();
    assert_eq!(isolated.scan_count(), 1);
}

#[test]
fn test_failed_scan_does_not_update_path_cache() {
    let temp = tempfile::tempdir().unwrap();
    write_module(temp.path(), "a.dll");
    let cache = Arc::new(PathCache::new());

    let finder =
        DirectoryModuleFinder::with_config(temp.path(), cache.clone(), dll_exe_config()).unwrap();
    let good = finder.find_all(false).unwrap();

    std::fs::write(temp.path().join("corrupt.dll"), b"garbage").unwrap();
    assert!(matches!(
        finder.find_all(false),
        Err(FinderError::ModuleLoad { .. })
    ));
    assert_eq!(cache.get(&temp.path().canonicalize().unwrap()).unwrap(), good);
}

#[test]
fn test_concurrent_instances_on_same_path() {
    let temp = tempfile::tempdir().unwrap();
    for i in 0..5 {
        write_module(temp.path(), &format!("m{i}.dll"));
    }
    let cache = Arc::new(PathCache::new());
    let barrier = Arc::new(Barrier::new(6));

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let dir = temp.path().to_path_buf();
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let finder =
                    DirectoryModuleFinder::with_config(dir, cache, dll_exe_config()).unwrap();
                barrier.wait();
                finder.find_all(false).unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for result in &results {
        assert_eq!(result, &results[0]);
        assert_eq!(result.len(), 5);
    }
    assert_eq!(cache.len(), 1);
    let key = temp.path().canonicalize().unwrap();
    assert_eq!(cache.get(&key).unwrap(), results[0]);
}

#[test]
fn test_find_filters_modules() {
    let temp = tempfile::tempdir().unwrap();
    write_module(temp.path(), "app.core.dll");
    write_module(temp.path(), "app.web.dll");
    write_module(temp.path(), "vendor.json.dll");

    let finder = isolated_finder(temp.path());
    let app = finder.find(&|m| m.name.starts_with("app."), true).unwrap();
    assert_eq!(names(&app), vec!["app.core", "app.web"]);
    assert_eq!(finder.scan_count(), 1);
}
