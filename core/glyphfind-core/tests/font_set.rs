/// Font set queries against real files.
///
/// Fixture fonts come from `GLYPHFIND_TEST_FONTS` or the system font
/// directory; tests that need them quietly skip when neither is around.
use std::env;
use std::path::PathBuf;

use glyphfind_core::discovery::{FontDiscovery, PathDiscovery};
use glyphfind_core::fontset::{
    load_faces, query_font_set, scan_font_set, CharsetQuery, FontPattern, SearchOptions,
};

fn fonts_dir() -> Option<PathBuf> {
    if let Ok(env_override) = env::var("GLYPHFIND_TEST_FONTS") {
        if let Ok(dir) = PathBuf::from(env_override).canonicalize() {
            return Some(dir);
        }
    }
    PathBuf::from("/usr/share/fonts").canonicalize().ok()
}

#[test]
fn empty_directory_yields_empty_set() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let query = CharsetQuery::new('A');

    let set = query_font_set(&[tmp.path().to_path_buf()], &query, &SearchOptions::default())
        .expect("query");

    assert!(set.is_empty());
}

#[test]
fn unreadable_fonts_are_skipped_not_fatal() {
    let tmp = tempfile::tempdir().expect("tempdir");
    std::fs::write(tmp.path().join("junk.otf"), b"OTTO but not really").expect("write");
    std::fs::write(tmp.path().join("empty.ttc"), b"").expect("write");

    let query = CharsetQuery::new('A');
    let opts = SearchOptions {
        follow_symlinks: false,
        jobs: Some(2),
    };
    let set = query_font_set(&[tmp.path().to_path_buf()], &query, &opts).expect("query");

    assert!(set.is_empty());
    assert!(load_faces(&tmp.path().join("junk.otf"), 'A').is_err());
}

#[test]
fn latin_a_results_are_scalable_sorted_and_unique() {
    let Some(fonts) = fonts_dir() else {
        return; // skip when fixtures are unavailable
    };

    let query = CharsetQuery::new('A');
    let set = query_font_set(&[fonts], &query, &SearchOptions::default()).expect("query");

    for pair in set.patterns().windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.family.to_lowercase() <= b.family.to_lowercase());
        assert!(
            (a.family.as_str(), a.style.as_str(), &a.file)
                != (b.family.as_str(), b.style.as_str(), &b.file)
        );
    }
    assert!(set.patterns().iter().all(|p| p.scalable));
}

#[test]
fn fixed_query_is_a_superset_of_the_scalable_one() {
    let Some(fonts) = fonts_dir() else {
        return; // skip when fixtures are unavailable
    };
    let roots = [fonts];
    let opts = SearchOptions::default();

    let scalable = query_font_set(&roots, &CharsetQuery::new('A'), &opts).expect("scalable");
    let all = query_font_set(
        &roots,
        &CharsetQuery::new('A').require_scalable(false),
        &opts,
    )
    .expect("all");

    assert!(all.len() >= scalable.len());
    for pattern in scalable.patterns() {
        let same_face = |p: &&FontPattern| {
            p.family == pattern.family && p.style == pattern.style && p.file == pattern.file
        };
        assert!(all.patterns().iter().any(|p| same_face(&p)));
    }
}

#[test]
fn loaded_faces_agree_with_the_query() {
    let Some(fonts) = fonts_dir() else {
        return; // skip when fixtures are unavailable
    };

    let discovered = PathDiscovery::new([fonts]).discover().expect("discover");
    let Some(first) = discovered.iter().find_map(|f| load_faces(&f.path, 'A').ok()) else {
        return;
    };

    for face in &first {
        assert!(!face.pattern.family.is_empty());
        assert!(!face.pattern.style.is_empty());
        assert_eq!(
            CharsetQuery::new('A').require_scalable(false).matches(face),
            face.has_glyph
        );
    }
}

#[test]
fn one_scan_yields_matches_and_label_candidates() {
    let Some(fonts) = fonts_dir() else {
        return; // skip when fixtures are unavailable
    };
    let roots = [fonts];
    let opts = SearchOptions::default();

    let scan = scan_font_set(&roots, &CharsetQuery::new('☃'), &opts).expect("scan");
    let latin = query_font_set(&roots, &CharsetQuery::new('A'), &opts).expect("latin");

    assert_eq!(scan.label_candidates, latin);
    assert_eq!(
        scan.fonts,
        query_font_set(&roots, &CharsetQuery::new('☃'), &opts).expect("snowman")
    );
}
