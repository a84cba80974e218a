//! End-to-end workflow test
//!
//! Drives the library surface over a realistic fixture tree:
//! 1. Expand the target glob
//! 2. Rewrite every matched page in place
//! 3. Verify the rewritten content
//! 4. Re-run and confirm nothing changes (idempotency)

use std::fs;
use tempfile::TempDir;
use tsx_sweep::rules::preset;
use tsx_sweep::{load_from_str, RewriteResult, Rewriter};

const DIRTY_PAGE: &str = r#""use client";

import { DynamicCodeExample } from "../../../../components/shared/CodeGenerator";

export default function ModalPage() {
  return (
    <div className="space-y-8">
      <h1>Modal</h1>

      {/* Key Features */}
      <div className="space-y-6">
        <div className="bg-gradient-to-br from-green-50 to-emerald-100 rounded-xl p-6 border border-green-200 dark:border-green-800">
          <h3 className="text-xl font-semibold">
            ✨ Key Features
          </h3>
          <ul>
            <li>Focus trapping</li>
          </ul>
        </div>
      </div>

      <DynamicCodeExample componentName="Modal" activeTab={activeTab} />
    </div>
  );
}
"#;

const CLEAN_PAGE: &str = r#"export default function TabsPage() {
  return <h1>Tabs</h1>;
}
"#;

/// Build a fixture tree shaped like the real target: app/patterns/*/page.tsx
fn setup_pattern_tree() -> TempDir {
    let dir = TempDir::new().unwrap();

    let modal = dir.path().join("app/patterns/modal");
    fs::create_dir_all(&modal).unwrap();
    fs::write(modal.join("page.tsx"), DIRTY_PAGE).unwrap();

    let tabs = dir.path().join("app/patterns/tabs");
    fs::create_dir_all(&tabs).unwrap();
    fs::write(tabs.join("page.tsx"), CLEAN_PAGE).unwrap();

    dir
}

#[test]
fn run_rewrites_dirty_pages_and_skips_clean_ones() {
    let tree = setup_pattern_tree();
    let pattern = format!("{}/app/patterns/*/page.tsx", tree.path().display());

    let rewriter = Rewriter::new(preset::page_cleanup());
    let report = rewriter.run(&pattern).unwrap();

    assert_eq!(report.total(), 2);
    assert_eq!(report.modified(), 1);
    assert_eq!(report.unchanged(), 1);
    assert_eq!(report.failed(), 0);

    let modal = fs::read_to_string(tree.path().join("app/patterns/modal/page.tsx")).unwrap();
    assert!(!modal.contains("Key Features"));
    assert!(!modal.contains("activeTab"));
    assert!(modal.contains(r#"from "../../../components/shared/CodeGenerator""#));
    assert!(modal.contains(r#"<DynamicCodeExample componentName="Modal" />"#));

    let tabs = fs::read_to_string(tree.path().join("app/patterns/tabs/page.tsx")).unwrap();
    assert_eq!(tabs, CLEAN_PAGE);
}

#[test]
fn second_run_is_a_noop() {
    let tree = setup_pattern_tree();
    let pattern = format!("{}/app/patterns/*/page.tsx", tree.path().display());
    let rewriter = Rewriter::new(preset::page_cleanup());

    let first = rewriter.run(&pattern).unwrap();
    assert_eq!(first.modified(), 1);

    let after_first = fs::read_to_string(tree.path().join("app/patterns/modal/page.tsx")).unwrap();

    let second = rewriter.run(&pattern).unwrap();
    assert_eq!(second.modified(), 0);
    assert_eq!(second.unchanged(), 2);

    let after_second = fs::read_to_string(tree.path().join("app/patterns/modal/page.tsx")).unwrap();
    assert_eq!(after_first, after_second);
}

#[test]
fn scan_reports_without_touching_files() {
    let tree = setup_pattern_tree();
    let pattern = format!("{}/app/patterns/*/page.tsx", tree.path().display());
    let rewriter = Rewriter::new(preset::page_cleanup());

    let report = rewriter.scan(&pattern).unwrap();

    assert_eq!(report.modified(), 1);
    let modal = fs::read_to_string(tree.path().join("app/patterns/modal/page.tsx")).unwrap();
    assert_eq!(modal, DIRTY_PAGE);
}

#[test]
fn undecodable_file_fails_without_aborting_batch() {
    let tree = setup_pattern_tree();
    let binary = tree.path().join("app/patterns/binary");
    fs::create_dir_all(&binary).unwrap();
    fs::write(binary.join("page.tsx"), [0xc3, 0x28, 0xa0, 0xa1]).unwrap();

    let pattern = format!("{}/app/patterns/*/page.tsx", tree.path().display());
    let rewriter = Rewriter::new(preset::page_cleanup());
    let report = rewriter.run(&pattern).unwrap();

    assert_eq!(report.total(), 3);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.modified(), 1);

    let failed = report
        .results
        .iter()
        .find(|r| r.is_failed())
        .expect("one failed result");
    assert!(failed.file().ends_with("binary/page.tsx"));
}

#[test]
fn custom_rule_file_drives_the_rewriter() {
    let tree = TempDir::new().unwrap();
    let page = tree.path().join("notes.tsx");
    fs::write(
        &page,
        "intro\n{/* Draft */}\n<aside>\n  scratch\n</aside>\nfinale\n",
    )
    .unwrap();

    let rule_file = load_from_str(
        r#"[meta]
name = "draft-cleanup"

[[rules]]
id = "drop-draft-block"

[rules.action]
kind = "delete-block"
open = '\{/\* Draft \*/\}'
close = '</aside>'

[[rules]]
id = "sweep-draft-marker"

[rules.action]
kind = "sweep-marker"
marker = "{/* Draft */}"
"#,
    )
    .unwrap();

    let rewriter = Rewriter::new(rule_file.compile().unwrap());
    let result = rewriter.process(&page);

    assert!(matches!(result, RewriteResult::Modified { .. }));
    assert_eq!(fs::read_to_string(&page).unwrap(), "intro\nfinale\n");
}
