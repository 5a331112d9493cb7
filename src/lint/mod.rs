//! Contract linting
//!
//! Static checks of a page against the DOM contract. Catches, before the
//! page ships, what the sync handlers would otherwise fail on at runtime:
//! - anchors pointing at missing ids (or at nothing, `href="#"`)
//! - no scroll container, no sections
//! - sections without an id, duplicate ids
//! - nav items that reference nothing, and sections no nav item references

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::model::{ResultItem, ResultSet, Severity};
use crate::core::paths::display_path;
use crate::core::render::{RenderConfig, Renderer};
use crate::dom::{parse_html, Document};
use crate::scan::find_pages;
use crate::sync::{fragment_id, DanglingAnchorPolicy, DomContract, EmptySectionsPolicy};

/// Lint issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    Error,
    Warning,
}

/// A lint issue
#[derive(Debug, Clone, PartialEq)]
pub struct LintIssue {
    pub severity: LintSeverity,
    pub code: &'static str,
    pub message: String,
    pub path: String,
    /// Label of the offending element, when there is one
    pub element: Option<String>,
}

impl LintIssue {
    pub fn error(code: &'static str, message: impl Into<String>, path: &str) -> Self {
        Self {
            severity: LintSeverity::Error,
            code,
            message: message.into(),
            path: path.to_string(),
            element: None,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>, path: &str) -> Self {
        Self {
            severity: LintSeverity::Warning,
            ..Self::error(code, message, path)
        }
    }

    fn with_severity(mut self, severity: LintSeverity) -> Self {
        self.severity = severity;
        self
    }

    fn at(mut self, element: String) -> Self {
        self.element = Some(element);
        self
    }

    pub fn to_result_item(&self) -> ResultItem {
        let severity = match self.severity {
            LintSeverity::Error => Severity::Error,
            LintSeverity::Warning => Severity::Warning,
        };
        let item = ResultItem::issue(&self.path, severity, self.code, &self.message);
        match &self.element {
            Some(element) => item.with_element(element),
            None => item,
        }
    }
}

/// Lint one parsed page. `path` is only used to label issues.
pub fn lint_document(doc: &Document, contract: &DomContract, path: &str) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    // Policies that downgrade runtime failures also downgrade their lint
    let dangling_severity = match contract.on_dangling {
        DanglingAnchorPolicy::Fail => LintSeverity::Error,
        DanglingAnchorPolicy::Ignore => LintSeverity::Warning,
    };
    let empty_severity = match contract.on_empty {
        EmptySectionsPolicy::Fail => LintSeverity::Error,
        EmptySectionsPolicy::Ignore => LintSeverity::Warning,
    };

    if doc.query(&contract.container).is_none() {
        issues.push(LintIssue::error(
            "MISSING_CONTAINER",
            format!("No scroll container matches '{}'", contract.container),
            path,
        ));
    }

    for anchor in doc.query_all(&contract.anchor) {
        let href = doc.attr(anchor, "href").unwrap_or_default();
        match fragment_id(href) {
            None => issues.push(
                LintIssue::error(
                    "EMPTY_FRAGMENT",
                    format!("Anchor href '{}' names no element", href),
                    path,
                )
                .with_severity(dangling_severity)
                .at(doc.describe(anchor)),
            ),
            Some(id) if doc.element_by_id(id).is_none() => issues.push(
                LintIssue::error(
                    "DANGLING_ANCHOR",
                    format!("Anchor '{}' has no target element", href),
                    path,
                )
                .with_severity(dangling_severity)
                .at(doc.describe(anchor)),
            ),
            Some(_) => {}
        }
    }

    let sections = doc.query_all(&contract.section);
    if sections.is_empty() {
        issues.push(
            LintIssue::error(
                "NO_SECTIONS",
                format!("No section matches '{}'", contract.section),
                path,
            )
            .with_severity(empty_severity),
        );
    }

    let mut section_ids = HashSet::new();
    for section in &sections {
        match doc.attr(*section, "id").filter(|id| !id.is_empty()) {
            Some(id) => {
                section_ids.insert(id);
            }
            None => issues.push(
                LintIssue::error("MISSING_SECTION_ID", "Section has no id", path)
                    .at(doc.describe(*section)),
            ),
        }
    }

    for (id, nodes) in doc.duplicate_ids() {
        issues.push(LintIssue::error(
            "DUPLICATE_ID",
            format!("Id '{}' is used {} times", id, nodes.len()),
            path,
        ));
    }

    let mut referenced = HashSet::new();
    for item in doc.query_all(&contract.nav_item) {
        match doc.attr(item, &contract.ref_attr) {
            None => issues.push(
                LintIssue::warning(
                    "MISSING_NAV_REF",
                    format!("Nav item has no '{}' attribute", contract.ref_attr),
                    path,
                )
                .at(doc.describe(item)),
            ),
            Some(reference) if !section_ids.contains(reference) => issues.push(
                LintIssue::warning(
                    "ORPHAN_NAV_ITEM",
                    format!("Nav item references '{}', which is not a section", reference),
                    path,
                )
                .at(doc.describe(item)),
            ),
            Some(reference) => {
                referenced.insert(reference);
            }
        }
    }

    for section in &sections {
        if let Some(id) = doc.attr(*section, "id").filter(|id| !id.is_empty()) {
            if !referenced.contains(id) {
                issues.push(
                    LintIssue::warning(
                        "UNLINKED_SECTION",
                        format!("Section '{}' has no nav item", id),
                        path,
                    )
                    .at(doc.describe(*section)),
                );
            }
        }
    }

    issues
}

/// Lint every page found under `paths`
pub fn lint_paths(root: &Path, paths: &[PathBuf], contract: &DomContract) -> Result<Vec<LintIssue>> {
    let mut issues = Vec::new();
    for page in find_pages(root, paths)? {
        let label = display_path(&page, root);
        let html = std::fs::read_to_string(&page)
            .with_context(|| format!("Failed to read page: {}", label))?;
        let doc = parse_html(&html).with_context(|| format!("Failed to parse page: {}", label))?;
        let found = lint_document(&doc, contract, &label);
        tracing::debug!(page = %label, issues = found.len(), "page linted");
        issues.extend(found);
    }
    Ok(issues)
}

/// Run the lint command. Fails when any error-severity issue was found.
pub fn run_lint(
    root: &Path,
    paths: &[PathBuf],
    contract: &DomContract,
    config: RenderConfig,
    quiet: bool,
) -> Result<()> {
    let issues = lint_paths(root, paths, contract)?;

    let result_set: ResultSet = issues.iter().map(LintIssue::to_result_item).collect();
    Renderer::with_config(config).render_to(&result_set, std::io::stdout().lock())?;

    let errors = result_set.count_severity(Severity::Error);
    let warnings = result_set.count_severity(Severity::Warning);
    if !quiet {
        eprintln!("{}", summary(errors, warnings));
    }

    if errors > 0 {
        bail!("lint failed with {} error(s)", errors);
    }
    Ok(())
}

fn summary(errors: usize, warnings: usize) -> String {
    let text = format!("{} error(s), {} warning(s)", errors, warnings);
    if errors > 0 {
        text.red().bold().to_string()
    } else if warnings > 0 {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str = r##"<html><body>
<nav>
  <a class="nav-item" data-ref="intro" href="#intro">Intro</a>
  <a class="nav-item" data-ref="usage" href="#usage">Usage</a>
</nav>
<main>
  <section class="section-container" id="intro">Intro</section>
  <section class="section-container" id="usage">Usage</section>
</main>
</body></html>"##;

    fn lint(html: &str, contract: &DomContract) -> Vec<LintIssue> {
        lint_document(&parse_html(html).unwrap(), contract, "page.html")
    }

    fn codes(issues: &[LintIssue]) -> Vec<&'static str> {
        issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_clean_page_has_no_issues() {
        assert!(lint(CLEAN, &DomContract::default()).is_empty());
    }

    #[test]
    fn test_dangling_and_empty_anchors() {
        let html = CLEAN.replace(
            "</nav>",
            r##"<a href="#gone">Gone</a><a href="#">Top</a></nav>"##,
        );
        let issues = lint(&html, &DomContract::default());
        assert_eq!(codes(&issues), vec!["DANGLING_ANCHOR", "EMPTY_FRAGMENT"]);
        assert!(issues.iter().all(|i| i.severity == LintSeverity::Error));
        assert_eq!(issues[0].element.as_deref(), Some(r##"a[href="#gone"]"##));
    }

    #[test]
    fn test_ignore_policy_downgrades_dangling() {
        let html = CLEAN.replace("</nav>", r##"<a href="#gone">Gone</a></nav>"##);
        let contract = DomContract {
            on_dangling: DanglingAnchorPolicy::Ignore,
            ..DomContract::default()
        };
        let issues = lint(&html, &contract);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, LintSeverity::Warning);
    }

    #[test]
    fn test_missing_container_and_sections() {
        let issues = lint("<html><body><p>nothing</p></body></html>", &DomContract::default());
        assert_eq!(codes(&issues), vec!["MISSING_CONTAINER", "NO_SECTIONS"]);

        let contract = DomContract {
            on_empty: EmptySectionsPolicy::Ignore,
            ..DomContract::default()
        };
        let issues = lint("<main></main>", &contract);
        assert_eq!(codes(&issues), vec!["NO_SECTIONS"]);
        assert_eq!(issues[0].severity, LintSeverity::Warning);
    }

    #[test]
    fn test_section_without_id() {
        let html = CLEAN.replace(
            "</main>",
            r#"<section class="section-container">anon</section></main>"#,
        );
        let issues = lint(&html, &DomContract::default());
        assert_eq!(codes(&issues), vec!["MISSING_SECTION_ID"]);
    }

    #[test]
    fn test_duplicate_ids() {
        let html = CLEAN.replace("<main>", r#"<main><div id="usage"></div>"#);
        let issues = lint(&html, &DomContract::default());
        assert_eq!(codes(&issues), vec!["DUPLICATE_ID"]);
        assert!(issues[0].message.contains("'usage'"));
    }

    #[test]
    fn test_nav_reference_warnings() {
        let html = CLEAN
            .replace(r#"data-ref="usage""#, r#"data-ref="usgae""#)
            .replace("</nav>", r#"<span class="nav-item">loose</span></nav>"#);
        let issues = lint(&html, &DomContract::default());
        assert_eq!(
            codes(&issues),
            vec!["ORPHAN_NAV_ITEM", "MISSING_NAV_REF", "UNLINKED_SECTION"]
        );
        assert!(issues.iter().all(|i| i.severity == LintSeverity::Warning));
    }

    #[test]
    fn test_issue_to_result_item() {
        let issue = LintIssue::warning("UNLINKED_SECTION", "Section 'x' has no nav item", "a.html")
            .at("section#x".to_string());
        let item = issue.to_result_item();
        assert_eq!(item.severity, Some(Severity::Warning));
        assert_eq!(item.element.as_deref(), Some("section#x"));
        assert_eq!(item.errors[0].code, "UNLINKED_SECTION");
    }

    #[test]
    fn test_lint_paths_reads_pages() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("ok.html"), CLEAN).unwrap();
        std::fs::write(
            temp.path().join("bad.html"),
            CLEAN.replace("</nav>", r##"<a href="#gone">x</a></nav>"##),
        )
        .unwrap();

        let issues = lint_paths(temp.path(), &[], &DomContract::default()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "bad.html");
    }
}
