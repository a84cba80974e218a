//! Built-in cleanup rules for pattern-library page components.
//!
//! These encode the net effect of the historical one-off cleanup passes over
//! `app/patterns/*/page.tsx`: delete the green "Key Features" card (with or
//! without its layout wrapper), sweep any orphaned marker comment, correct
//! the over-deep shared CodeGenerator import, and strip the stale
//! `activeTab` prop from `DynamicCodeExample` tags.
//!
//! The card patterns enumerate the style variants that actually occur in the
//! tree (gradient direction, heading level, heading classes vary; the
//! `from-green-50` fragment and the green border classes are the stable
//! fingerprint). Variants outside that enumeration are left alone by design.

use crate::rules::{BlockRemover, MarkerSweep, RuleSet, Substitution};

/// Default target set, relative to the web application root.
pub const DEFAULT_PATTERN: &str = "app/patterns/*/page.tsx";

/// Marker comment preceding the feature card.
const FEATURE_MARKER: &str = "{/* Key Features */}";

/// Feature card inside a `space-y-6` layout wrapper. Closes with two
/// consecutive `</div>` tokens: card, then wrapper.
const WRAPPED_FEATURE_CARD: &str = r#"(?:\{/\* Key Features \*/\}\s*)?<div className="space-y-6">\s*<div className="bg-gradient-to-[^"]* from-green-50[^"]* rounded-xl p-6 border border-green-200 dark:border-green-800">\s*<h[23] className="[^"]*">\s*✨ Key Features\s*</h[23]>.*?</div>\s*</div>"#;

/// Bare feature card without the layout wrapper.
const BARE_FEATURE_CARD: &str = r#"(?:\{/\* Key Features \*/\}\s*)?<div className="bg-gradient-to-[^"]* from-green-50[^"]* rounded-xl p-6 border border-green-200 dark:border-green-800">\s*<h[23] className="[^"]*">\s*✨ Key Features\s*</h[23]>.*?</div>"#;

/// Stale `activeTab` prop on a self-closing `DynamicCodeExample` tag, one
/// line or split across lines. The quoted component name is preserved.
const ACTIVE_TAB_PROP: &str =
    r#"<DynamicCodeExample\s+componentName="([^"]+)"\s+activeTab=\{activeTab\}\s*/>"#;

/// The shipped page-component cleanup rule set, in priority order.
///
/// The wrapped-card rule must run before the bare-card rule so the layout
/// wrapper is removed together with its card rather than surviving as an
/// empty shell. Once an earlier rule has deleted a card, later rules find
/// nothing at that location.
pub fn page_cleanup() -> RuleSet {
    let mut rules = RuleSet::new();

    rules.push(
        BlockRemover::new("feature-card-wrapped", WRAPPED_FEATURE_CARD)
            .expect("built-in pattern compiles"),
    );
    rules.push(
        BlockRemover::new("feature-card", BARE_FEATURE_CARD).expect("built-in pattern compiles"),
    );
    rules.push(
        MarkerSweep::new("feature-marker-sweep", FEATURE_MARKER)
            .expect("built-in pattern compiles"),
    );
    rules.push(Substitution::literal(
        "shared-generator-import",
        r#"from "../../../../components/shared/CodeGenerator""#,
        r#"from "../../../components/shared/CodeGenerator""#,
    ));
    rules.push(
        Substitution::pattern(
            "drop-active-tab-prop",
            ACTIVE_TAB_PROP,
            r#"<DynamicCodeExample componentName="${1}" />"#,
        )
        .expect("built-in pattern compiles"),
    );

    rules
}
