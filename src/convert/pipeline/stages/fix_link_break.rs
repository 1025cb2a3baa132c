//! Link reference repair stage.
//!
//! Some editors wrap long link reference definitions after the colon,
//! producing `[ref]:\n  http://...`, which markdown renderers then fail to
//! recognize. This stage joins them back onto one line.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::convert::pipeline::{PipelineError, Stage};
use crate::convert::{Cell, Notebook, Resources};

/// Stage that rejoins link reference definitions broken before the URL.
///
/// Only markdown cells are touched.
pub struct FixLinkBreakStage;

impl Stage for FixLinkBreakStage {
    fn name(&self) -> &'static str {
        "fix_link_break"
    }

    fn process(
        &self,
        notebook: &mut Notebook,
        _resources: &mut Resources,
    ) -> Result<(), PipelineError> {
        for cell in &mut notebook.cells {
            let Cell::Markdown(markdown) = cell else {
                continue;
            };

            let fixed = match fix_link_breaks(&markdown.source) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(fixed) => fixed,
            };
            markdown.source = fixed;
        }

        Ok(())
    }
}

/// Replace every `]:` + newline + two spaces + `http` with `]: http`.
pub fn fix_link_breaks(source: &str) -> Cow<'_, str> {
    static LINK_BREAK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\]:\n  http").expect("valid regex"));

    LINK_BREAK_RE.replace_all(source, "]: http")
}
