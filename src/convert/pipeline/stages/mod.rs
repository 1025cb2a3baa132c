//! Default pipeline stages.
//!
//! The standard notebook preprocessing pipeline consists of:
//!
//! 1. **TagRemoveStage** - Remove cells, inputs, and outputs by tag
//! 2. **RemoveMagicStage** - Strip the cell magic line and the line after it
//! 3. **FixLinkBreakStage** - Rejoin `[ref]:` definitions broken before the URL
//! 4. **ArticleMetadataStage** - Prepend a YAML front matter cell

mod article_metadata;
mod fix_link_break;
mod remove_magic;
mod tag_remove;

pub use article_metadata::ArticleMetadataStage;
pub use fix_link_break::FixLinkBreakStage;
pub use remove_magic::RemoveMagicStage;
pub use tag_remove::TagRemoveStage;
