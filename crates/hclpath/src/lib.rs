//! # hclpath - address based attribute lookup for hcl
//!
//! ## Introduction for developers
//!
//! Read this to understand how `hclpath` works internally.
//!
//! ### HCL Terms
//!
//! In hcl terms...
//! - a file gets parsed as a `body`
//! - ...which is just a list of `structures`
//! - ...where there are two kinds:
//!   - `attribute`: a "key = value" pair
//!   - or `block`:
//!     - 1 `identifier` (the block type)
//!     - followed by 0 or more `labels`
//!     - and a `body` enclosed in `{` and `}`
//!
//! Parsing and writing is done by [hcl_edit]. It keeps whitespace and comments around each node, which lets us hand
//! out values exactly as they were written.
//!
//! ### Addresses
//!
//! see [address::Address]
//!
//! An address is a list of segments separated by `.`. The last segment names an attribute, everything before it
//! addresses blocks: `resource.aws_instance.foo.ami`.
//!
//! ### Resolving
//!
//! see [resolve::find_attribute] and [resolve::find_longest_matching_blocks]
//!
//! Without a schema a segment after the block type can be a label or the type of a nested block. Labels are tried
//! first ([labels::longest_matching_labels]), a block whose labels only partially match is dropped. Blocks without
//! labels, or with segments left over after all labels matched, are searched for nested blocks.
//!
//! Matching never fails for lack of a match. Not finding anything is an empty result, errors are reserved for empty
//! addresses and malformed attributes.
//!
//! ### Values
//!
//! see [value::raw_value]
//!
//! Values are not evaluated. We flatten the attribute into [token::Tokens] and take the text between `=` and the
//! first comment.
//!
//! ### Output
//!
//! [editor::Editor] glues it together: parse, filter down to the addressed attribute, render it as raw text, hcl,
//! json or yaml.
//!
pub mod address;
pub mod editor;
pub mod labels;
pub mod resolve;
pub mod token;
pub mod value;
