//! address resolution
//!
//! HCL has no schema, so an address like `A.B.C` is ambiguous: `B` may be a label of block `A` or the type of a block
//! nested inside `A`. Telling them apart in the address would need some new syntax which nobody wants to type, so we
//! rely on a heuristic instead. The user knows what `B` is, so a block matching either way counts as matched. Having
//! both a label and a nested block type with the same name is written as `A.B.B.C`.
//!
//! Labels take precedence over nested blocks. Blocks of the same type usually carry the same number of labels and
//! only their values change, so a block whose labels only partially match is dropped and never searched for nested
//! blocks.
//!
//! **Example**
//!
//! ```hcl
//! resource "aws_instance" "foo" {
//!   ami = "x"
//!
//!   ebs_block_device {
//!     volume_size = 10
//!   }
//! }
//! ```
//!
//! | **address**                                               | **result**  |
//! |-----------------------------------------------------------|-------------|
//! | `resource.aws_instance.foo.ami`                           | `"x"`       |
//! | `resource.aws_instance.foo.ebs_block_device.volume_size`  | `10`        |
//! | `resource.aws_instance.ami`                               | not found   |
use crate::address::{Address, EmptyAddressError};
use crate::labels::longest_matching_labels;
use hcl_edit::structure::{Attribute, Block, BlockLabel, Body};

/// A matched attribute and the body that owns it
pub type AttributeLookup<'b> = (Option<&'b Attribute>, Option<&'b Body>);

/// Returns the first attribute matching `address`
///
/// Without a dot in the address the attribute is looked up directly in `body`. The owning body is returned even when
/// no such attribute exists, so callers can add it there.
///
/// Otherwise the last segment is the attribute name and the rest is resolved by [find_longest_matching_blocks].
/// Matched blocks are searched in order, the first one that has the attribute wins. Nothing matching is not an
/// error, it yields `(None, None)`.
pub fn find_attribute<'b>(
    body: &'b Body,
    address: &str,
) -> Result<AttributeLookup<'b>, EmptyAddressError> {
    let address = Address::parse(address)?;
    let (attribute_name, block_address) = address.split_attribute();

    if block_address.is_empty() {
        return Ok((get_attribute(body, attribute_name), Some(body)));
    }

    let blocks = find_longest_matching_blocks(body, block_address)?;
    tracing::debug!(
        address = %address.segments().join("."),
        matched = blocks.len(),
        "blocks matched"
    );

    let found = blocks.into_iter().find_map(|block| {
        get_attribute(&block.body, attribute_name).map(|attribute| (attribute, &block.body))
    });

    Ok(match found {
        Some((attribute, body)) => (Some(attribute), Some(body)),
        None => (None, None),
    })
}

/// Returns all blocks that longest-match the block `address`
///
/// The first segment is a block type. A bare type matches every block of that type regardless of labels. Further
/// segments consume the block's labels first. If all labels are consumed and segments are left, or the block has no
/// labels at all, the leftover segments are resolved against the block's body.
#[tracing::instrument(level = "trace", skip(body))]
pub fn find_longest_matching_blocks<'b>(
    body: &'b Body,
    address: &[&str],
) -> Result<Vec<&'b Block>, EmptyAddressError> {
    let Some((type_name, remaining)) = address.split_first() else {
        return Err(EmptyAddressError);
    };

    let blocks = all_matching_blocks_by_type(body, type_name);
    if remaining.is_empty() {
        return Ok(blocks);
    }

    let mut matched = vec![];
    for block in blocks {
        let labels: Vec<&str> = block.labels.iter().map(BlockLabel::as_str).collect();
        let matched_labels = longest_matching_labels(&labels, remaining);

        if matched_labels.len() < labels.len() {
            tracing::trace!(?labels, "labels partially matched, skipping block");
            continue;
        }

        if matched_labels.len() < remaining.len() || labels.is_empty() {
            let nested_address = &remaining[matched_labels.len()..];
            let nested = find_longest_matching_blocks(&block.body, nested_address)?;
            matched.extend(nested);
            continue;
        }

        matched.push(block);
    }

    Ok(matched)
}

/// Returns all direct child blocks of the given type, in document order
fn all_matching_blocks_by_type<'b>(body: &'b Body, type_name: &str) -> Vec<&'b Block> {
    body.blocks()
        .filter(|block| block.ident.value().as_str() == type_name)
        .collect()
}

/// First attribute with the given key
pub(crate) fn get_attribute<'b>(body: &'b Body, name: &str) -> Option<&'b Attribute> {
    body.attributes()
        .find(|attribute| attribute.key.value().as_str() == name)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::raw_value;
    use pretty_assertions::assert_eq;

    fn parse(hcl: &str) -> Body {
        hcl_edit::parser::parse_body(hcl).expect("body must parse")
    }

    /// Resolves `address` and renders the raw value, `None` when not found
    fn lookup(body: &Body, address: &str) -> Option<String> {
        let (attribute, _) = find_attribute(body, address).expect("valid address");
        attribute.map(|attribute| raw_value(attribute).expect("well formed attribute"))
    }

    fn block_names(blocks: &[&Block]) -> Vec<String> {
        blocks
            .iter()
            .map(|block| {
                std::iter::once(block.ident.value().as_str())
                    .chain(block.labels.iter().map(BlockLabel::as_str))
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .collect()
    }

    #[test]
    fn empty_address() {
        let body = parse("a = 1\n");
        assert!(matches!(
            find_attribute(&body, ""),
            Err(EmptyAddressError)
        ));
        assert!(matches!(
            find_longest_matching_blocks(&body, &[]),
            Err(EmptyAddressError)
        ));
    }

    #[test]
    fn top_level_attribute() {
        let body = parse("a = 1\nb = \"two\"\nblock { a = 3 }\n");
        let (attribute, owner) = find_attribute(&body, "b").unwrap();
        assert_eq!(attribute.map(|attr| attr.key.value().as_str()), Some("b"));
        assert!(std::ptr::eq(owner.unwrap(), &body));
        assert_eq!(lookup(&body, "a"), Some("1".to_owned()));
    }

    #[test]
    fn missing_top_level_attribute_still_returns_body() {
        let body = parse("a = 1\n");
        let (attribute, owner) = find_attribute(&body, "missing").unwrap();
        assert!(attribute.is_none());
        assert!(std::ptr::eq(owner.unwrap(), &body));
    }

    #[test]
    fn duplicate_attributes_first_wins() {
        use hcl_edit::{expr::Expression, Decorated, Ident};

        let mut body = Body::new();
        for value in ["1", "2"] {
            let value: Expression = value.parse().unwrap();
            body.push(Attribute::new(Decorated::new(Ident::new("a")), value));
        }
        assert_eq!(lookup(&body, "a"), Some("1".to_owned()));
    }

    #[test]
    fn bare_type_matches_all_blocks_of_type() {
        let body = parse(
            r#"
a "x" {}
b {}
a {}
a "y" "z" {}
"#,
        );
        let blocks = find_longest_matching_blocks(&body, &["a"]).unwrap();
        assert_eq!(block_names(&blocks), vec!["a.x", "a", "a.y.z"]);
    }

    #[test]
    fn first_matching_block_wins() {
        let body = parse(
            r#"
a {
  b = "1"
}
a {
  b = "2"
}
"#,
        );
        assert_eq!(lookup(&body, "a.b"), Some("\"1\"".to_owned()));
    }

    #[test]
    fn later_block_is_searched_when_first_lacks_attribute() {
        let body = parse(
            r#"
a "x" {
  v = 1
}
a "x" {
  w = 2
}
"#,
        );
        assert_eq!(lookup(&body, "a.x.w"), Some("2".to_owned()));
    }

    #[test]
    fn labels_fully_matched() {
        let body = parse(
            r#"
resource "aws_instance" "foo" {
  ami = "x"
}
resource "aws_instance" "bar" {
  ami = "y"
}
"#,
        );
        assert_eq!(
            lookup(&body, "resource.aws_instance.foo.ami"),
            Some("\"x\"".to_owned())
        );
        assert_eq!(
            lookup(&body, "resource.aws_instance.bar.ami"),
            Some("\"y\"".to_owned())
        );
    }

    #[test]
    fn identifier_labels_match_like_strings() {
        let body = parse("locals foo {\n  a = 1\n}\n");
        assert_eq!(lookup(&body, "locals.foo.a"), Some("1".to_owned()));
    }

    #[test]
    fn partial_label_match_is_discarded() {
        let body = parse(
            r#"
a "x" "y" {
  z {
    attr = 1
  }
}
"#,
        );
        let blocks = find_longest_matching_blocks(&body, &["a", "x", "z"]).unwrap();
        assert!(blocks.is_empty());
        assert_eq!(lookup(&body, "a.x.z.attr"), None);

        // address shorter than the labels
        let blocks = find_longest_matching_blocks(&body, &["a", "x"]).unwrap();
        assert!(blocks.is_empty());
    }

    #[test]
    fn unlabeled_block_falls_through_to_nested_blocks() {
        let body = parse(
            r#"
a {
  child {
    attr = "nested"
  }
}
"#,
        );
        let blocks = find_longest_matching_blocks(&body, &["a", "child"]).unwrap();
        assert_eq!(block_names(&blocks), vec!["child"]);
        assert_eq!(lookup(&body, "a.child.attr"), Some("\"nested\"".to_owned()));
    }

    #[test]
    fn leftover_segments_after_labels_search_nested_blocks() {
        let body = parse(
            r#"
resource "aws_instance" "foo" {
  ami = "x"

  ebs_block_device {
    volume_size = 10
  }
}
"#,
        );
        assert_eq!(
            lookup(&body, "resource.aws_instance.foo.ebs_block_device.volume_size"),
            Some("10".to_owned())
        );
        assert_eq!(lookup(&body, "resource.aws_instance.ami"), None);
    }

    #[test]
    fn label_and_nested_type_with_the_same_name() {
        let body = parse(
            r#"
a "b" {
  b {
    c = "nested"
  }
  c = "labeled"
}
"#,
        );
        assert_eq!(lookup(&body, "a.b.c"), Some("\"labeled\"".to_owned()));
        assert_eq!(lookup(&body, "a.b.b.c"), Some("\"nested\"".to_owned()));
    }

    #[test]
    fn matches_keep_candidate_then_recursion_order() {
        let body = parse(
            r#"
a {
  n "1" {}
  n "2" {}
}
a "n" {}
a {
  n "3" {}
}
"#,
        );
        let blocks = find_longest_matching_blocks(&body, &["a", "n"]).unwrap();
        assert_eq!(block_names(&blocks), vec!["n.1", "n.2", "a.n", "n.3"]);
    }

    #[test]
    fn unlabeled_block_with_single_remaining_segment_does_not_error() {
        // the nested address is never empty: an unlabeled block hands down the whole remainder
        let body = parse("a {\n  b = 1\n}\n");
        let blocks = find_longest_matching_blocks(&body, &["a", "b"]).unwrap();
        assert!(blocks.is_empty());
        assert_eq!(lookup(&body, "a.b"), Some("1".to_owned()));
    }

    #[test]
    fn missing_attribute_on_matched_block_is_not_found() {
        let body = parse("resource \"t\" \"n\" {\n  a = 1\n}\n");
        assert!(matches!(
            find_attribute(&body, "resource.t.n.b"),
            Ok((None, None))
        ));
        assert!(matches!(
            find_attribute(&body, "nothing.here"),
            Ok((None, None))
        ));
    }

    #[test]
    fn empty_segments_never_match() {
        let body = parse("a {\n  b = 1\n}\n");
        assert_eq!(lookup(&body, "a..b"), None);
        assert_eq!(lookup(&body, ".b"), None);
    }

    #[test]
    fn resolution_is_repeatable() {
        let body = parse(
            r#"
a "x" {
  v = 1
}
a {
  x {
    v = 2
  }
}
"#,
        );
        let first = find_longest_matching_blocks(&body, &["a", "x"]).unwrap();
        let second = find_longest_matching_blocks(&body, &["a", "x"]).unwrap();
        assert_eq!(block_names(&first), vec!["a.x", "x"]);
        assert!(first
            .iter()
            .zip(&second)
            .all(|(one, two)| std::ptr::eq(*one, *two)));
        assert_eq!(lookup(&body, "a.x.v"), lookup(&body, "a.x.v"));
    }
}
