/* 📖 # Why parse comment blocks with a regex instead of a JavaScript parser?

Only the content of `/** ... */` blocks matters; the code around them is never
interpreted. A non-greedy regex finds the blocks in any JS-family file (and in the
output of the CoffeeScript transpiler) without pulling in a language grammar. Block
content is then unwrapped line by line into a description and `@title body`
annotations, keeping the relative indentation the YAML bodies depend on.
*/

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use swagdoc_base::FilePath;

use crate::model::{Annotation, Fragment};

static DOC_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*\*([\s\S]*?)\*/").expect("valid doc block pattern"));

static ANY_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*+([\s\S]*?)\*/").expect("valid block pattern"));

static ANNOTATION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@([A-Za-z0-9_-]+)(?:[ \t]+(.*))?$").expect("valid annotation pattern")
});

/// Which comment openers count as documentation blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// Only `/** ... */` blocks.
    DocComment,
    /// Any `/* ... */` block, used for transpiled sources.
    AnyComment,
}

/// Parses documentation comment blocks out of source text.
#[derive(Debug, Clone, Copy)]
pub struct CommentParser {
    style: BlockStyle,
}

impl CommentParser {
    /// Parser for `/** ... */` blocks.
    pub fn new() -> Self {
        Self::with_style(BlockStyle::DocComment)
    }

    pub fn with_style(style: BlockStyle) -> Self {
        Self { style }
    }

    /// Find every comment block in `text` and parse each into a fragment.
    ///
    /// Blocks are returned in source order. Text without blocks yields no fragments.
    pub fn parse(&self, source: &FilePath, text: &str) -> Vec<Fragment> {
        let pattern = match self.style {
            BlockStyle::DocComment => &*DOC_BLOCK,
            BlockStyle::AnyComment => &*ANY_BLOCK,
        };
        pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let block = caps.get(0)?;
                let content = caps.get(1)?;
                let line = text[..block.start()].matches('\n').count() + 1;
                trace!(%source, line, "found comment block");
                Some(parse_block(source.clone(), line, content.as_str()))
            })
            .collect()
    }
}

impl Default for CommentParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the comment decoration from one line: leading whitespace up to a `*`, the `*`
/// and at most one following space or tab. Lines without a leading `*` are kept as is.
fn unwrap_line(line: &str) -> &str {
    match line.trim_start().strip_prefix('*') {
        Some(rest) => rest.strip_prefix(|c| c == ' ' || c == '\t').unwrap_or(rest),
        None => line,
    }
}

/// Parse the content of one comment block (delimiters already removed).
pub fn parse_block(source: FilePath, line: usize, content: &str) -> Fragment {
    let mut fragment = Fragment::new(source, line);
    let mut description: Vec<&str> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for raw in content.lines() {
        let line = unwrap_line(raw);
        if let Some(caps) = ANNOTATION_START.captures(line.trim_start()) {
            if let Some((title, body)) = current.take() {
                fragment.annotations.push(Annotation::new(title, join_body(&body)));
            }
            let first = caps.get(2).map_or("", |m| m.as_str());
            current = Some((caps[1].to_string(), vec![first]));
        } else {
            match current.as_mut() {
                Some((_, body)) => body.push(line),
                None => description.push(line),
            }
        }
    }
    if let Some((title, body)) = current {
        fragment.annotations.push(Annotation::new(title, join_body(&body)));
    }
    fragment.description = join_body(&description);
    fragment
}

/// Join lines, dropping blank lines at either end, the space and tab indentation shared
/// by all non-blank lines and trailing whitespace on each line.
fn join_body(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };
    let lines = &lines[start..=end];
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| l.get(indent..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    fn parse(text: &str) -> Vec<Fragment> {
        CommentParser::new().parse(&FilePath::from("api.js"), text)
    }

    #[test]
    fn test_no_blocks() {
        assert!(parse("function login() { return 1; } // not a doc").is_empty());
        assert!(parse("/* plain block */").is_empty());
    }

    #[test]
    fn test_swagger_block() {
        let text = r#"
var x = 1;

/**
 * Login resource.
 *
 * @swagger
 * resourcePath: /login
 * description: All about API
 */
function login() {}
"#;
        let fragments = parse(text);
        assert_eq!(fragments.len(), 1);
        let fragment = &fragments[0];
        assert_eq!(fragment.line, 4);
        assert_eq!(fragment.description, "Login resource.");
        assert_eq!(fragment.annotations.len(), 1);
        assert_eq!(fragment.annotations[0].title, "swagger");
        assert_eq!(
            fragment.annotations[0].body,
            "resourcePath: /login\ndescription: All about API"
        );
    }

    #[test]
    fn test_nested_yaml_indentation_is_kept() {
        let text = r#"/**
 * @swagger
 * path: /login
 * operations:
 *   -  httpMethod: POST
 *      nickname: login
 *      parameters:
 *        - name: username
 *          paramType: form
 */"#;
        let fragments = parse(text);
        expect![[r#"
            path: /login
            operations:
              -  httpMethod: POST
                 nickname: login
                 parameters:
                   - name: username
                     paramType: form
        "#]]
        .assert_eq(&format!("{}\n", fragments[0].annotations[0].body));
    }

    #[test]
    fn test_multiple_annotations_and_blocks() {
        let text = r#"
/**
 * @param {String} id
 * @swagger first: 1
 * @swagger
 * second: 2
 */
/** @returns nothing */
"#;
        let fragments = parse(text);
        assert_eq!(fragments.len(), 2);
        let titles: Vec<&str> = fragments[0]
            .annotations
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, vec!["param", "swagger", "swagger"]);
        assert_eq!(fragments[0].annotations[0].body, "{String} id");
        assert_eq!(fragments[0].annotations[1].body, "first: 1");
        assert_eq!(fragments[0].annotations[2].body, "second: 2");

        assert_eq!(fragments[1].line, 8);
        assert_eq!(fragments[1].annotations[0].title, "returns");
        assert_eq!(fragments[1].annotations[0].body, "nothing");
    }

    #[test]
    fn test_any_comment_style() {
        let text = "/*\n@swagger\nresourcePath: /coffee\n*/";
        let parser = CommentParser::with_style(BlockStyle::AnyComment);
        let fragments = parser.parse(&FilePath::from("api.coffee"), text);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].annotations[0].body, "resourcePath: /coffee");

        assert!(parse(text).is_empty());
    }

    #[test]
    fn test_starless_block_keeps_relative_indentation() {
        let text = "/*\n    @swagger\n    models:\n      User:\n        id: User\n*/";
        let parser = CommentParser::with_style(BlockStyle::AnyComment);
        let fragments = parser.parse(&FilePath::from("api.coffee"), text);
        assert_eq!(
            fragments[0].annotations[0].body,
            "models:\n  User:\n    id: User"
        );
    }

    #[test]
    fn test_non_ascii_leading_space_is_kept() {
        let text = "/*\n@swagger\n\u{a0}a: x\n \u{a0}b: y\n*/";
        let parser = CommentParser::with_style(BlockStyle::AnyComment);
        let fragments = parser.parse(&FilePath::from("api.coffee"), text);
        assert_eq!(
            fragments[0].annotations[0].body,
            "\u{a0}a: x\n \u{a0}b: y"
        );
    }

    #[test]
    fn test_unwrap_line() {
        assert_eq!(unwrap_line("   * foo"), "foo");
        assert_eq!(unwrap_line("   *   indented"), "  indented");
        assert_eq!(unwrap_line("\t*\tbar"), "bar");
        assert_eq!(unwrap_line("  no star"), "  no star");
        assert_eq!(unwrap_line(" *"), "");
    }
}
