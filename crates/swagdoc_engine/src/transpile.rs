/* 📖 # Why a line-based CoffeeScript transpiler?

CoffeeScript sources document their routes in `###` block comments, which the
CoffeeScript compiler turns into `/* */` blocks. swagdoc only needs that one rewrite,
so instead of compiling the whole file it rewrites block comments in place and passes
every other line through unchanged. Line numbers therefore stay identical to the
original file. A block comment that is never closed means the file would not compile,
and is reported as a Transpile error.
*/

use swagdoc_base::error::ErrorKind;
use swagdoc_base::{FilePath, SwagdocError, SwagdocResult};

const BLOCK_DELIMITER: &str = "###";

/// Returns the text after an opening `###`, or None if the line does not open a block.
///
/// `####` and longer runs are ordinary line comments in CoffeeScript.
fn block_opener(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix(BLOCK_DELIMITER)?;
    if rest.starts_with('#') {
        return None;
    }
    Some(rest)
}

/// Rewrite CoffeeScript `### ... ###` block comments into `/* ... */` blocks.
pub fn transpile_coffee(path: &FilePath, text: &str) -> SwagdocResult<String> {
    let mut output = Vec::new();
    let mut open_line: Option<usize> = None;

    for (idx, line) in text.lines().enumerate() {
        match open_line {
            None => match block_opener(line) {
                Some(rest) => match rest.find(BLOCK_DELIMITER) {
                    Some(end) => output.push(format!("/*{}*/", &rest[..end])),
                    None => {
                        output.push(format!("/*{}", rest));
                        open_line = Some(idx + 1);
                    }
                },
                None => output.push(line.to_string()),
            },
            Some(_) => match line.find(BLOCK_DELIMITER) {
                Some(end) => {
                    output.push(format!("{}*/", &line[..end]));
                    open_line = None;
                }
                None => output.push(line.to_string()),
            },
        }
    }

    if let Some(line) = open_line {
        return Err(Box::new(SwagdocError::new(ErrorKind::Transpile {
            path: path.to_string(),
            message: format!("block comment opened on line {} is never closed", line),
        })));
    }
    Ok(output.join("\n"))
}
