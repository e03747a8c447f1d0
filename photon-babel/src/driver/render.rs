//! Marker-based indentation and final file layout.

use crate::backend::Lines;
use crate::error::TranspileError;

/// A line of target text and the block depth it is written at.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Line {
    pub depth: usize,
    pub text: String,
}

/// Block markers of the current backend.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Markers {
    pub open: &'static str,
    pub close: &'static str,
}

impl Markers {
    /// Assign depths to `lines`, starting at `depth` and leaving it after the last line.
    ///
    /// A line starting with the close marker is written one level out; a line ending with the
    /// open marker indents everything after it.
    pub fn layout(&self, lines: Lines, depth: &mut usize) -> Result<Vec<Line>, TranspileError> {
        let mut out = Vec::with_capacity(lines.len());
        for text in lines {
            if text.starts_with(self.close) {
                *depth = depth.checked_sub(1).ok_or_else(|| {
                    TranspileError::internal(format!("`{}` closes a block that was never opened", text))
                })?;
            }
            out.push(Line {
                depth: *depth,
                text: text.clone(),
            });
            if text.ends_with(self.open) {
                *depth += 1;
            }
        }
        Ok(out)
    }
}

/// The parts of a unit in output order.
pub(crate) struct Sections {
    pub header: Lines,
    pub out_of_main: Vec<Line>,
    pub start: Lines,
    pub body: Vec<Line>,
    pub end: Lines,
}

pub(crate) fn render(
    sections: Sections,
    markers: Markers,
    width: usize,
) -> Result<String, TranspileError> {
    let indent = |line: &Line, base: usize| {
        if line.text.is_empty() {
            String::new()
        } else {
            format!("{}{}", " ".repeat((line.depth + base) * width), line.text)
        }
    };

    let mut blocks: Vec<Lines> = Vec::new();
    blocks.push(sections.header);
    blocks.push(sections.out_of_main.iter().map(|l| indent(l, 0)).collect());

    let mut depth = 0;
    let start = markers.layout(sections.start, &mut depth)?;
    let base = depth;
    let end = markers.layout(sections.end, &mut depth)?;
    if depth != 0 {
        return Err(TranspileError::internal("boilerplate leaves a block open"));
    }
    let mut main: Lines = start.iter().map(|l| indent(l, 0)).collect();
    main.extend(sections.body.iter().map(|l| indent(l, base)));
    main.extend(end.iter().map(|l| indent(l, 0)));
    blocks.push(main);

    let text = blocks
        .into_iter()
        .filter(|block| !block.is_empty())
        .map(|block| block.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n");
    Ok(format!("{}\n", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRACES: Markers = Markers {
        open: "{",
        close: "}",
    };

    fn lines(items: &[&str]) -> Lines {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_layout_tracks_open_and_close() {
        let mut depth = 0;
        let out = BRACES
            .layout(
                lines(&["if (x) {", "a;", "} else {", "b;", "}"]),
                &mut depth,
            )
            .unwrap();
        let depths: Vec<usize> = out.iter().map(|l| l.depth).collect();
        assert_eq!(depths, vec![0, 1, 0, 1, 0]);
        assert_eq!(depth, 0);
    }

    #[test]
    fn test_unbalanced_close_is_internal_error() {
        let mut depth = 0;
        let err = BRACES.layout(lines(&["}"]), &mut depth).unwrap_err();
        assert!(matches!(err, TranspileError::Internal { .. }));
    }

    #[test]
    fn test_render_wraps_body_in_boilerplate() {
        let mut depth = 0;
        let body = BRACES
            .layout(lines(&["if (x) {", "y = 1;", "}"]), &mut depth)
            .unwrap();
        let sections = Sections {
            header: lines(&["#include <stdio.h>"]),
            out_of_main: Vec::new(),
            start: lines(&["int main(void) {"]),
            body,
            end: lines(&["return 0;", "}"]),
        };
        let text = render(sections, BRACES, 2).unwrap();
        assert_eq!(
            text,
            "#include <stdio.h>\n\nint main(void) {\n  if (x) {\n    y = 1;\n  }\n  return 0;\n}\n"
        );
    }
}
