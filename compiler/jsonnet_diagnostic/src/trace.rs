//! Runtime stack traces.

use crate::SourceMap;
use jsonnet_ir::Loc;

/// One frame of a runtime stack trace, innermost first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceFrame {
    pub loc: Option<Loc>,
    /// `function <f>`, `object <field>`, `import "x"`, or empty for the
    /// failing expression itself.
    pub description: String,
}

impl TraceFrame {
    pub fn new(loc: Option<Loc>, description: impl Into<String>) -> Self {
        TraceFrame {
            loc,
            description: description.into(),
        }
    }
}

/// Render frames as `location<TAB>description` lines.
///
/// When there are more than `max_trace` frames (and `max_trace` is
/// non-zero) the middle is replaced by a single `...` line, keeping the
/// innermost and outermost frames.
pub fn render_trace(frames: &[TraceFrame], sources: &SourceMap, max_trace: usize) -> Vec<String> {
    let line = |frame: &TraceFrame| {
        let loc = frame
            .loc
            .and_then(|l| sources.describe(l))
            .unwrap_or_else(|| "<builtin>".to_string());
        if frame.description.is_empty() {
            loc
        } else {
            format!("{loc}\t{}", frame.description)
        }
    };
    if max_trace == 0 || frames.len() <= max_trace {
        return frames.iter().map(line).collect();
    }
    let head = max_trace / 2;
    let tail = max_trace - head;
    let mut out: Vec<String> = frames[..head].iter().map(line).collect();
    out.push("...".to_string());
    out.extend(frames[frames.len() - tail..].iter().map(line));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonnet_ir::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_frames() {
        let mut map = SourceMap::new();
        let file = map.add("t.jsonnet", "f(1)");
        let frames = vec![
            TraceFrame::new(Some(Loc::new(file, Span::new(2, 3))), ""),
            TraceFrame::new(Some(Loc::new(file, Span::new(0, 4))), "function <f>"),
            TraceFrame::new(None, "function <map>"),
        ];
        assert_eq!(
            render_trace(&frames, &map, 20),
            vec![
                "t.jsonnet:1:3-4".to_string(),
                "t.jsonnet:1:1-5\tfunction <f>".to_string(),
                "<builtin>\tfunction <map>".to_string(),
            ]
        );
    }

    #[test]
    fn test_elides_middle() {
        let map = SourceMap::new();
        let frames: Vec<TraceFrame> = (0..10)
            .map(|i| TraceFrame::new(None, format!("f{i}")))
            .collect();
        let out = render_trace(&frames, &map, 4);
        assert_eq!(
            out,
            vec![
                "<builtin>\tf0".to_string(),
                "<builtin>\tf1".to_string(),
                "...".to_string(),
                "<builtin>\tf8".to_string(),
                "<builtin>\tf9".to_string(),
            ]
        );
        assert_eq!(render_trace(&frames, &map, 0).len(), 10);
    }
}
