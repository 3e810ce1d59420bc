use crate::error::Result;
use crate::logic::{Logic, LogicKind};
use crate::membership::Membership;
use crate::stock::Stock;

/// One node's contribution to a trace: nesting depth, the label shown left
/// of the arrow, and the count/percentage its vector produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceLine {
    pub depth: usize,
    pub label: String,
    pub count: u64,
    pub percent: f64,
}

/// Structured trace of one expression: ordered lines plus the overall
/// count/percentage annotation a top-level implicit conjunction carries.
///
/// This is data, not text; [`render_trace`] is the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicTrace {
    pub lines: Vec<TraceLine>,
    pub overall: Option<(u64, f64)>,
}

/// Mirrors the evaluator's reduction while recording per-node trace lines.
///
/// No caching on this path: trace text is call-specific, and the resulting
/// vector must still match the evaluator bit for bit on shared inputs.
pub struct Reporter<'a> {
    stock: &'a Stock,
}

impl<'a> Reporter<'a> {
    pub fn new(stock: &'a Stock) -> Self {
        Self { stock }
    }

    pub fn trace(&self, logic: &Logic) -> Result<(Membership, LogicTrace)> {
        let (membership, lines) = self.walk(logic, 0)?;
        let overall = match logic.kind() {
            LogicKind::And {
                children,
                implicit: true,
            } if children.len() > 1 => Some((membership.count(), membership.percent())),
            _ => None,
        };
        Ok((membership, LogicTrace { lines, overall }))
    }

    fn walk(&self, logic: &Logic, depth: usize) -> Result<(Membership, Vec<TraceLine>)> {
        match logic.kind() {
            LogicKind::Leaf { parameter, option } => {
                let membership = self.stock.matching(parameter, option)?;
                let line = TraceLine {
                    depth,
                    label: format!("{parameter}|{option}"),
                    count: membership.count(),
                    percent: membership.percent(),
                };
                Ok((membership, vec![line]))
            }
            LogicKind::And { children, implicit } => {
                // an implicit conjunction has no header line of its own, so
                // its children stay at the current depth
                let child_depth = if *implicit { depth } else { depth + 1 };
                let mut combined = Membership::all(self.stock.total_samples());
                let mut lines = Vec::new();
                for child in children {
                    let (membership, child_lines) = self.walk(child, child_depth)?;
                    combined.intersect_with(&membership);
                    lines.extend(child_lines);
                }
                if *implicit {
                    Ok((combined, lines))
                } else {
                    let mut headed = vec![TraceLine {
                        depth,
                        label: "and".to_string(),
                        count: combined.count(),
                        percent: combined.percent(),
                    }];
                    headed.extend(lines);
                    Ok((combined, headed))
                }
            }
            LogicKind::Or { children } => {
                let mut combined = Membership::none(self.stock.total_samples());
                let mut lines = Vec::new();
                for child in children {
                    let (membership, child_lines) = self.walk(child, depth + 1)?;
                    combined.union_with(&membership);
                    lines.extend(child_lines);
                }
                let mut headed = vec![TraceLine {
                    depth,
                    label: "or".to_string(),
                    count: combined.count(),
                    percent: combined.percent(),
                }];
                headed.extend(lines);
                Ok((combined, headed))
            }
            LogicKind::Not { child } => {
                let (mut membership, child_lines) = self.walk(child, depth + 1)?;
                membership.invert();
                // the header shows the post-inversion count
                let mut headed = vec![TraceLine {
                    depth,
                    label: "not".to_string(),
                    count: membership.count(),
                    percent: membership.percent(),
                }];
                headed.extend(child_lines);
                Ok((membership, headed))
            }
        }
    }
}

/// Render trace lines to the indented report form, two spaces per depth.
/// The overall annotation, when present, lands on the first rendered line.
pub fn render_trace(trace: &LogicTrace) -> Vec<String> {
    let mut rendered: Vec<String> = trace
        .lines
        .iter()
        .map(|line| {
            format!(
                "{}{} => {} ({:.1}%)",
                "  ".repeat(line.depth),
                line.label,
                line.count,
                line.percent
            )
        })
        .collect();
    if let Some((count, percent)) = trace.overall {
        if let Some(first) = rendered.first_mut() {
            *first = format!("{first} => {count} ({percent:.1}%)");
        }
    }
    rendered
}
