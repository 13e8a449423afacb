use std::collections::BTreeMap;

use super::{ParseError, Segment, SegmentKind};

/// The user-specified values extracted from an ID, keyed by segment name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResourceId {
    values: BTreeMap<&'static str, String>,
}

impl ParsedResourceId {
    pub fn get(&self, segment: &str) -> Option<&str> {
        self.values.get(segment).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Splits and matches resource IDs against a segment list.
///
/// Static and provider segments compare exactly unless the parser was built
/// with [`Parser::insensitive`], in which case only their casing is
/// relaxed; user-specified values are always returned as written.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    segments: &'a [Segment],
    insensitive: bool,
}

impl<'a> Parser<'a> {
    pub fn new(segments: &'a [Segment]) -> Self {
        Self {
            segments,
            insensitive: false,
        }
    }

    pub fn insensitive(segments: &'a [Segment]) -> Self {
        Self {
            segments,
            insensitive: true,
        }
    }

    pub fn parse(&self, input: &str) -> Result<ParsedResourceId, ParseError> {
        let components = split_components(input);
        let mut parsed = ParsedResourceId::default();

        match self
            .segments
            .iter()
            .position(|s| s.kind == SegmentKind::Scope)
        {
            Some(scope_index) => {
                self.parse_scoped(input, &components, scope_index, &mut parsed)?
            }
            None => {
                self.match_positional(input, self.segments, &components, &mut parsed)?;
                if let Some(extra) = components.get(self.segments.len()) {
                    return Err(ParseError::UnexpectedSegment {
                        segment: (*extra).to_string(),
                        id: input.to_string(),
                    });
                }
            }
        }

        Ok(parsed)
    }

    fn match_positional(
        &self,
        input: &str,
        segments: &[Segment],
        components: &[&str],
        parsed: &mut ParsedResourceId,
    ) -> Result<(), ParseError> {
        for (index, segment) in segments.iter().enumerate() {
            let component = components
                .get(index)
                .filter(|c| segment.matches(c, self.insensitive))
                .ok_or_else(|| not_found(segment, input))?;
            if !segment.is_fixed() {
                parsed.values.insert(segment.name, (*component).to_string());
            }
        }
        Ok(())
    }

    // The scope absorbs however many components are left once the fixed
    // prefix and suffix are accounted for. When no alignment matches, the
    // error names the segment at which the best alignment stopped matching.
    fn parse_scoped(
        &self,
        input: &str,
        components: &[&str],
        scope_index: usize,
        parsed: &mut ParsedResourceId,
    ) -> Result<(), ParseError> {
        let prefix = &self.segments[..scope_index];
        let scope = &self.segments[scope_index];
        let suffix = &self.segments[scope_index + 1..];

        self.match_positional(input, prefix, components, parsed)?;

        let rest = &components[prefix.len()..];
        if rest.is_empty() {
            return Err(not_found(scope, input));
        }

        let mut best: Option<(usize, usize)> = None;
        for scope_len in 1..=rest.len() {
            let tail = &rest[scope_len..];
            if tail.len() > suffix.len() {
                continue;
            }

            let matched = suffix
                .iter()
                .zip(tail)
                .take_while(|(segment, component)| segment.matches(component, self.insensitive))
                .count();

            if matched == suffix.len() && tail.len() == suffix.len() {
                let scope_components = &rest[..scope_len];
                if scope_components.iter().any(|c| c.is_empty()) {
                    return Err(not_found(scope, input));
                }
                parsed
                    .values
                    .insert(scope.name, format!("/{}", scope_components.join("/")));
                return self.match_positional(input, suffix, tail, parsed);
            }

            if best.is_none_or(|(best_matched, _)| matched > best_matched) {
                best = Some((matched, scope_len));
            }
        }

        let missing = best
            .and_then(|(matched, _)| suffix.get(matched))
            .unwrap_or(scope);
        Err(not_found(missing, input))
    }
}

fn split_components(input: &str) -> Vec<&str> {
    let trimmed = input.strip_prefix('/').unwrap_or(input);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

fn not_found(segment: &Segment, input: &str) -> ParseError {
    ParseError::SegmentNotFound {
        segment: segment.name,
        id: input.to_string(),
    }
}

/// Renders segment values into the canonical, correctly cased path.
pub fn format_segments<'v>(
    segments: &[Segment],
    value: impl Fn(&'static str) -> Option<&'v str>,
) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        match segment.kind {
            SegmentKind::Static(literal) | SegmentKind::ResourceProvider(literal) => {
                out.push_str(literal)
            }
            SegmentKind::Scope => {
                out.push_str(value(segment.name).unwrap_or_default().trim_start_matches('/'))
            }
            _ => out.push_str(value(segment.name).unwrap_or_default()),
        }
    }
    out
}
