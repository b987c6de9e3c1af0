//! Text preparation and quantity assembly
//!
//! The input goes through two rewriting passes before matching: core
//! cleaning (typographic signs, joined multi-word numbers, language cleanup)
//! and spelled-number substitution. Each pass records an [`OffsetMap`] so
//! every match can be mapped back to an exact span of the caller's text.

use std::sync::OnceLock;
use regex::Regex;
use tracing::{debug, warn};
use quantex_core::Quantity;
use quantex_plugin::{BuildContext, LanguagePlugin};
use crate::cache::Snapshot;
use crate::grammar::Grammar;

/// Characters normalized before matching
const CORE_REPLACEMENTS: [(char, &str); 3] = [('×', "x"), ('–', "-"), ('−', "-")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edit {
    src: (usize, usize),
    dst: (usize, usize),
}

/// Byte offset mapping from an edited string back to its source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetMap {
    edits: Vec<Edit>,
}

impl OffsetMap {
    /// Apply `(start, end, replacement)` edits to `source`.
    ///
    /// Edits that overlap an earlier one, fall off a char boundary or
    /// replace text with itself are skipped.
    pub fn apply(source: &str, replacements: &[(usize, usize, String)]) -> (String, OffsetMap) {
        let mut sorted: Vec<&(usize, usize, String)> = replacements.iter().collect();
        sorted.sort_by_key(|(start, end, _)| (*start, *end));

        let mut out = String::with_capacity(source.len());
        let mut edits = Vec::new();
        let mut cursor = 0;
        for (start, end, new) in sorted {
            let (start, end) = (*start, *end);
            let valid = cursor <= start
                && start <= end
                && end <= source.len()
                && source.is_char_boundary(start)
                && source.is_char_boundary(end);
            if !valid || source[start..end] == **new {
                continue;
            }
            out.push_str(&source[cursor..start]);
            let dst_start = out.len();
            out.push_str(new);
            edits.push(Edit { src: (start, end), dst: (dst_start, out.len()) });
            cursor = end;
        }
        out.push_str(&source[cursor..]);
        (out, OffsetMap { edits })
    }

    /// Source offset of a span start; inside an edit maps to the edit's start
    pub fn start(&self, pos: usize) -> usize {
        match self.edits.iter().rev().find(|e| e.dst.0 <= pos) {
            None => pos,
            Some(e) if pos < e.dst.1 => e.src.0,
            Some(e) => e.src.1 + (pos - e.dst.1),
        }
    }

    /// Source offset of a span end; inside an edit maps to the edit's end
    pub fn end(&self, pos: usize) -> usize {
        match self.edits.iter().rev().find(|e| e.dst.0 < pos) {
            None => pos,
            Some(e) if pos <= e.dst.1 => e.src.1,
            Some(e) => e.src.1 + (pos - e.dst.1),
        }
    }
}

/// Input text ready for matching, with the way back to the original
#[derive(Debug, Clone)]
pub struct PreparedText<'a> {
    pub original: &'a str,
    /// Text the grammar runs on
    pub text: String,
    cleaning: OffsetMap,
    numbers: OffsetMap,
}

impl<'a> PreparedText<'a> {
    pub fn prepare(original: &'a str, plugin: &dyn LanguagePlugin, grammar: &Grammar) -> Self {
        let tables = plugin.tables();

        let replacements: Vec<(usize, usize, String)> = original
            .char_indices()
            .filter_map(|(i, c)| {
                CORE_REPLACEMENTS
                    .iter()
                    .find(|(from, _)| *from == c)
                    .map(|(_, to)| (i, i + c.len_utf8(), to.to_string()))
            })
            .collect();
        let (mut cleaned, cleaning) = OffsetMap::apply(original, &replacements);

        // same byte length, offsets unchanged
        for phrase in tables.multi_word_numbers() {
            if cleaned.contains(&phrase) {
                cleaned = cleaned.replace(&phrase, &phrase.replace(' ', "_"));
            }
        }

        let language_cleaned = plugin.clean_text(&cleaned);
        if language_cleaned.len() == cleaned.len() {
            cleaned = language_cleaned;
        } else {
            warn!(lang = plugin.meta().tag, "language cleanup changed text length, ignored");
        }

        let runs = grammar.number_runs(&cleaned);
        let substitutions = plugin.extract_spelled_numbers(&cleaned, &runs);
        let replacements: Vec<(usize, usize, String)> = substitutions
            .into_iter()
            .map(|s| (s.old_span.0, s.old_span.1, s.new_surface))
            .collect();
        let (text, numbers) = OffsetMap::apply(&cleaned, &replacements);

        PreparedText { original, text, cleaning, numbers }
    }

    /// Original substring and span for a match range in `text`, with
    /// trailing spaces and dashes and leading spaces removed
    pub fn surface(&self, start: usize, end: usize) -> Option<(String, (usize, usize))> {
        let from = self.cleaning.start(self.numbers.start(start));
        let to = self.cleaning.end(self.numbers.end(end)).max(from);
        let mut surface = self.original.get(from..to)?;
        let mut span = (from, to);

        while let Some(rest) = surface.strip_suffix(|c: char| c == ' ' || c == '-') {
            surface = rest;
            span.1 -= 1;
        }
        while let Some(rest) = surface.strip_prefix(' ') {
            surface = rest;
            span.0 += 1;
        }
        if surface.is_empty() {
            return None;
        }
        Some((surface.to_string(), span))
    }
}

fn quote_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"["'“”‘’][^ .,:;?!()*+\-].*?["'“”‘’]"#).unwrap())
}

/// True if a quoted passage of `original` closes inside `span`, as in
/// `'I ran 5'` where the closing quote reads as feet
pub fn is_quote_artifact(original: &str, span: (usize, usize)) -> bool {
    quote_regex()
        .find_iter(original)
        .any(|m| span.0 <= m.end() && m.end() <= span.1)
}

/// Every quantity in `original`, using a language snapshot
pub fn extract(snapshot: &Snapshot, original: &str) -> Vec<Quantity> {
    let plugin = snapshot.plugin.as_ref();
    let prepared = PreparedText::prepare(original, plugin, &snapshot.grammar);
    let engine = snapshot.dimensions();
    let mut out = Vec::new();

    for matched in snapshot.grammar.quantities(&prepared.text) {
        let resolved = match snapshot.values.resolve(matched.value.text) {
            Ok(v) => v,
            Err(e) => {
                warn!(surface = matched.as_str(), error = %e, "skipping match");
                continue;
            }
        };
        let resolution = engine.unit_for_match(&matched);
        let end = matched.end.saturating_sub(resolution.shortening);
        let Some((surface, span)) = prepared.surface(matched.start, end) else {
            warn!(surface = matched.as_str(), "cannot map match back to input");
            continue;
        };
        if is_quote_artifact(original, span) {
            debug!(surface = %surface, "quote artifact");
            continue;
        }

        let quantity = Quantity::new(
            resolved.value * resolution.multiplier,
            resolution.unit,
            surface,
            span,
            resolved.uncertainty.map(|u| u * resolution.multiplier),
            snapshot.lang.as_str(),
        );
        let ctx = BuildContext {
            original,
            text: &prepared.text,
            matched: &matched,
            dimensionless: snapshot.lexicon.units.dimensionless(),
        };
        match plugin.build_quantity(&ctx, quantity) {
            Some(built) => out.extend(built),
            None => debug!(surface = matched.as_str(), "dropped by language rules"),
        }
    }
    out
}
