//! Property tests: every query is checked against a brute-force oracle.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use glosstrack::render::{fragments, render, render_plain, RenderNode};
use glosstrack::{
    AnnoError, AnnotatedText, AnnotationData, AnnotationKind, ChunkSet, HighlightMark,
    TimeRangeChunk,
};

const ALPHABET: &[char] = &['a', 'b', ' ', '\n', '漢', '字', 'か', 'ナ', '😀'];

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(ALPHABET), 0..24)
        .prop_map(|chars| chars.into_iter().collect())
}

fn data_for(kind: u8, n: usize) -> AnnotationData {
    match kind % 4 {
        0 => AnnotationData::Ruby(format!("r{n}")),
        1 => AnnotationData::Lemma(format!("l{n}")),
        2 => {
            let at = Utc
                .timestamp_millis_opt(1_700_000_000_000 + n as i64)
                .single()
                .expect("valid timestamp");
            AnnotationData::Highlight(HighlightMark::new(format!("set{}", n % 2), at))
        }
        _ => AnnotationData::Custom {
            kind: "note".into(),
            value: serde_json::json!({ "n": n }),
        },
    }
}

/// Text plus annotations whose ranges are scaled into the text
fn annotated_strategy() -> impl Strategy<Value = AnnotatedText> {
    (
        text_strategy(),
        prop::collection::vec((0usize..100, 0usize..100, any::<u8>()), 0..8),
    )
        .prop_map(|(raw, specs)| {
            let mut text = AnnotatedText::new(raw.as_str());
            let len = text.len();
            for (n, (x, y, kind)) in specs.into_iter().enumerate() {
                let (a, b) = (x % (len + 1), y % (len + 1));
                text = text
                    .add_annotation(a.min(b), a.max(b), data_for(kind, n))
                    .unwrap();
            }
            text
        })
}

/// Random chunks; about a third start exactly where the previous one ends
fn chunk_set_strategy() -> impl Strategy<Value = ChunkSet> {
    prop::collection::vec((0u32..60_000, 0u32..8_000, any::<u8>()), 0..16).prop_map(|specs| {
        let mut previous_end_ms = None;
        let chunks = specs
            .into_iter()
            .enumerate()
            .map(|(n, (begin_ms, len_ms, snap))| {
                let begin_ms = match previous_end_ms {
                    Some(end) if snap % 3 == 0 => end,
                    _ => begin_ms,
                };
                let end_ms = begin_ms + len_ms;
                previous_end_ms = Some(end_ms);
                TimeRangeChunk::new(
                    f64::from(begin_ms) / 1000.0,
                    f64::from(end_ms) / 1000.0,
                    AnnotatedText::new(format!("line {n}")),
                )
                .unwrap()
            })
            .collect();
        ChunkSet::new(chunks).unwrap()
    })
}

fn check_nesting(nodes: &[RenderNode<'_>], lo: usize, hi: usize) {
    for node in nodes {
        match node {
            RenderNode::Char { index, .. } | RenderNode::Break { index } => {
                assert!(lo <= *index && *index < hi);
            }
            RenderNode::Wrap {
                annotation,
                cp_begin,
                cp_end,
                children,
            } => {
                assert!(lo <= *cp_begin && *cp_end <= hi && cp_begin < cp_end);
                assert!(annotation.cp_begin <= *cp_begin && *cp_end <= annotation.cp_end);
                check_nesting(children, *cp_begin, *cp_end);
            }
        }
    }
}

proptest! {
    #[test]
    fn add_succeeds_exactly_for_valid_ranges(raw in text_strategy(), begin in 0usize..30, end in 0usize..30) {
        let text = AnnotatedText::new(raw.as_str());
        let result = text.add_annotation(begin, end, AnnotationData::Ruby("x".into()));
        if begin <= end && end <= text.len() {
            let next = result.unwrap();
            prop_assert_eq!(next.annotations().len(), 1);
            prop_assert!(text.annotations().is_empty());
        } else {
            let is_out_of_range = matches!(result, Err(AnnoError::OutOfRange { .. }));
            prop_assert!(is_out_of_range);
        }
    }

    #[test]
    fn range_query_matches_brute_force(text in annotated_strategy(), x in 0usize..30, y in 0usize..30) {
        let (begin, end) = (x.min(y), x.max(y));
        let mut got: Vec<_> = text.get_in_range(begin, end).iter().map(|a| a.id).collect();
        let mut want: Vec<_> = text
            .annotations()
            .iter()
            .filter(|a| a.cp_begin < end && a.cp_end > begin)
            .map(|a| a.id)
            .collect();
        got.sort();
        want.sort();
        prop_assert_eq!(got, want);

        let hits = text.get_in_range(begin, end);
        prop_assert!(hits.windows(2).all(|w| (w[0].cp_begin, w[0].cp_end) <= (w[1].cp_begin, w[1].cp_end)));
    }

    #[test]
    fn clearing_removes_only_that_kind(text in annotated_strategy(), x in 0usize..30, y in 0usize..30) {
        let (begin, end) = (x.min(y), x.max(y));
        let cleared = text.clear_kind_in_range(begin, end, &AnnotationKind::Ruby);

        prop_assert!(cleared.get_kind_in_range(&AnnotationKind::Ruby, begin, end).is_empty());
        let non_ruby = |t: &AnnotatedText| {
            t.annotations().iter().filter(|a| a.kind() != AnnotationKind::Ruby).count()
        };
        prop_assert_eq!(non_ruby(&cleared), non_ruby(&text));
        prop_assert_eq!(cleared.text(), text.text());
    }

    #[test]
    fn portable_round_trip(text in annotated_strategy()) {
        let json = serde_json::to_string(&text.to_portable().unwrap()).unwrap();
        let back = AnnotatedText::from_portable(serde_json::from_str(&json).unwrap()).unwrap();
        prop_assert_eq!(back, text);
    }

    #[test]
    fn render_is_complete_and_well_nested(text in annotated_strategy()) {
        let nodes = render(&text);
        prop_assert_eq!(render_plain(&nodes), text.text().to_string());
        check_nesting(&nodes, 0, text.len());

        let frags = fragments(&nodes);
        for annotation in text.annotations() {
            if annotation.cp_begin == annotation.cp_end {
                prop_assert!(!frags.contains_key(&annotation.id));
                continue;
            }
            let pieces = &frags[&annotation.id];
            prop_assert_eq!(pieces.first().map(|p| p.0), Some(annotation.cp_begin));
            prop_assert_eq!(pieces.last().map(|p| p.1), Some(annotation.cp_end));
            prop_assert!(pieces.windows(2).all(|w| w[0].1 == w[1].0));
        }
    }

    #[test]
    fn time_lookup_matches_brute_force(set in chunk_set_strategy(), t_ms in 0u32..70_000, pick in any::<prop::sample::Index>()) {
        // Half the cases land exactly on a chunk boundary
        let boundaries: Vec<f64> = set.iter().flat_map(|c| [c.range().begin, c.range().end]).collect();
        let t = if t_ms % 2 == 0 && !boundaries.is_empty() {
            boundaries[pick.index(boundaries.len())]
        } else {
            f64::from(t_ms) / 1000.0
        };
        let got: Vec<_> = set.get_chunks_at_time(t).iter().map(|c| c.uid()).collect();
        let want: Vec<_> = set.iter().filter(|c| c.range().contains(t)).map(|c| c.uid()).collect();
        prop_assert_eq!(&got, &want);
        prop_assert_eq!(set.get_last_chunk_at_time(t).map(|c| c.uid()), want.last().copied());
    }

    #[test]
    fn range_lookup_matches_brute_force(set in chunk_set_strategy(), x in 0u32..70_000, y in 0u32..70_000) {
        let (begin, end) = (f64::from(x.min(y)) / 1000.0, f64::from(x.max(y)) / 1000.0);
        let got: Vec<_> = set.get_chunks_in_range(begin, end).iter().map(|c| c.uid()).collect();
        let want: Vec<_> = set
            .iter()
            .filter(|c| c.range().intersects(begin, end))
            .map(|c| c.uid())
            .collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn text_edit_keeps_lookups(set in chunk_set_strategy(), t_ms in 0u32..70_000) {
        let t = f64::from(t_ms) / 1000.0;
        let Some(first) = set.iter().next() else { return Ok(()); };
        let edited = set
            .set_chunk_anno_text(first.uid(), AnnotatedText::new("edited"))
            .unwrap();

        let ids = |s: &ChunkSet| s.get_chunks_at_time(t).iter().map(|c| c.uid()).collect::<Vec<_>>();
        prop_assert_eq!(ids(&edited), ids(&set));
        prop_assert_eq!(edited.get(first.uid()).unwrap().anno_text().text().to_string(), "edited");
        prop_assert_eq!(set.get(first.uid()).unwrap().anno_text(), first.anno_text());
    }
}
