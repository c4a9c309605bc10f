//! Dictionary link-outs for lemma annotations.

use serde::Serialize;

use crate::text::{AnnotatedText, AnnotationData, AnnotationKind};

/// Online dictionaries a lemma can be looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DictionarySite {
    Weblio,
    Alc,
    Goo,
    Tangorin,
}

impl DictionarySite {
    pub const ALL: [Self; 4] = [Self::Weblio, Self::Alc, Self::Goo, Self::Tangorin];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Weblio => "Weblio",
            Self::Alc => "ALC",
            Self::Goo => "goo",
            Self::Tangorin => "Tangorin",
        }
    }

    /// Lookup URL for `lemma`, percent-encoded
    #[must_use]
    pub fn lookup_url(&self, lemma: &str) -> String {
        let enc = urlencoding::encode(lemma);
        match self {
            Self::Weblio => format!("http://ejje.weblio.jp/content/{enc}"),
            Self::Alc => format!("http://eow.alc.co.jp/search?q={enc}"),
            Self::Goo => format!("http://dictionary.goo.ne.jp/srch/all/{enc}/m0u/"),
            Self::Tangorin => format!("http://tangorin.com/general/{enc}"),
        }
    }
}

/// A lemma under the selection with its lookup links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LemmaLinks {
    pub lemma: String,
    pub cp_begin: usize,
    pub cp_end: usize,
    pub links: Vec<(DictionarySite, String)>,
}

/// Links for every lemma annotation intersecting `[begin, end)`
#[must_use]
pub fn lemma_links(text: &AnnotatedText, begin: usize, end: usize) -> Vec<LemmaLinks> {
    text.get_kind_in_range(&AnnotationKind::Lemma, begin, end)
        .into_iter()
        .filter_map(|a| match &a.data {
            AnnotationData::Lemma(lemma) => Some(LemmaLinks {
                lemma: lemma.clone(),
                cp_begin: a.cp_begin,
                cp_end: a.cp_end,
                links: DictionarySite::ALL
                    .iter()
                    .map(|site| (*site, site.lookup_url(lemma)))
                    .collect(),
            }),
            _ => None,
        })
        .collect()
}
