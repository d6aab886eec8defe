//! The built-in keyword table and default field lists.

use crate::{FieldSpec, KeywordKind, KeywordSpec, KeywordTable, MatchMode};

/// A static field entry: name, boost, match mode.
type StaticField = (&'static str, f32, MatchMode);

/// A static keyword entry.
struct StaticKeyword {
    /// Canonical keyword.
    keyword: &'static str,
    /// Compilation kind.
    kind: KeywordKind,
    /// Backend fields.
    fields: &'static [StaticField],
    /// Additional spellings (the canonical name is always an alias).
    aliases: &'static [&'static str],
}

/// Shorthand for an unboosted, analyzed field.
const fn f(name: &'static str) -> StaticField {
    (name, 1.0, MatchMode::Default)
}

/// Shorthand for an unboosted phrase field.
const fn p(name: &'static str) -> StaticField {
    (name, 1.0, MatchMode::Phrase)
}

/// Fields searched by free-text queries, with their boosts.
const FREE_TEXT_FIELDS: &[(&str, f32)] = &[
    ("title", 3.0),
    ("title.raw", 10.0),
    ("abstract", 2.0),
    ("abstract.raw", 4.0),
    ("author", 10.0),
    ("author.raw", 15.0),
    ("reportnumber", 10.0),
    ("eprint", 10.0),
    ("doi", 10.0),
];

/// Record locations that may carry a record's date.
const DATE_FIELDS: &[StaticField] = &[
    f("imprints.date"),
    f("preprint_date"),
    f("thesis_info.date"),
    f("publication_info.year"),
];

/// Publication info fields searched by the journal keyword.
const JOURNAL_FIELDS: &[StaticField] = &[
    f("publication_info.journal_title"),
    f("publication_info.journal_volume"),
    f("publication_info.journal_issue"),
    f("publication_info.journal_record"),
    f("publication_info.artid"),
    f("publication_info.page_start"),
    f("publication_info.page_end"),
    f("publication_info.year"),
    f("publication_info.cnum"),
    f("publication_info.conference_record"),
    f("publication_info.parent_record"),
    f("publication_info.pubinfo_freetext"),
    f("publication_info.material"),
];

/// The built-in keywords.
const KEYWORDS: &[StaticKeyword] = &[
    StaticKeyword {
        keyword: "abstract",
        kind: KeywordKind::Text,
        fields: &[f("abstracts.value")],
        aliases: &["abstracts", "abs", "ab"],
    },
    StaticKeyword {
        keyword: "affiliation",
        kind: KeywordKind::Text,
        fields: &[f("authors.affiliations.value")],
        aliases: &[
            "affiliations",
            "affil",
            "aff",
            "af",
            "institution",
            "inst",
            "instit",
            "ins",
        ],
    },
    StaticKeyword {
        keyword: "author",
        kind: KeywordKind::Author,
        fields: &[f("authors.full_name"), f("authors.name_variations")],
        aliases: &["authors", "au", "a", "name", "aut", "auth"],
    },
    StaticKeyword {
        keyword: "first-author",
        kind: KeywordKind::Author,
        fields: &[
            f("first_author.full_name"),
            f("first_author.name_variations"),
        ],
        aliases: &["firstauthor", "first_author", "fa", "fau"],
    },
    StaticKeyword {
        keyword: "exact-author",
        kind: KeywordKind::Text,
        fields: &[p("authors.full_name")],
        aliases: &["exactauthor", "exact_author", "ea", "eau"],
    },
    StaticKeyword {
        keyword: "author-id",
        kind: KeywordKind::Text,
        fields: &[p("authors.ids.value")],
        aliases: &["authorid", "author_id", "bai", "orcid", "aid"],
    },
    StaticKeyword {
        keyword: "author-count",
        kind: KeywordKind::Numeric,
        fields: &[f("author_count")],
        aliases: &["authorcount", "author_count", "ac"],
    },
    StaticKeyword {
        keyword: "collaboration",
        kind: KeywordKind::Text,
        fields: &[f("collaborations.value")],
        aliases: &["collaborations", "collab", "cn", "coll"],
    },
    StaticKeyword {
        keyword: "control_number",
        kind: KeywordKind::Numeric,
        fields: &[f("control_number")],
        aliases: &["control-number", "recid", "id"],
    },
    StaticKeyword {
        keyword: "irn",
        kind: KeywordKind::Text,
        fields: &[p("external_system_identifiers.value")],
        aliases: &["key", "spires-id"],
    },
    StaticKeyword {
        keyword: "refersto",
        kind: KeywordKind::Numeric,
        fields: &[f("references.recid")],
        aliases: &["refersto:recid", "ref"],
    },
    StaticKeyword {
        keyword: "topcite",
        kind: KeywordKind::Numeric,
        fields: &[f("citation_count")],
        aliases: &[
            "topcit",
            "cited",
            "citations",
            "citation-count",
            "citation_count",
        ],
    },
    StaticKeyword {
        keyword: "topcite-excluding-self",
        kind: KeywordKind::Numeric,
        fields: &[f("citation_count_without_self_citations")],
        aliases: &[
            "topcitex",
            "cx",
            "citedexcludingselfcites",
            "citedx",
            "citation-count-without-self-citations",
        ],
    },
    StaticKeyword {
        keyword: "date",
        kind: KeywordKind::Date,
        fields: DATE_FIELDS,
        aliases: &["d", "year", "dt", "yr"],
    },
    StaticKeyword {
        keyword: "date-added",
        kind: KeywordKind::Date,
        fields: &[f("_created")],
        aliases: &["dateadded", "dadd", "da"],
    },
    StaticKeyword {
        keyword: "date-updated",
        kind: KeywordKind::Date,
        fields: &[f("_updated")],
        aliases: &["dateupdated", "dupd", "du"],
    },
    StaticKeyword {
        keyword: "date-earliest",
        kind: KeywordKind::Date,
        fields: &[f("earliest_date")],
        aliases: &["earliest-date", "earliest_date", "de"],
    },
    StaticKeyword {
        keyword: "doi",
        kind: KeywordKind::Text,
        fields: &[p("dois.value")],
        aliases: &["dois"],
    },
    StaticKeyword {
        keyword: "eprint",
        kind: KeywordKind::Text,
        fields: &[f("arxiv_eprints.value")],
        aliases: &["eprints", "arxiv", "arxiv_eprints", "bb", "bull", "e"],
    },
    StaticKeyword {
        keyword: "arxiv-category",
        kind: KeywordKind::Text,
        fields: &[f("arxiv_eprints.categories")],
        aliases: &["arxiv_categories", "arxiv-categories", "primarch"],
    },
    StaticKeyword {
        keyword: "experiment",
        kind: KeywordKind::Text,
        fields: &[f("accelerator_experiments.legacy_name")],
        aliases: &["experiments", "exp", "expt"],
    },
    StaticKeyword {
        keyword: "journal",
        kind: KeywordKind::Text,
        fields: JOURNAL_FIELDS,
        aliases: &["journals", "j", "jour", "published_in", "coden", "pubinfo"],
    },
    StaticKeyword {
        keyword: "volume",
        kind: KeywordKind::Text,
        fields: &[f("publication_info.journal_volume")],
        aliases: &["vol"],
    },
    StaticKeyword {
        keyword: "issue",
        kind: KeywordKind::Text,
        fields: &[f("publication_info.journal_issue")],
        aliases: &["journal-issue"],
    },
    StaticKeyword {
        keyword: "page",
        kind: KeywordKind::Text,
        fields: &[f("publication_info.page_start"), f("publication_info.artid")],
        aliases: &["pages", "pp", "artid"],
    },
    StaticKeyword {
        keyword: "journal-year",
        kind: KeywordKind::Numeric,
        fields: &[f("publication_info.year")],
        aliases: &["journalyear", "jy"],
    },
    StaticKeyword {
        keyword: "cnum",
        kind: KeywordKind::Text,
        fields: &[p("publication_info.cnum")],
        aliases: &["confnumber", "conf-number"],
    },
    StaticKeyword {
        keyword: "keyword",
        kind: KeywordKind::Text,
        fields: &[f("keywords.value")],
        aliases: &["keywords", "kw", "k", "kwd"],
    },
    StaticKeyword {
        keyword: "note",
        kind: KeywordKind::Text,
        fields: &[f("public_notes.value")],
        aliases: &["notes", "public-note"],
    },
    StaticKeyword {
        keyword: "reportnumber",
        kind: KeywordKind::Text,
        fields: &[f("report_numbers.value")],
        aliases: &[
            "report-number",
            "report_numbers",
            "report-num",
            "report",
            "rept",
            "rn",
            "r",
        ],
    },
    StaticKeyword {
        keyword: "subject",
        kind: KeywordKind::Text,
        fields: &[f("inspire_categories.term")],
        aliases: &["subjects", "fc", "field-code", "inspire-category"],
    },
    StaticKeyword {
        keyword: "texkey",
        kind: KeywordKind::Text,
        fields: &[p("texkeys.raw")],
        aliases: &["texkeys", "tk"],
    },
    StaticKeyword {
        keyword: "title",
        kind: KeywordKind::Text,
        fields: &[f("titles.full_title")],
        aliases: &["titles", "t", "ti", "tit"],
    },
    StaticKeyword {
        keyword: "type-code",
        kind: KeywordKind::Text,
        fields: &[f("document_type"), f("publication_type")],
        aliases: &[
            "type",
            "ty",
            "tc",
            "document-type",
            "doctype",
            "ps",
            "scl",
            "collection",
        ],
    },
    StaticKeyword {
        keyword: "isbn",
        kind: KeywordKind::Text,
        fields: &[p("isbns.value")],
        aliases: &["isbns"],
    },
    StaticKeyword {
        keyword: "fulltext",
        kind: KeywordKind::Text,
        fields: &[f("documents.attachment.content")],
        aliases: &["ft", "full-text"],
    },
    StaticKeyword {
        keyword: "caption",
        kind: KeywordKind::Text,
        fields: &[f("figures.caption")],
        aliases: &["captions"],
    },
];

/// Converts static field entries into owned specs.
fn to_specs(fields: &[StaticField]) -> Vec<FieldSpec> {
    fields
        .iter()
        .map(|&(name, boost, mode)| FieldSpec {
            name: name.into(),
            boost,
            mode,
        })
        .collect()
}

/// Builds the built-in keyword table.
pub fn builtin_keywords() -> KeywordTable {
    let mut table = KeywordTable::new();
    for entry in KEYWORDS {
        table.insert(
            entry.keyword,
            KeywordSpec::new(entry.kind, to_specs(entry.fields)),
        );
        table.insert_aliases(entry.keyword, entry.aliases);
    }
    table
}

/// Returns the default free-text field list.
pub fn free_text_fields() -> Vec<FieldSpec> {
    FREE_TEXT_FIELDS
        .iter()
        .map(|&(name, boost)| FieldSpec::boosted(name, boost))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_valid() {
        builtin_keywords().validate().unwrap();
    }

    #[test]
    fn builtin_table_size() {
        let table = builtin_keywords();
        assert!(table.alias_count() >= 150, "got {}", table.alias_count());
    }

    #[test]
    fn author_aliases() {
        let table = builtin_keywords();
        for alias in ["a", "au", "author", "name", "AU", "Author"] {
            assert_eq!(table.resolve(alias), Some("author"), "alias {alias}");
        }
    }

    #[test]
    fn journal_has_thirteen_publication_info_fields() {
        let table = builtin_keywords();
        let (keyword, spec) = table.lookup("j").unwrap();
        assert_eq!(keyword, "journal");
        assert_eq!(spec.fields.len(), 13);
        assert!(
            spec.fields
                .iter()
                .all(|f| f.name.starts_with("publication_info."))
        );
    }

    #[test]
    fn date_spans_four_fields() {
        let table = builtin_keywords();
        let spec = table.spec("date").unwrap();
        assert_eq!(spec.kind, KeywordKind::Date);
        assert_eq!(spec.fields.len(), 4);
    }

    #[test]
    fn compound_refersto_alias() {
        let table = builtin_keywords();
        assert_eq!(table.resolve("refersto:recid"), Some("refersto"));
        assert_eq!(
            table.spec("refersto").unwrap().fields,
            vec![FieldSpec::new("references.recid")]
        );
    }

    #[test]
    fn free_text_field_list() {
        let rendered: Vec<String> = free_text_fields().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "title^3",
                "title.raw^10",
                "abstract^2",
                "abstract.raw^4",
                "author^10",
                "author.raw^15",
                "reportnumber^10",
                "eprint^10",
                "doi^10",
            ]
        );
    }

    #[test]
    fn no_alias_collides_with_find_prefix() {
        let table = builtin_keywords();
        for word in ["find", "fin", "f", "and", "or", "not"] {
            assert!(!table.is_alias(word), "{word} must not be a keyword");
        }
    }
}
