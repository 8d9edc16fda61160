use std::sync::OnceLock;

use bible_model::TranslationInfo;

struct TranslationDef {
    id: &'static str,
    name: &'static str,
    abbreviation: &'static str,
    language: &'static str,
    year: Option<u16>,
    public_domain: bool,
    description: &'static str,
    category: &'static str,
}

const TRANSLATIONS: &[TranslationDef] = &[
    TranslationDef {
        id: "kjv",
        name: "King James Version",
        abbreviation: "KJV",
        language: "en",
        year: Some(1611),
        public_domain: true,
        description: "Authorized Version of 1611 in its 1769 Blayney revision.",
        category: "formal",
    },
    TranslationDef {
        id: "web",
        name: "World English Bible",
        abbreviation: "WEB",
        language: "en",
        year: Some(2000),
        public_domain: true,
        description: "Modern English update of the American Standard Version.",
        category: "modern",
    },
    TranslationDef {
        id: "asv",
        name: "American Standard Version",
        abbreviation: "ASV",
        language: "en",
        year: Some(1901),
        public_domain: true,
        description: "American revision of the English Revised Version.",
        category: "formal",
    },
    TranslationDef {
        id: "ylt",
        name: "Young's Literal Translation",
        abbreviation: "YLT",
        language: "en",
        year: Some(1862),
        public_domain: true,
        description: "Strictly literal rendering preserving Hebrew and Greek tenses.",
        category: "literal",
    },
    TranslationDef {
        id: "darby",
        name: "Darby Translation",
        abbreviation: "DBY",
        language: "en",
        year: Some(1890),
        public_domain: true,
        description: "John Nelson Darby's literal translation.",
        category: "literal",
    },
    TranslationDef {
        id: "bbe",
        name: "Bible in Basic English",
        abbreviation: "BBE",
        language: "en",
        year: Some(1965),
        public_domain: true,
        description: "Translation restricted to a simplified core vocabulary.",
        category: "simplified",
    },
    TranslationDef {
        id: "webster",
        name: "Webster's Bible",
        abbreviation: "WBT",
        language: "en",
        year: Some(1833),
        public_domain: true,
        description: "Noah Webster's revision of the King James Version.",
        category: "formal",
    },
    TranslationDef {
        id: "oeb",
        name: "Open English Bible",
        abbreviation: "OEB",
        language: "en",
        year: Some(2010),
        public_domain: true,
        description: "Modern open-licensed translation, partial coverage.",
        category: "modern",
    },
];

/// Statically registered translations, independent of loaded data.
pub fn translations() -> &'static [TranslationInfo] {
    static ALL: OnceLock<Vec<TranslationInfo>> = OnceLock::new();
    ALL.get_or_init(|| {
        TRANSLATIONS
            .iter()
            .map(|def| TranslationInfo {
                id: def.id.into(),
                name: def.name.into(),
                abbreviation: def.abbreviation.into(),
                language: def.language.into(),
                year: def.year,
                public_domain: def.public_domain,
                description: def.description.into(),
                category: def.category.into(),
            })
            .collect()
    })
}

/// Look up by id or abbreviation, case-insensitively.
pub fn translation_info(id: &str) -> Option<&'static TranslationInfo> {
    let id = id.trim();
    translations()
        .iter()
        .find(|t| t.id.eq_ignore_ascii_case(id) || t.abbreviation.eq_ignore_ascii_case(id))
}

/// Metadata for `id`, synthesised when the translation is not registered.
pub fn translation_or_placeholder(id: &str) -> TranslationInfo {
    translation_info(id).cloned().unwrap_or_else(|| TranslationInfo {
        id: id.to_string(),
        name: id.to_uppercase(),
        abbreviation: id.to_uppercase(),
        language: "und".into(),
        year: None,
        public_domain: false,
        description: String::new(),
        category: "unregistered".into(),
    })
}
